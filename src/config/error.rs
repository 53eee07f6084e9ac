use std::path::PathBuf;
use thiserror::Error;

use crate::compile::CompileError;
use crate::json::JsonError;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("required config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {source}")]
    ParseError {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("config file '{path}' must hold an object, found {found}")]
    NotAnObject { path: PathBuf, found: &'static str },

    #[error("config layer {index} cannot be merged: {source}")]
    InvalidLayer { index: usize, source: JsonError },

    #[error("failed to deserialize config: {0}")]
    DeserializeError(#[from] serde_json::Error),

    #[error("unresolved references in configuration:\n{0}")]
    Unresolved(#[from] CompileError),
}
