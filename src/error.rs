use crate::compile::CompileError;
use crate::config::ConfigError;
use crate::json::JsonError;
use thiserror::Error;

/// Top-level error type for the dynjson library.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("json error: {0}")]
    Json(#[from] JsonError),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("template compilation failed:\n{0}")]
    Compile(#[from] CompileError),
}
