pub mod compile;
pub mod config;
mod error;
pub mod json;

pub use compile::{Compilation, CompileError, Diagnostic};
pub use config::{Config, ConfigError};
pub use error::Error;
pub use json::{Decoder, EncodeOptions, Json, JsonError, JsonRef, PathSegment};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
