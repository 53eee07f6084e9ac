//! Configuration documents assembled from JSON layers, merged in order and
//! compiled once at the end.

mod builder;
mod error;
mod file;
mod source;

pub use builder::Config;
pub use error::ConfigError;
pub use file::FileSource;
pub use source::{ConfigSource, ValueSource};
