use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::source::ConfigSource;
use super::ConfigError;
use crate::json::{kind_name, Json};

/// A JSON file whose root is an object.
///
/// A missing file is an error when `required` is set and an empty layer
/// otherwise.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
    required: bool,
}

impl FileSource {
    pub fn new(path: impl AsRef<Path>, required: bool) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            required,
        }
    }

    fn read(&self) -> Result<Option<Vec<u8>>, ConfigError> {
        match std::fs::read(&self.path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound && !self.required => Ok(None),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(ConfigError::FileNotFound(self.path.clone()))
            }
            Err(source) => Err(ConfigError::ReadError {
                path: self.path.clone(),
                source,
            }),
        }
    }
}

impl ConfigSource for FileSource {
    fn load(&self) -> Result<Option<Json>, ConfigError> {
        let Some(bytes) = self.read()? else {
            tracing::debug!(path = %self.path.display(), "skipping absent config file");
            return Ok(None);
        };

        let document: Json =
            serde_json::from_slice(&bytes).map_err(|source| ConfigError::ParseError {
                path: self.path.clone(),
                source,
            })?;
        if !document.as_value().is_object() {
            return Err(ConfigError::NotAnObject {
                path: self.path.clone(),
                found: kind_name(document.as_value()),
            });
        }

        tracing::debug!(path = %self.path.display(), "read config file");
        Ok(Some(document))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn file_with(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{contents}").unwrap();
        file
    }

    #[test]
    fn test_reads_object_document() {
        let file = file_with(r#"{"key": "value"}"#);

        let document = FileSource::new(file.path(), true).load().unwrap().unwrap();
        assert_eq!(document.get("key").as_str(), Some("value"));
    }

    #[test]
    fn test_absent_file() {
        let path = "/nonexistent/path/config.json";

        assert!(matches!(
            FileSource::new(path, true).load(),
            Err(ConfigError::FileNotFound(_))
        ));
        assert!(FileSource::new(path, false).load().unwrap().is_none());
    }

    #[test]
    fn test_malformed_file() {
        let file = file_with("{ not json");

        let result = FileSource::new(file.path(), false).load();
        assert!(matches!(result, Err(ConfigError::ParseError { .. })));
    }

    #[test]
    fn test_non_object_root() {
        let file = file_with("[1, 2, 3]");

        let result = FileSource::new(file.path(), true).load();
        assert!(matches!(
            result,
            Err(ConfigError::NotAnObject { found: "array", .. })
        ));
    }
}
