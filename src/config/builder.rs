use std::path::Path;

use serde::de::DeserializeOwned;

use super::file::FileSource;
use super::source::{ConfigSource, ValueSource};
use super::ConfigError;
use crate::json::Json;

/// Assembles one document from JSON layers, then compiles it.
///
/// Each layer is deep-merged over the ones registered before it: objects merge
/// key by key, and every other value, arrays included, replaces what was there.
/// Layers that load nothing are skipped.
///
/// Templates are expanded only after the last layer is merged, so a later
/// layer can change what an earlier `$path` reference or `$include` points at:
///
/// ```json
/// {
///   "defaults": { "host": "localhost", "port": 8080 },
///   "server": { "$include": "defaults", "port": 9090 },
///   "client": { "endpoint": "$defaults/host" }
/// }
/// ```
///
/// Unlike [`Json::compile`], building is strict. A single broken reference
/// fails it with [`ConfigError::Unresolved`], which carries every diagnostic.
///
/// ```no_run
/// use dynjson::Config;
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct Service {
///     name: String,
///     port: u16,
/// }
///
/// let service: Service = Config::builder()
///     .with_file("service.json", true)
///     .with_file("service.local.json", false)
///     .build()?;
/// # Ok::<(), dynjson::ConfigError>(())
/// ```
#[derive(Debug, Default)]
#[must_use = "builders do nothing until .build() is called"]
pub struct Config {
    layers: Vec<Box<dyn ConfigSource>>,
}

impl Config {
    pub fn builder() -> Self {
        Self::default()
    }

    /// Adds a JSON file layer. A missing file fails the build only when
    /// `required` is set.
    pub fn with_file(self, path: impl AsRef<Path>, required: bool) -> Self {
        self.with_source(FileSource::new(path, required))
    }

    /// Adds an in-memory layer. It must hold an object.
    pub fn with_value(self, document: Json) -> Self {
        self.with_source(ValueSource::new(document))
    }

    pub fn with_source(mut self, source: impl ConfigSource + 'static) -> Self {
        self.layers.push(Box::new(source));
        self
    }

    /// Merges every layer in order and compiles the result.
    pub fn build_document(self) -> Result<Json, ConfigError> {
        let mut merged = Json::new();

        for (index, layer) in self.layers.iter().enumerate() {
            let Some(document) = layer.load()? else {
                continue;
            };
            merged
                .merge(document)
                .map_err(|source| ConfigError::InvalidLayer { index, source })?;
        }

        Ok(merged.compile().into_result()?)
    }

    /// Builds the document and deserializes it into `T`.
    pub fn build<T: DeserializeOwned>(self) -> Result<T, ConfigError> {
        let document = self.build_document()?;
        serde_json::from_value(document.into_value()).map_err(ConfigError::DeserializeError)
    }
}
