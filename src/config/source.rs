use super::ConfigError;
use crate::json::Json;

/// One layer of a configuration document.
///
/// `load` returns `None` when the layer has nothing to contribute, such as an
/// optional file that does not exist.
pub trait ConfigSource: Send + Sync + std::fmt::Debug {
    fn load(&self) -> Result<Option<Json>, ConfigError>;
}

/// A document held in memory.
#[derive(Debug, Clone)]
pub struct ValueSource {
    document: Json,
}

impl ValueSource {
    pub fn new(document: Json) -> Self {
        Self { document }
    }
}

impl ConfigSource for ValueSource {
    fn load(&self) -> Result<Option<Json>, ConfigError> {
        Ok(Some(self.document.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_value_source_yields_its_document() {
        let document = Json::from_value(json!({"a": [1, 2]}));
        let loaded = ValueSource::new(document.clone()).load().unwrap();
        assert_eq!(loaded, Some(document));
    }
}
