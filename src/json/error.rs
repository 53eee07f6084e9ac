use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum JsonError {
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("path not found: {0}")]
    NotFound(String),

    #[error("failed to decode JSON: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("failed to encode JSON: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl JsonError {
    pub(crate) fn mismatch(expected: &'static str, found: &serde_json::Value) -> Self {
        JsonError::TypeMismatch {
            expected,
            found: kind_name(found),
        }
    }
}

/// Human-readable name of a value's kind, used in mismatch messages.
pub(crate) fn kind_name(value: &serde_json::Value) -> &'static str {
    use serde_json::Value;

    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
