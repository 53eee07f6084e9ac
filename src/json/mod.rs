//! The dynamic JSON document type and its navigation API.
//!
//! A [`Json`] owns a whole `serde_json::Value` tree. Reading goes through
//! [`JsonRef`], a borrowed view that degrades to "missing" instead of failing,
//! so lookups can be chained freely:
//!
//! ```
//! use dynjson::Json;
//!
//! let js: Json = r#"{"server": {"ports": [80, 443]}}"#.parse()?;
//! assert_eq!(js.get("server").get("ports").get_index(1).as_u64(), Some(443));
//! assert!(!js.get("client").get("ports").exists());
//! # Ok::<(), dynjson::JsonError>(())
//! ```
//!
//! Writing always goes through the owning document with a path
//! ([`Json::set_path`], [`Json::set`], [`Json::del`], [`Json::merge`]).

mod codec;
mod error;
mod merge;
pub mod path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub use codec::{Decoder, EncodeOptions};
pub use error::JsonError;
pub(crate) use error::kind_name;
pub(crate) use merge::{deep_merge, merge};
pub use path::PathSegment;

/// An owned JSON document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Json {
    data: Value,
}

impl Default for Json {
    fn default() -> Self {
        Self::new()
    }
}

impl Json {
    /// Creates an empty object document.
    pub fn new() -> Self {
        Self {
            data: Value::Object(Map::new()),
        }
    }

    /// Creates an empty array document.
    pub fn new_array() -> Self {
        Self {
            data: Value::Array(Vec::new()),
        }
    }

    pub fn from_value(data: Value) -> Self {
        Self { data }
    }

    pub fn as_value(&self) -> &Value {
        &self.data
    }

    pub fn into_value(self) -> Value {
        self.data
    }

    /// Returns a view of the whole document.
    pub fn view(&self) -> JsonRef<'_> {
        JsonRef::new(&self.data)
    }

    /// Looks up `key` on the root object.
    pub fn get(&self, key: &str) -> JsonRef<'_> {
        self.view().get(key)
    }

    /// Looks up `index` on the root array.
    pub fn get_index(&self, index: usize) -> JsonRef<'_> {
        self.view().get_index(index)
    }

    /// Follows `path` from the root. Never fails; see [`JsonRef::exists`].
    pub fn get_path<I>(&self, path: I) -> JsonRef<'_>
    where
        I: IntoIterator,
        I::Item: Into<PathSegment>,
    {
        self.view().get_path(path)
    }

    /// Like [`get`](Self::get) but reports whether the key was found.
    pub fn check_get(&self, key: &str) -> Option<JsonRef<'_>> {
        self.view().check_get(key)
    }

    /// Like [`get_path`](Self::get_path) but reports whether the path was found.
    pub fn check_get_path<I>(&self, path: I) -> Option<JsonRef<'_>>
    where
        I: IntoIterator,
        I::Item: Into<PathSegment>,
    {
        self.view().get_path(path).check()
    }

    /// Reads the value at `path` as `T`, or returns `default` when it is
    /// missing or has a different shape.
    pub fn get_or<T, I>(&self, path: I, default: T) -> T
    where
        T: DeserializeOwned,
        I: IntoIterator,
        I::Item: Into<PathSegment>,
    {
        self.get_path(path).deserialize().unwrap_or(default)
    }

    /// Sets `key` on the root, turning the root into an object if it isn't one.
    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        path::set_path(&mut self.data, &[PathSegment::from(key)], value.into());
    }

    /// Writes `value` at `path`, creating intermediate objects.
    ///
    /// An empty path replaces the whole document. Intermediate values that are
    /// not objects are overwritten with empty objects.
    pub fn set_path(&mut self, path: &[PathSegment], value: impl Into<Value>) {
        path::set_path(&mut self.data, path, value.into());
    }

    /// Removes `key` from the root object and returns what was there.
    ///
    /// Does nothing if the root is not an object or the key is absent.
    pub fn del(&mut self, key: &str) -> Option<Json> {
        path::delete(&mut self.data, key).map(Json::from_value)
    }

    /// Deep-merges `source` into this document.
    ///
    /// `source` must hold an object. Nested objects merge key by key, anything
    /// else in `source` replaces the destination value. A non-object document
    /// is replaced by `source`.
    pub fn merge(&mut self, source: Json) -> Result<(), JsonError> {
        merge::merge(&mut self.data, source.data)
    }

    /// Number of entries in an object or array root, zero for anything else.
    pub fn len(&self) -> usize {
        self.view().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<Value> for Json {
    fn from(data: Value) -> Self {
        Self::from_value(data)
    }
}

impl From<Json> for Value {
    fn from(json: Json) -> Self {
        json.data
    }
}

/// A borrowed, possibly missing, position inside a [`Json`] document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JsonRef<'a> {
    value: Option<&'a Value>,
}

impl<'a> JsonRef<'a> {
    const MISSING: Self = JsonRef { value: None };

    fn new(value: &'a Value) -> Self {
        Self { value: Some(value) }
    }

    /// Whether this view points at a value. A present `null` exists.
    pub fn exists(&self) -> bool {
        self.value.is_some()
    }

    /// Returns `Some(self)` if the view points at a value.
    pub fn check(self) -> Option<Self> {
        self.value.map(Self::new)
    }

    pub fn get(self, key: &str) -> JsonRef<'a> {
        self.value
            .and_then(|v| v.as_object())
            .and_then(|map| map.get(key))
            .map_or(Self::MISSING, Self::new)
    }

    pub fn get_index(self, index: usize) -> JsonRef<'a> {
        self.value
            .and_then(|v| v.as_array())
            .and_then(|items| items.get(index))
            .map_or(Self::MISSING, Self::new)
    }

    pub fn get_path<I>(self, path: I) -> JsonRef<'a>
    where
        I: IntoIterator,
        I::Item: Into<PathSegment>,
    {
        self.value
            .and_then(|v| path::lookup(v, path))
            .map_or(Self::MISSING, Self::new)
    }

    pub fn check_get(self, key: &str) -> Option<JsonRef<'a>> {
        self.get(key).check()
    }

    pub fn as_value(&self) -> Option<&'a Value> {
        self.value
    }

    /// Copies the viewed branch into a standalone document.
    pub fn to_json(&self) -> Option<Json> {
        self.value.cloned().map(Json::from_value)
    }

    pub fn is_null(&self) -> bool {
        matches!(self.value, Some(Value::Null))
    }

    pub fn as_str(&self) -> Option<&'a str> {
        self.value.and_then(Value::as_str)
    }

    pub fn as_bool(&self) -> Option<bool> {
        self.value.and_then(Value::as_bool)
    }

    pub fn as_i64(&self) -> Option<i64> {
        self.value.and_then(Value::as_i64)
    }

    pub fn as_u64(&self) -> Option<u64> {
        self.value.and_then(Value::as_u64)
    }

    pub fn as_f64(&self) -> Option<f64> {
        self.value.and_then(Value::as_f64)
    }

    pub fn as_array(&self) -> Option<&'a Vec<Value>> {
        self.value.and_then(Value::as_array)
    }

    pub fn as_object(&self) -> Option<&'a Map<String, Value>> {
        self.value.and_then(Value::as_object)
    }

    pub fn len(&self) -> usize {
        match self.value {
            Some(Value::Object(map)) => map.len(),
            Some(Value::Array(items)) => items.len(),
            _ => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Reads an array whose elements are all strings.
    pub fn string_array(&self) -> Result<Vec<&'a str>, JsonError> {
        let items = self.strict()?;
        let Value::Array(items) = items else {
            return Err(JsonError::mismatch("array", items));
        };
        items
            .iter()
            .map(|item| item.as_str().ok_or_else(|| JsonError::mismatch("string", item)))
            .collect()
    }

    /// Deserializes the viewed value into `T`.
    ///
    /// Fails with [`JsonError::NotFound`] if the view is missing.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, JsonError> {
        T::deserialize(self.strict()?).map_err(JsonError::Decode)
    }

    fn strict(&self) -> Result<&'a Value, JsonError> {
        self.value
            .ok_or_else(|| JsonError::NotFound("value is missing".to_string()))
    }
}
