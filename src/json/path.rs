//! Path navigation and path-qualified writes over a `serde_json::Value` tree.

use std::fmt;

use serde_json::{Map, Value};

/// One component of a path: an object key or an array index.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

impl PathSegment {
    /// Renders the segment as an object key.
    ///
    /// Used when a write has to turn a non-object into an object.
    fn to_key(&self) -> String {
        match self {
            PathSegment::Key(k) => k.clone(),
            PathSegment::Index(i) => i.to_string(),
        }
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(k) => f.write_str(k),
            PathSegment::Index(i) => write!(f, "{i}"),
        }
    }
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        PathSegment::Key(key.to_string())
    }
}

impl From<String> for PathSegment {
    fn from(key: String) -> Self {
        PathSegment::Key(key)
    }
}

impl From<&String> for PathSegment {
    fn from(key: &String) -> Self {
        PathSegment::Key(key.clone())
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        PathSegment::Index(index)
    }
}

impl From<&PathSegment> for PathSegment {
    fn from(segment: &PathSegment) -> Self {
        segment.clone()
    }
}

/// Splits the body of a reference (`a/b/c`, sigil already stripped) into keys.
///
/// Splitting is literal: there is no escape for `/` inside a key.
pub fn split_reference(path: &str) -> Vec<PathSegment> {
    path.split('/').map(PathSegment::from).collect()
}

/// Formats a path as `a/b/0`, the same shape a reference uses.
pub fn display_path(path: &[PathSegment]) -> String {
    path.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("/")
}

/// Resolves a single segment against a value.
///
/// A key only matches an object and an index only matches an array.
pub fn step<'a>(value: &'a Value, segment: &PathSegment) -> Option<&'a Value> {
    match (value, segment) {
        (Value::Object(map), PathSegment::Key(key)) => map.get(key),
        (Value::Array(items), PathSegment::Index(i)) => items.get(*i),
        _ => None,
    }
}

/// Resolves a full path, short-circuiting on the first failed segment.
pub fn lookup<'a, I>(root: &'a Value, path: I) -> Option<&'a Value>
where
    I: IntoIterator,
    I::Item: Into<PathSegment>,
{
    let mut current = root;
    for segment in path {
        current = step(current, &segment.into())?;
    }
    Some(current)
}

/// Writes `value` at `path`, creating intermediate objects as needed.
///
/// An empty path replaces `root`. Any intermediate value that is missing or not
/// an object is replaced with an empty object, discarding what was there, as
/// soon as the next segment has to be written into it. The one exception is an
/// in-range index into an existing array, which descends into that element.
pub fn set_path(root: &mut Value, path: &[PathSegment], value: Value) {
    let Some((last, parents)) = path.split_last() else {
        *root = value;
        return;
    };

    let mut current = root;
    for segment in parents {
        current = child_slot(current, segment);
    }

    match (current, last) {
        (Value::Array(items), PathSegment::Index(i)) if *i < items.len() => items[*i] = value,
        (Value::Array(items), PathSegment::Index(i)) if *i == items.len() => items.push(value),
        (current, last) => {
            object_mut(current).insert(last.to_key(), value);
        }
    }
}

/// Removes `key` from an object. Non-objects and absent keys are left alone.
pub fn delete(value: &mut Value, key: &str) -> Option<Value> {
    value.as_object_mut().and_then(|map| map.remove(key))
}

/// Returns the slot `segment` addresses below `current`, creating it if needed.
///
/// `current` becomes an object unless `segment` is an in-range array index.
fn child_slot<'a>(current: &'a mut Value, segment: &PathSegment) -> &'a mut Value {
    if let (Value::Array(items), PathSegment::Index(i)) = (&*current, segment) {
        if *i < items.len() {
            return &mut current[*i];
        }
    }
    object_mut(current)
        .entry(segment.to_key())
        .or_insert_with(|| Value::Object(Map::new()))
}

/// Returns `value` as an object, replacing it with an empty one if it isn't.
fn object_mut(value: &mut Value) -> &mut Map<String, Value> {
    if !value.is_object() {
        *value = Value::Object(Map::new());
    }
    value.as_object_mut().expect("value was just made an object")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn keys(path: &[&str]) -> Vec<PathSegment> {
        path.iter().map(|k| PathSegment::from(*k)).collect()
    }

    #[test]
    fn test_lookup_nested_key_and_index() {
        let doc = json!({"a": {"b": [10, {"c": "deep"}]}});
        let path = vec![
            PathSegment::from("a"),
            PathSegment::from("b"),
            PathSegment::from(1),
            PathSegment::from("c"),
        ];
        assert_eq!(lookup(&doc, &path), Some(&json!("deep")));
    }

    #[test]
    fn test_lookup_kind_mismatch_fails() {
        let doc = json!({"list": [1, 2], "map": {"0": "zero"}});
        assert_eq!(lookup(&doc, ["list".into(), PathSegment::Key("0".into())]), None);
        assert_eq!(lookup(&doc, ["map".into(), PathSegment::Index(0)]), None);
        assert_eq!(lookup(&doc, ["list".into(), PathSegment::Index(2)]), None);
    }

    #[test]
    fn test_lookup_empty_path_is_root() {
        let doc = json!(42);
        assert_eq!(lookup(&doc, Vec::<PathSegment>::new()), Some(&doc));
    }

    #[test]
    fn test_set_path_empty_replaces_root() {
        let mut doc = json!({"a": 1});
        set_path(&mut doc, &[], json!([1, 2]));
        assert_eq!(doc, json!([1, 2]));
    }

    #[test]
    fn test_set_path_autovivifies() {
        let mut doc = json!({});
        set_path(&mut doc, &keys(&["a", "b"]), json!("v"));
        assert_eq!(doc, json!({"a": {"b": "v"}}));
    }

    #[test]
    fn test_set_path_overwrites_scalar_parent() {
        let mut doc = json!({"a": 0.1});
        set_path(&mut doc, &keys(&["a", "foo"]), json!("bar"));
        assert_eq!(doc, json!({"a": {"foo": "bar"}}));
    }

    #[test]
    fn test_set_path_into_array_element() {
        let mut doc = json!({"items": [{"n": 1}, {"n": 2}]});
        let path = vec!["items".into(), PathSegment::Index(1), "n".into()];
        set_path(&mut doc, &path, json!(20));
        assert_eq!(doc, json!({"items": [{"n": 1}, {"n": 20}]}));
    }

    #[test]
    fn test_set_path_nested_arrays() {
        let mut doc = json!({"grid": [[1, 2], [3, 4]]});
        let path = vec!["grid".into(), PathSegment::Index(1), PathSegment::Index(0)];
        set_path(&mut doc, &path, json!(30));
        assert_eq!(doc, json!({"grid": [[1, 2], [30, 4]]}));
    }

    #[test]
    fn test_set_path_through_out_of_range_index() {
        let mut doc = json!({"items": [{"n": 1}]});
        let path = vec!["items".into(), PathSegment::Index(3), "n".into()];
        set_path(&mut doc, &path, json!(4));
        assert_eq!(doc, json!({"items": {"3": {"n": 4}}}));
    }

    #[test]
    fn test_set_path_final_index() {
        let mut doc = json!({"items": [1, 2]});
        set_path(&mut doc, &["items".into(), PathSegment::Index(0)], json!(9));
        set_path(&mut doc, &["items".into(), PathSegment::Index(2)], json!(3));
        assert_eq!(doc, json!({"items": [9, 2, 3]}));

        // past the end: the array gives way to an object
        set_path(&mut doc, &["items".into(), PathSegment::Index(7)], json!(true));
        assert_eq!(doc, json!({"items": {"7": true}}));
    }

    #[test]
    fn test_set_path_on_scalar_root() {
        let mut doc = json!("text");
        set_path(&mut doc, &keys(&["k"]), json!(1));
        assert_eq!(doc, json!({"k": 1}));
    }

    #[test]
    fn test_delete() {
        let mut doc = json!({"a": 1, "b": 2});
        assert_eq!(delete(&mut doc, "a"), Some(json!(1)));
        assert_eq!(delete(&mut doc, "missing"), None);
        assert_eq!(doc, json!({"b": 2}));

        let mut scalar = json!(5);
        assert_eq!(delete(&mut scalar, "a"), None);
        assert_eq!(scalar, json!(5));
    }

    #[test]
    fn test_split_reference_is_literal() {
        assert_eq!(split_reference("theme/primary"), keys(&["theme", "primary"]));
        assert_eq!(split_reference("a//b"), keys(&["a", "", "b"]));
        assert_eq!(display_path(&split_reference("x/y")), "x/y");
    }
}
