use serde_json::{Map, Value};

use super::JsonError;

/// Deep-merges `source` into `destination`.
///
/// `source` must be an object. A non-object destination is replaced by an empty
/// object first. Nested objects are merged recursively; every other value
/// (arrays included) replaces what the destination held, so the last value
/// merged for a key wins.
pub fn merge(destination: &mut Value, source: Value) -> Result<(), JsonError> {
    let Value::Object(overlay) = source else {
        return Err(JsonError::mismatch("object", &source));
    };

    match destination {
        Value::Object(base) => deep_merge(base, overlay),
        other => *other = Value::Object(overlay),
    }
    Ok(())
}

pub(crate) fn deep_merge(base: &mut Map<String, Value>, overlay: Map<String, Value>) {
    for (key, value) in overlay {
        match (base.get_mut(&key), value) {
            (Some(Value::Object(base_map)), Value::Object(overlay_map)) => {
                deep_merge(base_map, overlay_map);
            }
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_merge_disjoint_keys() {
        let mut dest = json!({});
        merge(&mut dest, json!({"x": 1})).unwrap();
        merge(&mut dest, json!({"y": 2})).unwrap();
        assert_eq!(dest, json!({"x": 1, "y": 2}));
    }

    #[test]
    fn test_merge_later_source_wins() {
        let mut dest = json!({});
        merge(&mut dest, json!({"k": "first"})).unwrap();
        merge(&mut dest, json!({"k": "second"})).unwrap();
        assert_eq!(dest, json!({"k": "second"}));
    }

    #[test]
    fn test_merge_nested_objects_recursively() {
        let mut dest = json!({"db": {"host": "localhost", "port": 5432}});
        merge(&mut dest, json!({"db": {"port": 6543, "user": "app"}})).unwrap();
        assert_eq!(
            dest,
            json!({"db": {"host": "localhost", "port": 6543, "user": "app"}})
        );
    }

    #[test]
    fn test_merge_replaces_arrays() {
        let mut dest = json!({"tags": ["a", "b", "c"]});
        merge(&mut dest, json!({"tags": ["z"]})).unwrap();
        assert_eq!(dest, json!({"tags": ["z"]}));
    }

    #[test]
    fn test_merge_object_over_scalar() {
        let mut dest = json!({"a": 3});
        merge(&mut dest, json!({"a": {"b": 1}})).unwrap();
        assert_eq!(dest, json!({"a": {"b": 1}}));
    }

    #[test]
    fn test_merge_non_object_source_fails() {
        let mut dest = json!({"a": 1});
        let result = merge(&mut dest, json!([1, 2]));
        assert!(matches!(
            result,
            Err(JsonError::TypeMismatch {
                expected: "object",
                found: "array"
            })
        ));
        assert_eq!(dest, json!({"a": 1}));
    }

    #[test]
    fn test_merge_into_non_object_destination() {
        let mut dest = json!("scalar");
        merge(&mut dest, json!({"a": 1})).unwrap();
        assert_eq!(dest, json!({"a": 1}));
    }
}
