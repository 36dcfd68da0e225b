//! Dotted-path access into nested JSON documents.
//!
//! A path such as `system.details.age` is a sequence of object keys. Reads
//! never fail: a missing link anywhere along the way resolves to "absent".
//! Writes create intermediate objects on demand.

use serde_json::{Map, Value};
use thiserror::Error;

/// Errors from writing through a dotted path.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PathError {
    #[error("Cannot write to an empty path")]
    EmptyPath,

    #[error("Path segment '{segment}' does not hold an object")]
    NotAnObject { segment: String },
}

/// Split a dotted path into its segments. An empty path has none.
pub fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('.').filter(move |_| !path.is_empty())
}

/// Read the value at `path`.
///
/// An empty path yields `root` itself. Any missing segment, or a segment
/// that lands on a non-object, yields `None`.
pub fn get<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = root;
    for key in segments(path) {
        current = current.as_object()?.get(key)?;
    }
    Some(current)
}

/// Read the value at `path` as display text, empty when absent.
pub fn get_text(root: &Value, path: &str) -> String {
    get(root, path).map(as_text).unwrap_or_default()
}

/// Render a scalar as text. Null and containers render as empty.
pub fn as_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => String::new(),
    }
}

/// Write `value` at `path`, creating intermediate objects as needed.
///
/// Missing or `null` intermediates become empty objects. An intermediate
/// holding any other non-object value is an error and leaves `root` as it
/// was.
pub fn set(root: &mut Value, path: &str, value: Value) -> Result<(), PathError> {
    let keys: Vec<&str> = segments(path).collect();
    let Some((last, parents)) = keys.split_last() else {
        return Err(PathError::EmptyPath);
    };

    // Validate before mutating so a failed write has no side effects.
    let mut node = Some(&*root);
    let mut depth = 0;
    while depth <= parents.len() {
        match node {
            None | Some(Value::Null) => break,
            Some(Value::Object(map)) => {
                node = parents.get(depth).and_then(|key| map.get(*key));
                depth += 1;
            }
            Some(_) => {
                return Err(PathError::NotAnObject {
                    segment: parents[..depth].join("."),
                })
            }
        }
    }

    let mut current = root;
    for (depth, key) in parents.iter().enumerate() {
        let Some(map) = object_mut(current) else {
            return Err(PathError::NotAnObject {
                segment: parents[..depth].join("."),
            });
        };
        current = map.entry((*key).to_string()).or_insert(Value::Null);
    }
    let Some(map) = object_mut(current) else {
        return Err(PathError::NotAnObject {
            segment: parents.join("."),
        });
    };
    map.insert((*last).to_string(), value);
    Ok(())
}

/// Borrow `value` as an object, turning `null` into an empty one first.
fn object_mut(value: &mut Value) -> Option<&mut Map<String, Value>> {
    if value.is_null() {
        *value = Value::Object(Map::new());
    }
    value.as_object_mut()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn actor() -> Value {
        json!({
            "name": "Kael",
            "type": "character",
            "system": {
                "details": { "age": 34, "race": "human", "gender": "male" },
                "biography": ""
            }
        })
    }

    #[test]
    fn test_get_nested() {
        let a = actor();
        assert_eq!(get(&a, "system.details.age"), Some(&json!(34)));
        assert_eq!(get(&a, "name"), Some(&json!("Kael")));
    }

    #[test]
    fn test_get_empty_path_returns_root() {
        let a = actor();
        assert_eq!(get(&a, ""), Some(&a));
    }

    #[test]
    fn test_get_missing_intermediate_is_absent() {
        let a = actor();
        assert_eq!(get(&a, "system.traits.languages"), None);
        assert_eq!(get(&a, "flags.x.y.z"), None);
        assert_eq!(get(&Value::Null, "a.b"), None);
    }

    #[test]
    fn test_get_through_scalar_is_absent() {
        let a = actor();
        assert_eq!(get(&a, "name.first"), None);
        assert_eq!(get(&a, "system.details.age.years"), None);
    }

    #[test]
    fn test_get_does_not_index_arrays() {
        let doc = json!({"items": [{"name": "sword"}]});
        assert_eq!(get(&doc, "items.0.name"), None);
    }

    #[test]
    fn test_get_text() {
        let a = actor();
        assert_eq!(get_text(&a, "system.details.age"), "34");
        assert_eq!(get_text(&a, "system.details.race"), "human");
        assert_eq!(get_text(&a, "system.details.homeland"), "");
        assert_eq!(get_text(&a, "system.details"), "");
        assert_eq!(get_text(&json!({"a": true}), "a"), "true");
        assert_eq!(get_text(&json!({"a": null}), "a"), "");
    }

    #[test]
    fn test_set_then_get() {
        let mut a = actor();
        set(&mut a, "system.details.homeland", json!("Thornwood")).unwrap();
        assert_eq!(get(&a, "system.details.homeland"), Some(&json!("Thornwood")));
        // Siblings untouched
        assert_eq!(get(&a, "system.details.age"), Some(&json!(34)));
    }

    #[test]
    fn test_set_creates_intermediates() {
        let mut doc = json!({});
        set(&mut doc, "flags.backstory-generator.generatorUsed", json!(true)).unwrap();
        assert_eq!(
            doc,
            json!({"flags": {"backstory-generator": {"generatorUsed": true}}})
        );
    }

    #[test]
    fn test_set_replaces_null_intermediate() {
        let mut doc = json!({"system": null});
        set(&mut doc, "system.biography", json!("text")).unwrap();
        assert_eq!(get_text(&doc, "system.biography"), "text");
    }

    #[test]
    fn test_set_on_null_root() {
        let mut doc = Value::Null;
        set(&mut doc, "a.b", json!(1)).unwrap();
        assert_eq!(doc, json!({"a": {"b": 1}}));
    }

    #[test]
    fn test_set_overwrites_leaf() {
        let mut a = actor();
        set(&mut a, "system.details.age", json!("35")).unwrap();
        assert_eq!(get(&a, "system.details.age"), Some(&json!("35")));
    }

    #[test]
    fn test_set_empty_path_is_error() {
        let mut a = actor();
        assert_eq!(set(&mut a, "", json!(1)), Err(PathError::EmptyPath));
    }

    #[test]
    fn test_set_through_scalar_is_error_without_side_effects() {
        let mut a = actor();
        let before = a.clone();
        let err = set(&mut a, "name.first", json!("K")).unwrap_err();
        assert_eq!(
            err,
            PathError::NotAnObject {
                segment: "name".to_string()
            }
        );
        assert_eq!(a, before);

        let err = set(&mut a, "system.details.age.years", json!(1)).unwrap_err();
        assert_eq!(
            err,
            PathError::NotAnObject {
                segment: "system.details.age".to_string()
            }
        );
        assert_eq!(a, before);
    }

    #[test]
    fn test_set_on_scalar_root_is_error() {
        let mut doc = json!(42);
        assert_eq!(
            set(&mut doc, "a", json!(1)),
            Err(PathError::NotAnObject {
                segment: String::new()
            })
        );
    }

    #[test]
    fn test_round_trip_various_paths() {
        for path in ["a", "a.b", "system.details.class", "x.y.z.w"] {
            let mut doc = actor();
            set(&mut doc, path, json!("v")).unwrap();
            assert_eq!(get(&doc, path), Some(&json!("v")), "path {path}");
        }
    }
}
