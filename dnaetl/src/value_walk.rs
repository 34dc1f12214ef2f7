//! Recursive traversal over JSON values
//!
//! Metadata documents are arbitrary trees of objects, arrays and scalars.
//! The filter needs two kinds of walks over them: a predicate that must hold
//! for every node, and a rebuild that drops object keys. Both descend into
//! object values and array elements, never into object keys.

use serde_json::{Map, Value};

/// Returns true iff `predicate` holds for `value` and every nested value
///
/// Stops at the first node that fails.
pub fn all_nodes<F>(value: &Value, predicate: &mut F) -> bool
where
    F: FnMut(&Value) -> bool,
{
    if !predicate(value) {
        return false;
    }

    match value {
        Value::Object(map) => map.values().all(|child| all_nodes(child, predicate)),
        Value::Array(items) => items.iter().all(|child| all_nodes(child, predicate)),
        _ => true,
    }
}

/// Deep copy of `value` keeping only object entries whose key passes `keep_key`
///
/// Applied at every depth, including objects nested inside arrays. Scalars
/// pass through unchanged.
pub fn retain_keys<F>(value: &Value, keep_key: &F) -> Value
where
    F: Fn(&str) -> bool,
{
    match value {
        Value::Object(map) => {
            let filtered: Map<String, Value> = map
                .iter()
                .filter(|(key, _)| keep_key(key))
                .map(|(key, child)| (key.clone(), retain_keys(child, keep_key)))
                .collect();
            Value::Object(filtered)
        }
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|child| retain_keys(child, keep_key))
                .collect(),
        ),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_all_nodes_visits_arrays_and_objects() {
        let doc = json!({"a": [1, {"b": "x"}], "c": {"d": null}});
        let mut seen = 0;
        assert!(all_nodes(&doc, &mut |_| {
            seen += 1;
            true
        }));
        // root, array, 1, {b}, "x", {d}, null
        assert_eq!(seen, 7);
    }

    #[test]
    fn test_all_nodes_short_circuits() {
        let doc = json!(["bad", "never"]);
        let mut visited = Vec::new();
        let ok = all_nodes(&doc, &mut |v| {
            visited.push(v.clone());
            v != "bad"
        });
        assert!(!ok);
        assert!(!visited.contains(&json!("never")));
    }

    #[test]
    fn test_retain_keys_nested_in_arrays() {
        let doc = json!({"keep": [{"_drop": 1, "ok": 2}], "_gone": true});
        let out = retain_keys(&doc, &|k| !k.starts_with('_'));
        assert_eq!(out, json!({"keep": [{"ok": 2}]}));
    }

    #[test]
    fn test_retain_keys_scalar_passthrough() {
        assert_eq!(retain_keys(&json!(3.5), &|_| false), json!(3.5));
        assert_eq!(retain_keys(&json!("_x"), &|_| false), json!("_x"));
    }
}
