//! Dotted-path access to nested JSON values.
//!
//! Paths are `.`-separated; a segment that parses as an integer addresses an
//! array element when the value at that point is an array. Flattening treats
//! empty arrays and objects as leaves, so `{"a": {}}` flattens to `a = {}`.

use serde_json::{Map, Value};

/// Look up `path` below `root`.
pub fn get<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(root, |current, segment| match current {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

/// Look up `path` in a top-level map.
pub fn get_in<'a>(map: &'a Map<String, Value>, path: &str) -> Option<&'a Value> {
    let (head, tail) = match path.split_once('.') {
        Some((head, tail)) => (head, Some(tail)),
        None => (path, None),
    };
    let first = map.get(head)?;
    match tail {
        Some(rest) => get(first, rest),
        None => Some(first),
    }
}

/// Write `value` at `path`, creating intermediate objects as needed.
///
/// An intermediate value that is neither an object nor an array holding the
/// addressed index is replaced by an empty object.
pub fn set(map: &mut Map<String, Value>, path: &str, value: Value) {
    let mut segments = path.split('.');
    let head = segments.next().unwrap_or_default();
    let tail: Vec<&str> = segments.collect();
    let slot = map.entry(head.to_string()).or_insert(Value::Null);
    set_value(slot, &tail, value);
}

fn set_value(target: &mut Value, segments: &[&str], value: Value) {
    let Some((head, tail)) = segments.split_first() else {
        *target = value;
        return;
    };

    if let Value::Array(items) = target {
        if let Some(item) = head.parse::<usize>().ok().and_then(|i| items.get_mut(i)) {
            set_value(item, tail, value);
            return;
        }
    }

    if !target.is_object() {
        *target = Value::Object(Map::new());
    }
    if let Value::Object(map) = target {
        let slot = map.entry(head.to_string()).or_insert(Value::Null);
        set_value(slot, tail, value);
    }
}

/// Flatten a value into `(path, leaf)` pairs in document order.
///
/// A scalar root has no paths and flattens to nothing.
pub fn flatten(root: &Value) -> Vec<(String, &Value)> {
    let mut out = Vec::new();
    match root {
        Value::Object(map) => flatten_entries(map, &mut out),
        Value::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                flatten_into(index.to_string(), item, &mut out);
            }
        }
        _ => {}
    }
    out
}

/// Flatten a top-level map into `(path, leaf)` pairs in insertion order.
pub fn flatten_map(map: &Map<String, Value>) -> Vec<(String, &Value)> {
    let mut out = Vec::new();
    flatten_entries(map, &mut out);
    out
}

/// True if `path` is one of the leaf paths of the flattened map.
pub fn contains_leaf(map: &Map<String, Value>, path: &str) -> bool {
    flatten_map(map).iter().any(|(key, _)| key == path)
}

/// The final segment of a dotted path.
pub fn last_segment(path: &str) -> &str {
    path.rsplit('.').next().unwrap_or(path)
}

fn flatten_entries<'a>(map: &'a Map<String, Value>, out: &mut Vec<(String, &'a Value)>) {
    for (key, value) in map {
        flatten_into(key.clone(), value, out);
    }
}

fn flatten_into<'a>(prefix: String, value: &'a Value, out: &mut Vec<(String, &'a Value)>) {
    match value {
        Value::Object(map) if !map.is_empty() => {
            for (key, child) in map {
                flatten_into(format!("{prefix}.{key}"), child, out);
            }
        }
        Value::Array(items) if !items.is_empty() => {
            for (index, child) in items.iter().enumerate() {
                flatten_into(format!("{prefix}.{index}"), child, out);
            }
        }
        _ => out.push((prefix, value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn get_walks_objects_and_arrays() {
        let doc = json!({"results": [{"geometry": {"location": {"lat": 1.23}}}]});
        assert_eq!(get(&doc, "results.0.geometry.location.lat"), Some(&json!(1.23)));
        assert_eq!(get(&doc, "results.1"), None);
        assert_eq!(get(&doc, "results.x"), None);
        assert_eq!(get(&doc, "missing"), None);
    }

    #[test]
    fn get_in_reads_top_level_and_nested() {
        let map = object(json!({"address": "Paris", "components": {"country": "FR"}}));
        assert_eq!(get_in(&map, "address"), Some(&json!("Paris")));
        assert_eq!(get_in(&map, "components.country"), Some(&json!("FR")));
        assert_eq!(get_in(&map, "components.route"), None);
    }

    #[test]
    fn set_creates_intermediate_objects() {
        let mut map = Map::new();
        set(&mut map, "results.0.geometry.location.lat", json!(1.23));
        assert_eq!(
            Value::Object(map),
            json!({"results": {"0": {"geometry": {"location": {"lat": 1.23}}}}})
        );
    }

    #[test]
    fn set_replaces_scalars_in_the_way() {
        let mut map = object(json!({"components": ""}));
        set(&mut map, "components.country", json!("US"));
        assert_eq!(Value::Object(map), json!({"components": {"country": "US"}}));
    }

    #[test]
    fn set_indexes_into_existing_arrays() {
        let mut map = object(json!({"waypoints": ["a", "b"]}));
        set(&mut map, "waypoints.1", json!("c"));
        assert_eq!(Value::Object(map), json!({"waypoints": ["a", "c"]}));
    }

    #[test]
    fn flatten_keeps_document_order_and_empty_containers() {
        let doc = json!({"b": {"y": 1, "x": [true, null]}, "a": {}, "c": []});
        let flat: Vec<(String, Value)> = flatten(&doc)
            .into_iter()
            .map(|(k, v)| (k, v.clone()))
            .collect();
        assert_eq!(
            flat,
            vec![
                ("b.y".to_string(), json!(1)),
                ("b.x.0".to_string(), json!(true)),
                ("b.x.1".to_string(), Value::Null),
                ("a".to_string(), json!({})),
                ("c".to_string(), json!([])),
            ]
        );
    }

    #[test]
    fn flatten_of_scalar_root_is_empty() {
        assert!(flatten(&json!("OK")).is_empty());
        assert_eq!(flatten(&json!([7]))[0].0, "0");
    }

    #[test]
    fn contains_leaf_only_matches_leaves() {
        let map = object(json!({"components": {"country": ""}, "bounds": ""}));
        assert!(contains_leaf(&map, "components.country"));
        assert!(contains_leaf(&map, "bounds"));
        assert!(!contains_leaf(&map, "components"));
        assert!(!contains_leaf(&map, "region"));
    }

    #[test]
    fn last_segment_of_paths() {
        assert_eq!(last_segment("results.0.geometry.location.lat"), "lat");
        assert_eq!(last_segment("status"), "status");
    }
}
