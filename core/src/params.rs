//! Parameter set for the current request.

use serde_json::{Map, Value};

use crate::dot;

/// Current request parameters plus the service defaults they started from.
///
/// Per-key writes are restricted to leaf paths that already exist, so a typo
/// in a parameter name never reaches the wire. Bulk merges are not
/// restricted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterStore {
    defaults: Map<String, Value>,
    current: Map<String, Value>,
}

impl ParameterStore {
    pub fn new(defaults: Map<String, Value>) -> Self {
        Self {
            current: defaults.clone(),
            defaults,
        }
    }

    /// Merge `bag` into the top level of the current set, inserting new keys
    /// and replacing existing ones.
    pub fn set_param(&mut self, bag: Map<String, Value>) {
        for (key, value) in bag {
            self.current.insert(key, value);
        }
    }

    /// Write `value` at `path` if `path` is already a leaf of the current
    /// set. Returns whether anything was written.
    pub fn set_param_by_key(&mut self, path: &str, value: Value) -> bool {
        if !dot::contains_leaf(&self.current, path) {
            tracing::debug!(path, "ignoring unknown parameter");
            return false;
        }
        dot::set(&mut self.current, path, value);
        true
    }

    pub fn param_by_key(&self, path: &str) -> Option<&Value> {
        dot::get_in(&self.current, path)
    }

    pub fn params(&self) -> &Map<String, Value> {
        &self.current
    }

    /// Restore the service defaults.
    pub fn reset(&mut self) {
        self.current = self.defaults.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn store() -> ParameterStore {
        let defaults = json!({
            "address": "",
            "components": {"country": "", "postal_code": ""},
            "waypoints": []
        });
        match defaults {
            Value::Object(map) => ParameterStore::new(map),
            _ => unreachable!(),
        }
    }

    fn bag(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn set_by_key_writes_known_paths() {
        let mut params = store();
        assert!(params.set_param_by_key("address", json!("Berlin")));
        assert!(params.set_param_by_key("components.country", json!("DE")));
        assert_eq!(params.param_by_key("address"), Some(&json!("Berlin")));
        assert_eq!(params.param_by_key("components.country"), Some(&json!("DE")));
    }

    #[test]
    fn set_by_key_ignores_unknown_paths() {
        let mut params = store();
        let before = params.params().clone();
        assert!(!params.set_param_by_key("adress", json!("typo")));
        assert!(!params.set_param_by_key("components.city", json!("Paris")));
        assert_eq!(params.params(), &before);
    }

    #[test]
    fn set_by_key_refuses_non_leaf_paths() {
        let mut params = store();
        assert!(!params.set_param_by_key("components", json!("country:DE")));
    }

    #[test]
    fn empty_containers_are_writable_leaves() {
        let mut params = store();
        assert!(params.set_param_by_key("waypoints", json!(["A", "B"])));
        assert_eq!(params.param_by_key("waypoints.1"), Some(&json!("B")));
    }

    #[test]
    fn bulk_merge_inserts_and_replaces() {
        let mut params = store();
        params.set_param(bag(json!({"a": 1, "b": 2, "address": "Oslo"})));
        let all = params.params();
        assert_eq!(all["a"], json!(1));
        assert_eq!(all["b"], json!(2));
        assert_eq!(all["address"], json!("Oslo"));
        assert_eq!(all["components"]["country"], json!(""));
    }

    #[test]
    fn merged_keys_become_writable() {
        let mut params = store();
        params.set_param(bag(json!({"sensor": false})));
        assert!(params.set_param_by_key("sensor", json!(true)));
    }

    #[test]
    fn reset_restores_defaults() {
        let mut params = store();
        let defaults = params.params().clone();
        params.set_param_by_key("address", json!("Rome"));
        params.set_param(bag(json!({"extra": 1})));
        params.reset();
        assert_eq!(params.params(), &defaults);
        assert_eq!(params.param_by_key("extra"), None);
    }
}
