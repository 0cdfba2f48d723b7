//! Query-string rendering for GET services.
//!
//! Google's web services take structured values in flattened text form:
//! pipe-separated lists (`waypoints=a|b`), `name:value` filters
//! (`components=country:US|postal_code:94043`) and `lat,lng` pairs. Unset
//! parameters (null, empty strings, empty lists) are left out entirely.

use serde_json::{Map, Value};

use crate::error::{MapsError, Result};

/// Render `params` as an `application/x-www-form-urlencoded` string.
pub fn to_query_string(params: &Map<String, Value>) -> Result<String> {
    let pairs: Vec<(&str, String)> = params
        .iter()
        .filter_map(|(name, value)| render(value).map(|text| (name.as_str(), text)))
        .collect();
    serde_urlencoded::to_string(pairs).map_err(|e| MapsError::Serialization(e.to_string()))
}

/// Text form of one parameter value, `None` when the value is unset.
pub fn render(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(items) => join(items.iter().filter_map(render), "|"),
        Value::Object(map) => render_object(map),
    }
}

fn render_object(map: &Map<String, Value>) -> Option<String> {
    if map.len() == 2 {
        if let (Some(lat), Some(lng)) = (map.get("lat"), map.get("lng")) {
            return Some(format!("{},{}", render(lat)?, render(lng)?));
        }
    }
    join(
        map.iter()
            .filter_map(|(name, value)| render(value).map(|text| format!("{name}:{text}"))),
        "|",
    )
}

fn join(parts: impl Iterator<Item = String>, sep: &str) -> Option<String> {
    let parts: Vec<String> = parts.collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(sep))
    }
}
