//! Fuzzy extraction of values from JSON responses.
//!
//! # Design
//! Google nests the interesting fields at service-specific depths
//! (`results.0.geometry.location.lat` for geocoding, `location.lat` for
//! geolocation). Instead of asking callers for exact paths, the extractor
//! flattens the document and keeps every leaf whose last path segment
//! sounds like the needle. Two different field names can share a code; that
//! false-positive risk is accepted in exchange for path independence.
//!
//! A lookup with no hits is not an error: the whole decoded document comes
//! back as `Extracted::Unmatched`.

use serde_json::{Map, Value};

use crate::dot;
use crate::error::{MapsError, Result};
use crate::phonetic::{Metaphone, PhoneticEncoder};

/// Outcome of a fuzzy lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum Extracted {
    /// The matching leaves, rebuilt into nested objects along their paths.
    Matched(Value),
    /// Nothing matched; carries the full decoded document.
    Unmatched(Value),
}

impl Extracted {
    pub fn is_match(&self) -> bool {
        matches!(self, Extracted::Matched(_))
    }

    pub fn into_value(self) -> Value {
        match self {
            Extracted::Matched(value) | Extracted::Unmatched(value) => value,
        }
    }
}

/// Slice applied to the matching leaves, in document order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Window {
    pub offset: usize,
    pub length: Option<usize>,
}

impl Window {
    pub fn new(offset: usize, length: Option<usize>) -> Self {
        Self { offset, length }
    }

    /// Every match.
    pub fn all() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ResponseExtractor<E = Metaphone> {
    encoder: E,
}

impl<E: PhoneticEncoder> ResponseExtractor<E> {
    pub fn new(encoder: E) -> Self {
        Self { encoder }
    }

    /// Decode `body` as JSON and look up `needle` in it.
    pub fn by_key(&self, body: &str, needle: &str, window: Window) -> Result<Extracted> {
        let document: Value =
            serde_json::from_str(body).map_err(|e| MapsError::Deserialization(e.to_string()))?;
        Ok(self.lookup(&document, needle, window))
    }

    /// Keep the leaves of `document` whose last path segment encodes like
    /// `needle`. Segment codes are cut to the needle code's length before
    /// comparing, so `lat` also matches `latitude`. A needle without a
    /// phonetic code (`""`, `"1"`, `"é"`) matches nothing.
    pub fn lookup(&self, document: &Value, needle: &str, window: Window) -> Extracted {
        let code = self.encoder.encode(needle, 0);
        if code.is_empty() {
            tracing::debug!(needle, "needle has no phonetic code, returning full document");
            return Extracted::Unmatched(document.clone());
        }
        let hits: Vec<(String, &Value)> = dot::flatten(document)
            .into_iter()
            .filter(|(path, _)| self.encoder.encode(dot::last_segment(path), code.len()) == code)
            .collect();

        if hits.is_empty() {
            tracing::debug!(needle, code = %code, "no phonetic match, returning full document");
            return Extracted::Unmatched(document.clone());
        }

        let mut out = Map::new();
        let take = window.length.unwrap_or(usize::MAX);
        for (path, value) in hits.into_iter().skip(window.offset).take(take) {
            dot::set(&mut out, &path, value.clone());
        }
        Extracted::Matched(Value::Object(out))
    }
}

/// The top-level `status` field of a JSON body, if the body is JSON and has
/// one.
pub fn status_field(body: &str) -> Option<Value> {
    let document: Value = serde_json::from_str(body).ok()?;
    document.get("status").cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const GEOCODE: &str =
        r#"{"results":[{"geometry":{"location":{"lat":1.23,"lng":4.56}}}],"status":"OK"}"#;

    fn extractor() -> ResponseExtractor {
        ResponseExtractor::new(Metaphone)
    }

    fn flat(value: &Value) -> Vec<(String, Value)> {
        dot::flatten(value)
            .into_iter()
            .map(|(path, leaf)| (path, leaf.clone()))
            .collect()
    }

    #[test]
    fn status_is_read_from_top_level() {
        assert_eq!(status_field(GEOCODE), Some(json!("OK")));
        assert_eq!(status_field(r#"{"results":[]}"#), None);
        assert_eq!(status_field("<status>OK</status>"), None);
    }

    #[test]
    fn lat_matches_nested_latitude_only() {
        let found = extractor().by_key(GEOCODE, "lat", Window::all()).unwrap();
        assert!(found.is_match());
        assert_eq!(
            flat(&found.into_value()),
            vec![("results.0.geometry.location.lat".to_string(), json!(1.23))]
        );
    }

    #[test]
    fn miss_returns_whole_document() {
        let found = extractor().by_key(GEOCODE, "elevation", Window::all()).unwrap();
        assert!(!found.is_match());
        let original: Value = serde_json::from_str(GEOCODE).unwrap();
        assert_eq!(found.into_value(), original);
    }

    #[test]
    fn needle_without_code_never_matches_array_indices() {
        let doc = json!({
            "results": [{"types": ["street_address"], "geometry": {"location": {"lat": 1.0}}}],
            "status": "OK"
        });
        for needle in ["", "1", "_", "é"] {
            let found = extractor().lookup(&doc, needle, Window::all());
            assert_eq!(found, Extracted::Unmatched(doc.clone()), "needle {needle:?}");
        }
    }

    #[test]
    fn needle_prefix_matches_longer_fields() {
        let doc = json!({"location": {"lat": 1, "lng": 2}, "latitude": 3});
        let found = extractor().lookup(&doc, "lat", Window::all());
        assert_eq!(found.into_value(), json!({"location": {"lat": 1}, "latitude": 3}));
    }

    #[test]
    fn spelling_variants_match() {
        let doc = json!({"result": {"formatted_address": "1 Main St", "name": "Home"}});
        let found = extractor().lookup(&doc, "formated_adress", Window::all());
        assert_eq!(
            found.into_value(),
            json!({"result": {"formatted_address": "1 Main St"}})
        );
    }

    #[test]
    fn window_slices_matches_in_document_order() {
        let doc = json!({"results": [{"lat": 1}, {"lat": 2}, {"lat": 3}]});
        let found = extractor().lookup(&doc, "lat", Window::new(1, Some(1)));
        assert_eq!(flat(&found.into_value()), vec![("results.1.lat".to_string(), json!(2))]);

        let found = extractor().lookup(&doc, "lat", Window::new(5, None));
        assert_eq!(found, Extracted::Matched(json!({})));
    }

    #[test]
    fn invalid_json_is_a_deserialization_error() {
        let err = extractor().by_key("<xml/>", "lat", Window::all()).unwrap_err();
        assert!(matches!(err, MapsError::Deserialization(_)));
    }

    #[test]
    fn encoder_is_pluggable() {
        let exact = ResponseExtractor::new(|word: &str, _max: usize| word.to_string());
        let doc = json!({"lat": 1, "latitude": 2});
        assert_eq!(exact.lookup(&doc, "lat", Window::all()).into_value(), json!({"lat": 1}));
    }
}
