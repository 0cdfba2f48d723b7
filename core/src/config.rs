//! Service configuration: the API key, TLS policy, response format suffixes
//! and the per-service definitions.
//!
//! # Design
//! Configuration is an explicit value handed to `WebService::new`; nothing
//! is read from globals. Validation happens once, when a service is
//! selected, and checks the same three things in the same order every time:
//! the API key entry, the named service, the endpoint table.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{MapsError, Result};
use crate::http::HttpMethod;

/// Format selected when a service is first loaded.
pub const DEFAULT_FORMAT: &str = "json";

/// Suffix used when a requested format has no entry in the endpoint table.
pub const DEFAULT_ENDPOINT: &str = "json?";

const BUNDLED: &str = include_str!("../config/googlemaps.toml");

/// Definition of one web service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceDefinition {
    pub url: String,

    #[serde(rename = "type", default)]
    pub method: HttpMethod,

    /// Append the response format suffix (`json?`, `xml?`) to `url`.
    #[serde(rename = "endpoint", default)]
    pub uses_response_endpoint: bool,

    /// Per-service API key; an empty or missing key falls back to the
    /// top-level one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,

    /// Needle used by fuzzy lookups when the caller gives none.
    #[serde(default)]
    pub response_default_key: String,

    /// Parameter defaults, in declaration order.
    #[serde(default)]
    pub param: Map<String, Value>,
}

/// Top-level client configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MapsConfig {
    #[serde(default)]
    pub key: Option<String>,

    #[serde(default)]
    pub ssl_verify_peer: Option<bool>,

    /// Response format name to URL suffix, e.g. `json` to `json?`.
    #[serde(default)]
    pub endpoint: BTreeMap<String, String>,

    #[serde(default, rename = "service")]
    pub services: BTreeMap<String, ServiceDefinition>,
}

impl MapsConfig {
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read_to_string(path)
            .map_err(|e| MapsError::configuration(format!("unable to read {}: {e}", path.display())))?;
        Self::from_toml_str(&data)
    }

    pub fn from_toml_str(data: &str) -> Result<Self> {
        toml::from_str(data).map_err(|e| MapsError::configuration(format!("toml parse error: {e}")))
    }

    /// The built-in Google Maps service table with `api_key` as the default
    /// key.
    pub fn bundled(api_key: impl Into<String>) -> Result<Self> {
        let mut cfg = Self::from_toml_str(BUNDLED)?;
        cfg.key = Some(api_key.into());
        Ok(cfg)
    }

    /// Check that `service` can be loaded and return its definition.
    pub fn validate_service(&self, service: &str) -> Result<&ServiceDefinition> {
        if self.key.is_none() {
            return Err(MapsError::configuration(
                "Unable to find key parameter in configuration",
            ));
        }
        let definition = self.services.get(service).ok_or_else(|| {
            MapsError::configuration(format!(
                "Web service '{service}' must be declared in the configuration"
            ))
        })?;
        if self.endpoint.is_empty() {
            return Err(MapsError::configuration("End point must not be empty"));
        }
        Ok(definition)
    }

    /// API key for `definition`: its own key when non-empty, otherwise the
    /// top-level key.
    pub fn api_key_for(&self, definition: &ServiceDefinition) -> String {
        definition
            .key
            .as_deref()
            .filter(|key| !key.is_empty())
            .or(self.key.as_deref())
            .unwrap_or_default()
            .to_string()
    }

    /// URL suffix for a response format, falling back to `json?`.
    pub fn endpoint_suffix(&self, format: &str) -> &str {
        self.endpoint
            .get(format)
            .map(String::as_str)
            .unwrap_or(DEFAULT_ENDPOINT)
    }

    pub fn verify_ssl_peer(&self) -> bool {
        self.ssl_verify_peer.unwrap_or(false)
    }
}
