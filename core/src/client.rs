//! Per-service client for the Google Maps web services.
//!
//! # Design
//! `WebService` is selected from an explicit `MapsConfig` and owns the
//! mutable parts of a session: the chosen response format and the
//! parameter set. Every fetch takes an immutable `RequestState` snapshot and
//! builds the URL from scratch, so calling `get` twice never accumulates
//! query fragments. Requests are separated into `build_request` (pure) and
//! `fetch` (I/O through the `Transport`).

use serde_json::{Map, Value};

use crate::config::{MapsConfig, ServiceDefinition, DEFAULT_FORMAT};
use crate::error::Result;
use crate::extract::{self, ResponseExtractor, Window};
use crate::http::{HttpRequest, HttpResponse};
use crate::params::ParameterStore;
use crate::phonetic::{Metaphone, PhoneticEncoder};
use crate::request::RequestState;
use crate::transport::{Transport, UreqTransport};

/// Result of `WebService::get`.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup {
    /// The raw response body, whatever its format.
    Raw(String),
    /// A fuzzy lookup: the matching fields, or the whole document when
    /// nothing matched.
    Document(Value),
}

/// Client for one configured web service.
///
/// Not meant for concurrent use: mutation goes through `&mut self`.
#[derive(Debug, Clone)]
pub struct WebService<T = UreqTransport, E = Metaphone> {
    name: String,
    definition: ServiceDefinition,
    config: MapsConfig,
    endpoint: String,
    api_key: String,
    verify_ssl_peer: bool,
    params: ParameterStore,
    transport: T,
    extractor: ResponseExtractor<E>,
}

impl WebService {
    /// Select `service` from `config`, using the blocking `ureq` transport.
    pub fn new(config: &MapsConfig, service: &str) -> Result<Self> {
        Self::with_transport(config, service, UreqTransport::new())
    }
}

impl<T: Transport> WebService<T> {
    /// Select `service` from `config` with a caller-supplied transport.
    pub fn with_transport(config: &MapsConfig, service: &str, transport: T) -> Result<Self> {
        let definition = config.validate_service(service)?.clone();
        let api_key = config.api_key_for(&definition);
        let params = ParameterStore::new(definition.param.clone());
        tracing::debug!(service, url = %definition.url, method = ?definition.method, "loaded web service");

        Ok(Self {
            name: service.to_string(),
            endpoint: config.endpoint_suffix(DEFAULT_FORMAT).to_string(),
            verify_ssl_peer: config.verify_ssl_peer(),
            config: config.clone(),
            definition,
            api_key,
            params,
            transport,
            extractor: ResponseExtractor::new(Metaphone),
        })
    }
}

impl<T: Transport, E: PhoneticEncoder> WebService<T, E> {
    /// Swap the phonetic encoder used by fuzzy lookups.
    pub fn with_encoder<F: PhoneticEncoder>(self, encoder: F) -> WebService<T, F> {
        WebService {
            name: self.name,
            definition: self.definition,
            config: self.config,
            endpoint: self.endpoint,
            api_key: self.api_key,
            verify_ssl_peer: self.verify_ssl_peer,
            params: self.params,
            transport: self.transport,
            extractor: ResponseExtractor::new(encoder),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn definition(&self) -> &ServiceDefinition {
        &self.definition
    }

    /// Choose the response format (`json`, `xml`). Unknown formats fall back
    /// to `json?`.
    pub fn set_endpoint(&mut self, format: &str) -> &mut Self {
        self.endpoint = self.config.endpoint_suffix(format).to_string();
        self
    }

    /// The current response suffix, e.g. `json?`.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Merge `bag` into the parameters; new keys are accepted.
    pub fn set_param(&mut self, bag: Map<String, Value>) -> &mut Self {
        self.params.set_param(bag);
        self
    }

    /// Set one parameter by dotted path. Paths that are not already leaves
    /// of the parameter set are ignored.
    pub fn set_param_by_key(&mut self, path: &str, value: impl Into<Value>) -> &mut Self {
        self.params.set_param_by_key(path, value.into());
        self
    }

    pub fn param(&self) -> &Map<String, Value> {
        self.params.params()
    }

    pub fn param_by_key(&self, path: &str) -> Option<&Value> {
        self.params.param_by_key(path)
    }

    /// Restore the service's default parameters.
    pub fn reset(&mut self) -> &mut Self {
        self.params.reset();
        self
    }

    /// Snapshot of the request the next fetch will send.
    pub fn request_state(&self) -> RequestState {
        RequestState {
            base_url: self.definition.url.clone(),
            method: self.definition.method,
            uses_response_endpoint: self.definition.uses_response_endpoint,
            endpoint: self.endpoint.clone(),
            api_key: self.api_key.clone(),
            verify_ssl_peer: self.verify_ssl_peer,
            parameters: self.params.params().clone(),
        }
    }

    pub fn build_request(&self) -> Result<HttpRequest> {
        self.request_state().to_http_request()
    }

    /// Execute the request and return the response whatever its status.
    pub fn fetch(&self) -> Result<HttpResponse> {
        let request = self.build_request()?;
        let response = self.transport.execute(&request)?;
        if !response.is_success() {
            tracing::warn!(service = %self.name, http_status = response.status, "non-success response");
        }
        Ok(response)
    }

    /// Without a needle, the raw response body. With one, a fuzzy lookup as
    /// in `get_response_by_key`.
    pub fn get(&mut self, needle: Option<&str>) -> Result<Lookup> {
        match needle.filter(|n| !n.is_empty()) {
            None => Ok(Lookup::Raw(self.fetch()?.body)),
            Some(needle) => Ok(Lookup::Document(self.get_response_by_key(Some(needle), 0, None)?)),
        }
    }

    /// Fetch as JSON and keep the fields that sound like `needle` (or like
    /// the service's default response key when no needle is given).
    ///
    /// `offset` and `length` slice the matching fields in document order.
    /// When nothing matches, the whole decoded document is returned.
    /// Switches the response format to JSON.
    pub fn get_response_by_key(
        &mut self,
        needle: Option<&str>,
        offset: usize,
        length: Option<usize>,
    ) -> Result<Value> {
        self.set_endpoint(DEFAULT_FORMAT);
        let response = self.fetch()?;
        let needle = match needle.filter(|n| !n.is_empty()) {
            Some(needle) => needle,
            None => self.definition.response_default_key.as_str(),
        };
        let found = self
            .extractor
            .by_key(&response.body, needle, Window::new(offset, length))?;
        Ok(found.into_value())
    }

    /// Fetch as JSON and return the top-level `status` field, or `None` if
    /// the body has none. Switches the response format to JSON.
    pub fn status(&mut self) -> Result<Option<Value>> {
        self.set_endpoint(DEFAULT_FORMAT);
        let response = self.fetch()?;
        let status = extract::status_field(&response.body);
        if status.is_none() {
            tracing::debug!(service = %self.name, http_status = response.status, "response has no status field");
        }
        Ok(status)
    }
}
