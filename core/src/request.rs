//! Request composition.
//!
//! # Design
//! A `RequestState` is an immutable snapshot of everything one request
//! needs: the service URL and verb, the chosen response suffix, the API key,
//! the TLS policy and the parameters. The URL is assembled from scratch on
//! every call, so building twice from the same state gives the same request.

use serde_json::{Map, Value};

use crate::error::{MapsError, Result};
use crate::http::{HttpMethod, HttpRequest};
use crate::query;

/// Snapshot of one request, ready to be turned into an `HttpRequest`.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestState {
    pub base_url: String,
    pub method: HttpMethod,
    pub uses_response_endpoint: bool,
    /// Resolved response suffix, e.g. `json?`.
    pub endpoint: String,
    pub api_key: String,
    pub verify_ssl_peer: bool,
    pub parameters: Map<String, Value>,
}

impl RequestState {
    /// URL up to and including the API key:
    /// `<base_url>[<endpoint>]key=<api_key>`.
    pub fn resolved_url(&self) -> Result<String> {
        let mut url = self.base_url.clone();
        if self.uses_response_endpoint {
            url.push_str(&self.endpoint);
        }
        let key = serde_urlencoded::to_string(&[("key", self.api_key.as_str())][..])
            .map_err(|e| MapsError::Serialization(e.to_string()))?;
        url.push_str(&key);
        Ok(url)
    }

    /// Build the transport-ready request.
    ///
    /// GET services carry the parameters in the query string. POST services
    /// send the whole parameter map as a JSON body and keep only the API key
    /// in the URL.
    pub fn to_http_request(&self) -> Result<HttpRequest> {
        let mut url = self.resolved_url()?;
        match self.method {
            HttpMethod::Post => {
                let body = serde_json::to_string(&self.parameters)
                    .map_err(|e| MapsError::Serialization(e.to_string()))?;
                Ok(HttpRequest {
                    method: HttpMethod::Post,
                    url,
                    headers: vec![("content-type".to_string(), "application/json".to_string())],
                    body: Some(body),
                    verify_peer: self.verify_ssl_peer,
                })
            }
            HttpMethod::Get => {
                let query = query::to_query_string(&self.parameters)?;
                if !query.is_empty() {
                    url.push('&');
                    url.push_str(&query);
                }
                Ok(HttpRequest {
                    method: HttpMethod::Get,
                    url,
                    headers: Vec::new(),
                    body: None,
                    verify_peer: self.verify_ssl_peer,
                })
            }
        }
    }
}
