//! Blocking HTTP execution.
//!
//! # Design
//! `Transport` is the only seam that touches the network. The default
//! implementation drives `ureq` with status-as-error disabled, so a 403
//! from Google comes back as data for the caller to inspect through the
//! response body. Any `Fn(&HttpRequest) -> Result<HttpResponse>` is also a
//! transport, which lets tests and hosts with their own HTTP stack plug in.

use ureq::tls::TlsConfig;
use ureq::Agent;

use crate::error::{MapsError, Result};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Executes one request and returns the raw response.
pub trait Transport {
    /// Fails only when the round-trip cannot complete; any HTTP status is
    /// returned as a response.
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse>;
}

impl<F> Transport for F
where
    F: Fn(&HttpRequest) -> Result<HttpResponse>,
{
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse> {
        self(request)
    }
}

/// `ureq`-backed transport. Follows redirects; TLS verification follows
/// `HttpRequest::verify_peer`.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    max_redirects: u32,
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self { max_redirects: 10 }
    }
}

impl UreqTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_redirects(mut self, max_redirects: u32) -> Self {
        self.max_redirects = max_redirects;
        self
    }

    fn agent(&self, verify_peer: bool) -> Agent {
        let tls = TlsConfig::builder()
            .disable_verification(!verify_peer)
            .build();
        Agent::config_builder()
            .http_status_as_error(false)
            .max_redirects(self.max_redirects)
            .tls_config(tls)
            .build()
            .new_agent()
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse> {
        let agent = self.agent(request.verify_peer);
        let endpoint = request.url.split('?').next().unwrap_or_default();
        tracing::debug!(method = ?request.method, endpoint, "sending request");

        let result = match request.method {
            HttpMethod::Get => {
                let mut builder = agent.get(&request.url);
                for (name, value) in &request.headers {
                    builder = builder.header(name.as_str(), value.as_str());
                }
                builder.call()
            }
            HttpMethod::Post => {
                let mut builder = agent.post(&request.url);
                for (name, value) in &request.headers {
                    builder = builder.header(name.as_str(), value.as_str());
                }
                match &request.body {
                    Some(body) => builder.send(body.as_bytes()),
                    None => builder.send_empty(),
                }
            }
        };

        let mut response = result.map_err(|e| {
            tracing::warn!(endpoint, error = %e, "request failed");
            MapsError::transport(e.to_string())
        })?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    value.to_str().unwrap_or_default().to_string(),
                )
            })
            .collect();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| MapsError::transport(e.to_string()))?;

        tracing::debug!(endpoint, status, bytes = body.len(), "received response");
        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}
