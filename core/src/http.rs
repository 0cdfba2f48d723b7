//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! Requests and responses are plain data. The request builder produces an
//! `HttpRequest` without touching the network; a `Transport` turns it into
//! an `HttpResponse`. Keeping the two apart lets every part of the client
//! except the transport itself be tested without sockets.

use serde::{Deserialize, Serialize};

/// HTTP verb of a configured service. Google Maps services only use GET and
/// POST.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
}

/// An HTTP request described as plain data.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
    /// Whether the transport must verify the server's TLS certificate.
    pub verify_peer: bool,
}

/// An HTTP response described as plain data.
///
/// Any status code is carried as-is; the client never treats a non-2xx
/// status as an error.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
