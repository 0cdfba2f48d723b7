//! Configuration-driven client for the Google Maps web services.
//!
//! # Overview
//! A `MapsConfig` declares every service: base URL, verb, whether the
//! response format suffix is appended, an optional per-service API key, the
//! default parameters and the default fuzzy-lookup key. `WebService` selects
//! one service, collects parameters, builds the request and executes it
//! through a `Transport`. Responses can be returned raw, reduced to their
//! `status` field, or searched with phonetic key matching
//! (`get_response_by_key("lat")` finds `results.0.geometry.location.lat`).
//!
//! # Design
//! - Configuration is passed in explicitly; nothing is read from globals.
//! - Request building is pure (`RequestState` -> `HttpRequest`); only the
//!   `Transport` does I/O, and any closure can stand in for it.
//! - Non-2xx statuses, unknown parameter paths and fuzzy misses are data,
//!   not errors.

pub mod client;
pub mod config;
pub mod dot;
pub mod error;
pub mod extract;
pub mod http;
pub mod params;
pub mod phonetic;
pub mod query;
pub mod request;
pub mod transport;

pub use client::{Lookup, WebService};
pub use config::{MapsConfig, ServiceDefinition};
pub use error::{MapsError, Result};
pub use extract::{Extracted, ResponseExtractor, Window};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use params::ParameterStore;
pub use phonetic::{Metaphone, PhoneticEncoder};
pub use request::RequestState;
pub use transport::{Transport, UreqTransport};
