//! Error types for the Maps web-service client.
//!
//! # Design
//! Only hard failures become errors. A non-2xx HTTP status, an unknown
//! parameter path, a fuzzy lookup with no hits and a missing `status` field
//! are all reported as data, because the Google services signal most
//! problems inside a 200 response body.

/// Convenience alias used throughout the crate.
pub type Result<T, E = MapsError> = core::result::Result<T, E>;

/// Errors returned by configuration loading, request building and transport.
#[derive(thiserror::Error, Debug)]
pub enum MapsError {
    /// The configuration lacks a required entry (API key, service, endpoint
    /// table) or could not be read or parsed.
    #[error("configuration: {0}")]
    Configuration(String),

    /// The HTTP round-trip could not complete (DNS, refused connection, TLS).
    #[error("transport: {0}")]
    Transport(String),

    /// The POST payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// A response body that had to be JSON could not be decoded.
    #[error("deserialization failed: {0}")]
    Deserialization(String),
}

impl MapsError {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_category_and_message() {
        let err = MapsError::configuration("Unable to find key parameter");
        assert_eq!(err.to_string(), "configuration: Unable to find key parameter");

        let err = MapsError::transport("connection refused");
        assert_eq!(err.to_string(), "transport: connection refused");
    }
}
