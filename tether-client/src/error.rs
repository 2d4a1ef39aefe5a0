//! Error types for request construction and dispatch.

use thiserror::Error;

/// Why a descriptor could not be materialized into a request.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum BuildError {
    /// Neither the per-call descriptor nor the base set a scheme.
    #[error("request scheme is not set")]
    MissingScheme,

    /// Neither the per-call descriptor nor the base set a host.
    #[error("request host is not set")]
    MissingHost,

    /// Scheme, host, path and query did not form a valid URL.
    #[error("invalid request URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// A header name or value is not legal HTTP.
    #[error("invalid header `{name}`")]
    InvalidHeader {
        /// The offending header name.
        name: String,
    },

    /// The JSON body could not be serialized.
    #[error("failed to serialize request body: {0}")]
    Body(#[from] serde_json::Error),
}

/// Why an API call failed.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ApiError {
    /// The effective descriptor could not be built.
    #[error("request could not be built: {0}")]
    Build(#[from] BuildError),

    /// The transport failed before a response arrived.
    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),

    /// The platform rejected the credentials (HTTP 401).
    #[error("authentication failed: {body}")]
    Unauthorized {
        /// Response body text.
        body: String,
    },

    /// The credentials lack permission (HTTP 403).
    #[error("access denied: {body}")]
    Forbidden {
        /// Response body text.
        body: String,
    },

    /// The resource does not exist (HTTP 404).
    #[error("resource not found: {body}")]
    NotFound {
        /// Response body text.
        body: String,
    },

    /// Any other non-success status.
    #[error("HTTP {status}: {body}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Response body text.
        body: String,
    },

    /// The response body was not valid JSON.
    #[error("invalid JSON response: {0}")]
    InvalidJson(#[source] serde_json::Error),

    /// The response payload did not decode as the expected resource.
    #[error("response decode failed: {0}")]
    Decode(#[from] tether_core::DecodeError),
}

/// Map a non-success HTTP status to the error taxonomy.
pub(crate) fn map_status(status: reqwest::StatusCode, body: String) -> ApiError {
    match status.as_u16() {
        401 => ApiError::Unauthorized { body },
        403 => ApiError::Forbidden { body },
        404 => ApiError::NotFound { body },
        _ => ApiError::Http {
            status: status.as_u16(),
            body,
        },
    }
}
