//! Error types for the API client.
//!
//! # Design
//! The facade itself defines no errors: configuration setters are total and
//! every verb returns the transport's own error type unchanged. What lives
//! here are the errors of the bundled reqwest transport and of the strict
//! key-case translator.
//!
//! `TransportError::Status` keeps the whole response so callers can still
//! read the body of a 401 or 422, the same way they would on success.

use thiserror::Error;

#[cfg(feature = "reqwest")]
use crate::http::HttpResponse;

/// Failures reported by `ReqwestTransport`.
#[cfg(feature = "reqwest")]
#[derive(Debug, Error)]
pub enum TransportError {
    /// The request never produced a response: connection refused, timeout,
    /// invalid header, and so on.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The server answered with a non-2xx status.
    #[error("HTTP {}: {}", .0.status, .0.body)]
    Status(HttpResponse),
}

#[cfg(feature = "reqwest")]
impl TransportError {
    /// Status code of the rejected response, if there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Network(err) => err.status().map(|s| s.as_u16()),
            TransportError::Status(response) => Some(response.status),
        }
    }

    pub fn response(&self) -> Option<&HttpResponse> {
        match self {
            TransportError::Status(response) => Some(response),
            TransportError::Network(_) => None,
        }
    }
}

/// Two distinct input keys converted to the same output key.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("keys {first:?} and {second:?} both convert to {converted:?}")]
pub struct KeyCollision {
    pub converted: String,
    pub first: String,
    pub second: String,
}
