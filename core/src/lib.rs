//! Client-side access facade for the backend API.
//!
//! # Overview
//! `ApiClient` is the single place outgoing requests go through. It owns the
//! session's shared HTTP configuration (base endpoint, default headers,
//! bearer token) and exposes `get`/`post`/`put`/`patch`/`delete`, each of
//! which builds an `HttpRequest` and hands it to an injected `Transport`.
//! The `case` module converts mapping keys between the client's camelCase
//! and the backend's snake_case for call sites that need it.
//!
//! # Design
//! - The facade is a convention and state layer only: no retries, pooling
//!   or error translation. The transport's result comes back unchanged.
//! - Configuration is an explicit `SharedConfig` owned by the session and
//!   shared by every clone of the client, rather than global state.
//! - Requests and responses are plain data so tests can inspect exactly
//!   what would be sent.
//! - `ReqwestTransport` (feature `reqwest`) is the bundled transport.

pub mod case;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod transport;

pub use client::{ApiClient, Payload};
pub use config::{HttpConfig, SharedConfig, DEFAULT_BASE_ENDPOINT};
pub use error::KeyCollision;
#[cfg(feature = "reqwest")]
pub use error::TransportError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use transport::Transport;
#[cfg(feature = "reqwest")]
pub use transport::ReqwestTransport;
