//! Shared HTTP configuration: base endpoint and default headers.
//!
//! # Design
//! One `HttpConfig` exists per application session and sits behind
//! `SharedConfig`. Every clone of `ApiClient` points at the same instance,
//! so a header set in one place is seen by the next request dispatched
//! anywhere else. Writes are last-write-wins and there is no per-request
//! isolation.
//!
//! The lock is only held to apply a write or copy a snapshot. Nothing holds
//! it across an await, and a poisoned lock is recovered because none of the
//! writes can leave the map half-updated.

use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Backend API root used when no endpoint is given.
pub const DEFAULT_BASE_ENDPOINT: &str = "http://backend/api/v1";

pub const AUTHORIZATION: &str = "Authorization";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpConfig {
    base_endpoint: String,
    default_headers: BTreeMap<String, String>,
}

impl HttpConfig {
    pub fn new(base_endpoint: &str) -> Self {
        Self {
            base_endpoint: base_endpoint.trim_end_matches('/').to_string(),
            default_headers: BTreeMap::new(),
        }
    }

    pub fn base_endpoint(&self) -> &str {
        &self.base_endpoint
    }

    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.default_headers
    }

    /// Join `resource` onto the base endpoint with a single `/`.
    ///
    /// Absolute URLs pass through unchanged and an empty resource resolves
    /// to the endpoint itself.
    pub fn resolve(&self, resource: &str) -> String {
        if is_absolute(resource) {
            return resource.to_string();
        }
        let path = resource.trim_start_matches('/');
        if path.is_empty() {
            return self.base_endpoint.clone();
        }
        format!("{}/{path}", self.base_endpoint)
    }

    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.default_headers.insert(name.into(), value.into());
    }

    /// Insert or overwrite each entry. Keys not mentioned are kept.
    pub fn merge_headers<I, K, V>(&mut self, headers: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (name, value) in headers {
            self.set_header(name, value);
        }
    }

    pub fn clear_headers(&mut self) {
        self.default_headers.clear();
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_ENDPOINT)
    }
}

/// Handle to the session's configuration, cloned into every facade.
#[derive(Debug, Clone, Default)]
pub struct SharedConfig(Arc<RwLock<HttpConfig>>);

impl SharedConfig {
    pub fn new(config: HttpConfig) -> Self {
        Self(Arc::new(RwLock::new(config)))
    }

    pub fn read(&self) -> RwLockReadGuard<'_, HttpConfig> {
        self.0.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, HttpConfig> {
        self.0.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Copy of the configuration as it is right now.
    pub fn snapshot(&self) -> HttpConfig {
        self.read().clone()
    }
}

fn is_absolute(resource: &str) -> bool {
    match resource.split_once("://") {
        Some((scheme, _)) => {
            !scheme.is_empty()
                && scheme
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        None => false,
    }
}
