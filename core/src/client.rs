//! The API client facade.
//!
//! # Design
//! `ApiClient` pairs a `SharedConfig` with an injected `Transport`. Each verb
//! builds an `HttpRequest` from a snapshot of the configuration taken at
//! dispatch time, sends it, and returns the transport's result untouched:
//! no retry, no timeout, no error mapping.
//!
//! Clones share both the configuration and the transport, so one client per
//! application session is enough. Header changes made through any clone
//! apply to every request dispatched after the write. A request racing with
//! a concurrent write sees whichever value was current when its snapshot was
//! taken; that ordering is not otherwise controlled.

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::config::{HttpConfig, SharedConfig, AUTHORIZATION};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::transport::Transport;

/// Query parameters or JSON body of a request.
pub type Payload = Map<String, Value>;

const CONTENT_TYPE: &str = "content-type";
const APPLICATION_JSON: &str = "application/json";

pub struct ApiClient<T> {
    config: SharedConfig,
    transport: Arc<T>,
}

impl<T> Clone for ApiClient<T> {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            transport: Arc::clone(&self.transport),
        }
    }
}

impl<T: Transport> ApiClient<T> {
    /// Client against `DEFAULT_BASE_ENDPOINT` with no default headers.
    pub fn new(transport: T) -> Self {
        Self::with_config(SharedConfig::default(), transport)
    }

    pub fn with_base_endpoint(base_endpoint: &str, transport: T) -> Self {
        Self::with_config(SharedConfig::new(HttpConfig::new(base_endpoint)), transport)
    }

    pub fn with_config(config: SharedConfig, transport: T) -> Self {
        Self {
            config,
            transport: Arc::new(transport),
        }
    }

    pub fn config(&self) -> &SharedConfig {
        &self.config
    }

    pub fn base_endpoint(&self) -> String {
        self.config.read().base_endpoint().to_string()
    }

    /// Current default headers, sorted by name.
    pub fn headers(&self) -> Vec<(String, String)> {
        header_pairs(&self.config.read())
    }

    /// Merge `headers` into the defaults. Existing keys that are not
    /// mentioned keep their values.
    pub fn set_headers<I, K, V>(&self, headers: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut config = self.config.write();
        config.merge_headers(headers);
        tracing::debug!(count = config.headers().len(), "default headers updated");
    }

    /// Set `Authorization: Bearer <token>` on every later request.
    pub fn set_authorization(&self, token: &str) {
        self.config
            .write()
            .set_header(AUTHORIZATION, format!("Bearer {token}"));
        tracing::debug!("authorization header set");
    }

    /// Drop every default header, authorization included.
    pub fn remove_all_headers(&self) {
        self.config.write().clear_headers();
        tracing::debug!("default headers cleared");
    }

    pub async fn get(
        &self,
        resource: &str,
        params: Option<&Payload>,
    ) -> Result<HttpResponse, T::Error> {
        let query = params.map(query_pairs).unwrap_or_default();
        self.dispatch(self.build_request(HttpMethod::Get, resource, query, None))
            .await
    }

    pub async fn post(
        &self,
        resource: &str,
        data: Option<&Payload>,
    ) -> Result<HttpResponse, T::Error> {
        self.dispatch(self.build_request(HttpMethod::Post, resource, Vec::new(), data))
            .await
    }

    pub async fn put(&self, resource: &str, data: &Payload) -> Result<HttpResponse, T::Error> {
        self.dispatch(self.build_request(HttpMethod::Put, resource, Vec::new(), Some(data)))
            .await
    }

    pub async fn patch(&self, resource: &str, data: &Payload) -> Result<HttpResponse, T::Error> {
        self.dispatch(self.build_request(HttpMethod::Patch, resource, Vec::new(), Some(data)))
            .await
    }

    pub async fn delete(&self, resource: &str) -> Result<HttpResponse, T::Error> {
        self.dispatch(self.build_request(HttpMethod::Delete, resource, Vec::new(), None))
            .await
    }

    /// Build the request a verb would send, using the configuration as it
    /// is right now.
    pub fn build_request(
        &self,
        method: HttpMethod,
        resource: &str,
        query: Vec<(String, String)>,
        body: Option<&Payload>,
    ) -> HttpRequest {
        let config = self.config.read();
        let mut headers = header_pairs(&config);
        let body = body.map(|data| Value::Object(data.clone()).to_string());
        if body.is_some() && !headers.iter().any(|(k, _)| k.eq_ignore_ascii_case(CONTENT_TYPE)) {
            headers.push((CONTENT_TYPE.to_string(), APPLICATION_JSON.to_string()));
        }
        HttpRequest {
            method,
            url: config.resolve(resource),
            query,
            headers,
            body,
        }
    }

    async fn dispatch(&self, request: HttpRequest) -> Result<HttpResponse, T::Error> {
        tracing::debug!(method = %request.method, url = %request.url, "dispatching request");
        self.transport.send(request).await
    }
}

fn header_pairs(config: &HttpConfig) -> Vec<(String, String)> {
    config
        .headers()
        .iter()
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

/// Flatten query parameters into name/value pairs.
///
/// Strings go through verbatim, other scalars as their JSON text. `null` is
/// skipped, arrays repeat the key as `key[]`, and nested objects are sent as
/// JSON.
pub fn query_pairs(params: &Payload) -> Vec<(String, String)> {
    let mut pairs = Vec::with_capacity(params.len());
    for (key, value) in params {
        match value {
            Value::Null => {}
            Value::Array(items) => {
                let name = format!("{key}[]");
                for item in items.iter().filter(|v| !v.is_null()) {
                    pairs.push((name.clone(), scalar_text(item)));
                }
            }
            other => pairs.push((key.clone(), scalar_text(other))),
        }
    }
    pairs
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
