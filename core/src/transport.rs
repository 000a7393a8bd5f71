//! The HTTP transport seam.
//!
//! `ApiClient` never performs I/O itself. It hands an `HttpRequest` to a
//! `Transport` and returns the result as-is, so anything that can execute a
//! request (a real HTTP client, a recording fake in tests) can sit behind
//! the facade.

use async_trait::async_trait;

use crate::http::{HttpRequest, HttpResponse};

/// Capability that executes one HTTP request.
///
/// Timeouts, cancellation and status classification are the
/// implementation's business; the facade passes its result through
/// unexamined.
#[async_trait]
pub trait Transport: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, Self::Error>;
}

#[cfg(feature = "reqwest")]
pub use self::reqwest_transport::ReqwestTransport;

#[cfg(feature = "reqwest")]
mod reqwest_transport {
    use async_trait::async_trait;
    use reqwest::{Client, Method};

    use super::Transport;
    use crate::error::TransportError;
    use crate::http::{HttpMethod, HttpRequest, HttpResponse};

    /// `Transport` backed by a `reqwest::Client`.
    ///
    /// Non-2xx answers are rejected with `TransportError::Status`, matching
    /// the browser client convention the backend's callers expect.
    #[derive(Debug, Clone, Default)]
    pub struct ReqwestTransport {
        client: Client,
    }

    impl ReqwestTransport {
        pub fn new() -> Self {
            Self::default()
        }

        /// Use a preconfigured client (timeouts, proxies, TLS roots).
        pub fn with_client(client: Client) -> Self {
            Self { client }
        }
    }

    #[async_trait]
    impl Transport for ReqwestTransport {
        type Error = TransportError;

        async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
            let mut builder = self.client.request(method(request.method), &request.url);
            if !request.query.is_empty() {
                builder = builder.query(&request.query);
            }
            for (name, value) in &request.headers {
                builder = builder.header(name.as_str(), value.as_str());
            }
            if let Some(body) = request.body {
                builder = builder.body(body);
            }

            let response = builder.send().await?;
            let status = response.status().as_u16();
            let headers = response
                .headers()
                .iter()
                .map(|(name, value)| {
                    (
                        name.as_str().to_string(),
                        String::from_utf8_lossy(value.as_bytes()).into_owned(),
                    )
                })
                .collect();
            let body = response.text().await?;

            let response = HttpResponse {
                status,
                headers,
                body,
            };
            if !response.is_success() {
                return Err(TransportError::Status(response));
            }
            Ok(response)
        }
    }

    fn method(method: HttpMethod) -> Method {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Patch => Method::PATCH,
            HttpMethod::Delete => Method::DELETE,
        }
    }

}
