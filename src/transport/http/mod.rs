use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, Proxy};
use thiserror::Error;
use tracing::debug;

use crate::core::error::{ConfigError, EngineError};
use crate::core::types::{EngineId, ProxySpec};

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// Transport-neutral outbound request.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub json_body: Option<serde_json::Value>,
}

impl HttpRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Get,
            url: url.into(),
            query: Vec::new(),
            headers: Vec::new(),
            json_body: None,
        }
    }

    pub fn post_json(url: impl Into<String>, body: serde_json::Value) -> Self {
        Self {
            method: HttpMethod::Post,
            url: url.into(),
            query: Vec::new(),
            headers: Vec::new(),
            json_body: Some(body),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status_code: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("invalid request: {message}")]
    InvalidRequest { message: String },
    #[error("network failure: {message}")]
    Network { message: String },
    #[error("request timed out: {message}")]
    Timeout { message: String },
}

impl TransportError {
    /// Maps a transport failure onto the engine that issued the request.
    pub fn into_engine_error(self, engine: EngineId) -> EngineError {
        match self {
            Self::InvalidRequest { message } => EngineError::config(engine, message),
            error @ (Self::Network { .. } | Self::Timeout { .. }) => {
                EngineError::network(engine, error.to_string())
            }
        }
    }
}

/// "Send a request, get status and body or a network error."
///
/// Non-2xx statuses are returned as ordinary responses; judging them is the
/// caller's job.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// [`HttpClient`] backed by reqwest with a fixed timeout and optional proxy.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Result<reqwest::Client, String>,
    timeout: Duration,
}

impl ReqwestTransport {
    /// Builds the transport. A proxy URL reqwest cannot use does not fail
    /// here; each `send` reports it as a network failure instead.
    pub fn new(timeout_secs: u64, proxy: Option<&ProxySpec>) -> Result<Self, ConfigError> {
        Self::validate_timeout(timeout_secs)?;
        let timeout = Duration::from_secs(timeout_secs);

        Ok(Self {
            client: build_client(timeout, proxy),
            timeout,
        })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn validate_timeout(timeout_secs: u64) -> Result<(), ConfigError> {
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout { timeout_secs });
        }
        Ok(())
    }
}

#[async_trait]
impl HttpClient for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let client = self
            .client
            .as_ref()
            .map_err(|message| TransportError::Network {
                message: format!("proxy unavailable: {message}"),
            })?;

        let method = match request.method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
        };

        let mut builder = client
            .request(method, &request.url)
            .timeout(self.timeout)
            .headers(build_headers(&request.headers)?);

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }

        if let Some(body) = &request.json_body {
            let payload =
                serde_json::to_vec(body).map_err(|error| invalid_request(error.to_string()))?;
            builder = builder
                .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
                .body(payload);
        }

        let response = builder.send().await.map_err(map_reqwest_error)?;
        let status_code = response.status().as_u16();
        debug!(url = %request.url, status_code, "http response received");

        let body = response.text().await.map_err(map_reqwest_error)?;

        Ok(HttpResponse { status_code, body })
    }
}

fn build_client(timeout: Duration, proxy: Option<&ProxySpec>) -> Result<reqwest::Client, String> {
    let mut builder = reqwest::Client::builder().timeout(timeout);

    if let Some(proxy) = proxy {
        let slots = proxy.slots();
        let http = Proxy::http(&slots.http).map_err(|error| error.to_string())?;
        let https = Proxy::https(&slots.https).map_err(|error| error.to_string())?;
        builder = builder.proxy(http).proxy(https);
    }

    builder.build().map_err(|error| error.to_string())
}

fn build_headers(headers: &[(String, String)]) -> Result<HeaderMap, TransportError> {
    let mut map = HeaderMap::new();

    for (name, value) in headers {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|error| invalid_request(format!("invalid header name {name}: {error}")))?;
        let header_value = HeaderValue::from_str(value)
            .map_err(|error| invalid_request(format!("invalid value for {name}: {error}")))?;
        map.insert(header_name, header_value);
    }

    Ok(map)
}

fn invalid_request(message: impl Into<String>) -> TransportError {
    TransportError::InvalidRequest {
        message: message.into(),
    }
}

/// A request reqwest refuses to build, such as a malformed URL, is an
/// [`TransportError::InvalidRequest`] and so a configuration problem for the
/// engine that sent it.
fn map_reqwest_error(error: reqwest::Error) -> TransportError {
    if error.is_timeout() {
        TransportError::Timeout {
            message: error.to_string(),
        }
    } else if error.is_builder() {
        invalid_request(error.to_string())
    } else {
        TransportError::Network {
            message: error.to_string(),
        }
    }
}

#[cfg(test)]
mod tests;
