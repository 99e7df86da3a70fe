//! The HTTP transport behind a client.
//!
//! [`Transport`] is the narrow interface the request pipeline submits to.
//! [`ReqwestTransport`] is the default implementation; tests and callers with
//! special needs can inject their own.

use crate::{
    metadata::{RequestDescriptor, RequestType},
    normalize::parse_body,
    Error, Result,
};
use async_trait::async_trait;
use http::{header::CONTENT_TYPE, HeaderMap, HeaderValue, StatusCode};
use serde_json::Value;
use std::time::Duration;
use url::Url;

/// What the transport returns for a successful (2xx or 3xx) response.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The response headers.
    pub headers: HeaderMap,
    /// The raw response body.
    pub body: String,
}

/// What the transport returns when a request fails.
///
/// Either a response arrived with a failing status, in which case `status` and
/// usually `body` are set, or the request never completed and `code` says why.
#[derive(thiserror::Error, Debug, Clone)]
#[error("{message}")]
pub struct TransportError {
    /// The HTTP status, when a response was received.
    pub status: Option<StatusCode>,
    /// The parsed failure body: JSON when it decodes, the raw text otherwise.
    pub body: Option<Value>,
    /// A human-readable description of the failure.
    pub message: String,
    /// A short code for failures without a status, e.g. `"timeout"`.
    pub code: Option<String>,
    /// The response headers, when a response was received.
    pub headers: HeaderMap,
}

impl TransportError {
    /// A failure response with the given status and raw body.
    pub fn from_status(status: StatusCode, headers: HeaderMap, raw_body: &str) -> Self {
        let body = parse_body(raw_body);
        Self {
            status: Some(status),
            body: (!body.is_null()).then_some(body),
            message: status
                .canonical_reason()
                .map(str::to_string)
                .unwrap_or_else(|| format!("HTTP error {}", status.as_u16())),
            code: None,
            headers,
        }
    }

    /// A failure without a response.
    pub fn network(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status: None,
            body: None,
            message: message.into(),
            code: Some(code.into()),
            headers: HeaderMap::new(),
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        let code = if e.is_timeout() {
            "timeout"
        } else if e.is_connect() {
            "connect"
        } else if e.is_redirect() {
            "redirect"
        } else if e.is_body() {
            "body"
        } else if e.is_decode() {
            "decode"
        } else if e.is_builder() {
            "builder"
        } else if e.is_request() {
            "request"
        } else {
            "unknown"
        };

        Self {
            status: e.status(),
            ..TransportError::network(code, e.to_string())
        }
    }
}

/// Submits requests. Must report exactly one outcome per submitted request.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends `request` and waits for its outcome.
    async fn send(&self, request: RequestDescriptor)
        -> std::result::Result<TransportResponse, TransportError>;
}

/// Connection settings for the default transport, owned by one client.
#[derive(Debug, Clone, Default)]
pub struct TransportConfig {
    /// Route every request through this proxy.
    pub proxy: Option<Url>,
    /// Keep idle connections pooled and enable TCP keep-alive.
    pub keep_alive: bool,
    /// Per-request timeout.
    pub timeout: Option<Duration>,
}

const KEEP_ALIVE_INTERVAL: Duration = Duration::from_secs(60);

/// The default transport, backed by a `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http_client: reqwest::Client,
}

impl ReqwestTransport {
    /// Builds a transport with its own connection pool.
    ///
    /// # Errors
    ///
    /// Returns an error if the proxy or the underlying client cannot be built.
    pub fn new(config: &TransportConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder();

        if let Some(proxy) = &config.proxy {
            let proxy = reqwest::Proxy::all(proxy.as_str())
                .map_err(|e| Error::ConfigurationError(format!("Invalid proxy: {}", e)))?;
            builder = builder.proxy(proxy);
        }

        builder = if config.keep_alive {
            builder.tcp_keepalive(KEEP_ALIVE_INTERVAL)
        } else {
            builder.pool_max_idle_per_host(0)
        };

        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        let http_client = builder.build().map_err(|e| {
            Error::ConfigurationError(format!("Failed to build HTTP client: {}", e))
        })?;

        Ok(Self { http_client })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(
        &self,
        request: RequestDescriptor,
    ) -> std::result::Result<TransportResponse, TransportError> {
        let RequestDescriptor {
            method,
            mut url,
            query,
            body,
            request_type,
            headers,
        } = request;

        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &query {
                pairs.append_pair(key, value);
            }
        }

        let has_content_type = headers.contains_key(CONTENT_TYPE);
        let mut builder = self.http_client.request(method, url).headers(headers);

        builder = match body {
            None => builder,
            Some(Value::String(raw)) => {
                if !has_content_type {
                    builder = builder.header(
                        CONTENT_TYPE,
                        HeaderValue::from_static(request_type.content_type()),
                    );
                }
                builder.body(raw)
            }
            Some(body) => match request_type {
                RequestType::Json => builder.json(&body),
                RequestType::Form => builder.form(&body),
            },
        };

        let response = builder.send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let raw_body = response.text().await.map_err(|e| TransportError {
            status: Some(status),
            headers: headers.clone(),
            ..TransportError::from(e)
        })?;

        if status.is_success() || status.is_redirection() {
            Ok(TransportResponse {
                status,
                headers,
                body: raw_body,
            })
        } else {
            Err(TransportError::from_status(status, headers, &raw_body))
        }
    }
}
