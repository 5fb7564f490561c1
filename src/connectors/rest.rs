//! Outbound HTTP calls with timeout and error logging.
//!
//! # Responsibilities
//! - Issue exactly one request per call (no retries)
//! - Enforce the caller-supplied timeout
//! - Decode JSON response bodies
//! - Log failures with the request ID and target URL
//!
//! # Design Decisions
//! - Errors are propagated unchanged; translation happens in the models
//! - A single pooled `reqwest::Client` is shared by all in-flight requests

use std::time::{Duration, Instant};

use reqwest::{Client, Method, Url};
use serde_json::Value;
use thiserror::Error;

use crate::error::UpstreamFailure;
use crate::observability::metrics;

/// Errors raised by an outbound call.
#[derive(Debug, Error)]
pub enum ConnectorError {
    /// The upstream answered with a non-2xx status.
    #[error("upstream responded with status {status}")]
    Status { status: u16, body: Option<String> },

    /// No response arrived within the configured timeout.
    #[error("upstream request timed out after {0:?}")]
    Timeout(Duration),

    /// Connection, protocol or body read failure.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unsupported HTTP method '{0}'")]
    InvalidMethod(String),

    #[error("invalid upstream URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

impl ConnectorError {
    /// Upstream HTTP status, when one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            ConnectorError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<&ConnectorError> for UpstreamFailure {
    fn from(error: &ConnectorError) -> Self {
        Self {
            code: error.status(),
            message: Some(error.to_string()),
        }
    }
}

/// A single outbound call.
#[derive(Debug, Clone)]
pub struct RestRequest {
    /// HTTP method, case-insensitive.
    pub method: String,
    pub url: String,
    pub body: Option<Value>,
    pub headers: Vec<(String, String)>,
    pub query: Vec<(String, String)>,
    pub timeout: Duration,
    pub request_id: String,
}

/// Executes outbound calls over a shared connection pool.
#[derive(Debug, Clone)]
pub struct RestConnector {
    client: Client,
}

impl RestConnector {
    /// Create a connector with a fresh connection pool.
    pub fn new() -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(concat!("persons-gateway/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }

    /// Create a connector around an existing client.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Execute the call and return the decoded body, if any.
    pub async fn execute(&self, request: RestRequest) -> Result<Option<Value>, ConnectorError> {
        let start = Instant::now();
        let url = request.url.clone();
        let request_id = request.request_id.clone();
        let method = request.method.to_ascii_uppercase();

        let result = self.send(request).await;
        match &result {
            Ok(_) => {
                metrics::record_upstream_call(&method, "success", start);
                tracing::debug!(
                    request_id = %request_id,
                    method = %method,
                    url = %url,
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Upstream request completed"
                );
            }
            Err(error) => {
                metrics::record_upstream_call(&method, "failure", start);
                tracing::error!(
                    request_id = %request_id,
                    url = %url,
                    error = %error,
                    "Failed with request to {}",
                    url
                );
            }
        }
        result
    }

    async fn send(&self, request: RestRequest) -> Result<Option<Value>, ConnectorError> {
        let method = parse_method(&request.method)?;
        let url = Url::parse(&request.url).map_err(|source| ConnectorError::InvalidUrl {
            url: request.url.clone(),
            source,
        })?;
        let timeout = request.timeout;

        let mut builder = self.client.request(method, url).timeout(timeout);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| classify(e, timeout))?;
        let status = response.status();
        let bytes = response.bytes().await.map_err(|e| classify(e, timeout))?;

        if !status.is_success() {
            return Err(ConnectorError::Status {
                status: status.as_u16(),
                body: (!bytes.is_empty()).then(|| String::from_utf8_lossy(&bytes).into_owned()),
            });
        }

        Ok(decode_body(&bytes))
    }
}

fn parse_method(method: &str) -> Result<Method, ConnectorError> {
    Method::from_bytes(method.to_ascii_uppercase().as_bytes())
        .map_err(|_| ConnectorError::InvalidMethod(method.to_string()))
}

fn classify(error: reqwest::Error, timeout: Duration) -> ConnectorError {
    if error.is_timeout() {
        ConnectorError::Timeout(timeout)
    } else {
        ConnectorError::Transport(error)
    }
}

/// Empty bodies decode to `None`; bodies that are not JSON are kept as text.
fn decode_body(bytes: &[u8]) -> Option<Value> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return None;
    }
    match serde_json::from_slice(bytes) {
        Ok(value) => Some(value),
        Err(_) => Some(Value::String(String::from_utf8_lossy(bytes).into_owned())),
    }
}
