//! Request identification and request logging.
//!
//! # Responsibilities
//! - Resolve the request ID (`requestId` header, then `x-request-id`, else UUID v4)
//! - Make it available to handlers and echo it on the response
//! - Log the beginning and end of every handled request
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - The health probe is not logged

use std::convert::Infallible;
use std::time::Instant;

use axum::{
    extract::{FromRequestParts, Request},
    http::{request::Parts, HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::observability::metrics;

/// Inbound correlation header.
pub const REQUEST_ID: &str = "requestid";

/// Fallback correlation header, also set on every response.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Path of the health probe.
pub const STATUS_PATH: &str = "/status";

/// Correlation token for one inbound request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(pub String);

impl RequestId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Read the ID a caller supplied, if any.
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        [REQUEST_ID, X_REQUEST_ID]
            .iter()
            .filter_map(|name| headers.get(*name))
            .filter_map(|value| value.to_str().ok())
            .map(str::trim)
            .find(|value| !value.is_empty())
            .map(|value| Self(value.to_string()))
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl<S> FromRequestParts<S> for RequestId
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(id) = parts.extensions.get::<RequestId>() {
            return Ok(id.clone());
        }
        Ok(RequestId::from_headers(&parts.headers).unwrap_or_else(RequestId::generate))
    }
}

/// Attach a [`RequestId`] to the request and echo it on the response.
pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let request_id =
        RequestId::from_headers(request.headers()).unwrap_or_else(RequestId::generate);
    request.extensions_mut().insert(request_id.clone());

    let mut response = next.run(request).await;
    if let Ok(value) = HeaderValue::from_str(request_id.as_str()) {
        response.headers_mut().insert(X_REQUEST_ID, value);
    }
    response
}

/// Log request begin/end and record request metrics.
pub async fn request_logging_middleware(request: Request, next: Next) -> Response {
    if request.uri().path() == STATUS_PATH {
        return next.run(request).await;
    }

    let start = Instant::now();
    let method = request.method().clone();
    let uri = request.uri().clone();
    let request_id = request
        .extensions()
        .get::<RequestId>()
        .map(|id| id.0.clone())
        .unwrap_or_default();

    tracing::info!(
        request_id = %request_id,
        method = %method,
        uri = %uri,
        "Begin handling request"
    );

    let response = next.run(request).await;
    let status = response.status();

    tracing::info!(
        request_id = %request_id,
        method = %method,
        uri = %uri,
        status = status.as_u16(),
        duration_ms = start.elapsed().as_millis() as u64,
        "End handling request"
    );
    metrics::record_request(method.as_str(), status.as_u16(), start);

    response
}
