//! Error responses.
//!
//! # Responsibilities
//! - Render a [`TypedError`] as `{code, type, details}`
//! - Use the error's code as the HTTP status, 500 when it is not a valid status

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::{ErrorKind, TypedError};

/// JSON body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Status line, e.g. `"404 - Not Found"`.
    pub code: String,
    #[serde(rename = "type")]
    pub kind: ErrorKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
}

/// HTTP status for an error code.
pub fn status_for(code: u16) -> StatusCode {
    StatusCode::from_u16(code)
        .ok()
        .filter(|status| status.is_client_error() || status.is_server_error())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

impl ErrorBody {
    pub fn new(error: &TypedError, status: StatusCode) -> Self {
        Self {
            code: format!(
                "{} - {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown")
            ),
            kind: error.kind,
            details: (!error.message.is_empty()).then(|| vec![error.message.clone()]),
        }
    }
}

impl IntoResponse for TypedError {
    fn into_response(self) -> Response {
        let status = status_for(self.code);
        (status, Json(ErrorBody::new(&self, status))).into_response()
    }
}
