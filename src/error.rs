//! Typed errors crossing every component boundary.
//!
//! # Responsibilities
//! - Build the uniform `{type, code, message}` error value
//! - Carry the loosely-shaped upstream failure into the model's mapping table
//!
//! # Design Decisions
//! - Error kinds are a closed enum serialised as their wire tags
//! - Raw transport errors are converted before they leave a connector's caller

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Kind tag of a [`TypedError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// Fetching a person from the upstream service failed.
    GetPerson,
    /// Deleting a person in the upstream service failed.
    DeletePerson,
    /// The notification producer could not deliver a message.
    KafkaError,
    /// The deletion notification could not be sent.
    KafkaNotificationDeletePerson,
    /// No route matches the inbound request.
    UnsupportedPath,
    /// The inbound request exceeded the listener's timeout.
    RequestTimeout,
    /// Anything the gateway itself failed at.
    InternalError,
}

impl ErrorKind {
    /// Wire tag of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::GetPerson => "GET_PERSON",
            ErrorKind::DeletePerson => "DELETE_PERSON",
            ErrorKind::KafkaError => "KAFKA_ERROR",
            ErrorKind::KafkaNotificationDeletePerson => "KAFKA_NOTIFICATION_DELETE_PERSON",
            ErrorKind::UnsupportedPath => "UNSUPPORTED_PATH",
            ErrorKind::RequestTimeout => "REQUEST_TIMEOUT",
            ErrorKind::InternalError => "INTERNAL_ERROR",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The unit of failure propagated across the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{kind} ({code}): {message}")]
pub struct TypedError {
    #[serde(rename = "type")]
    pub kind: ErrorKind,
    pub code: u16,
    pub message: String,
}

impl TypedError {
    /// Build a typed error. Never fails.
    pub fn new(kind: ErrorKind, code: u16, message: impl Into<String>) -> Self {
        Self {
            kind,
            code,
            message: message.into(),
        }
    }
}

/// Result type for gateway operations.
pub type GatewayResult<T> = Result<T, TypedError>;

/// What is known about a failed upstream call.
///
/// Both fields are optional: a transport failure has no status, and a
/// non-2xx response may come without a readable message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpstreamFailure {
    pub code: Option<u16>,
    pub message: Option<String>,
}

impl UpstreamFailure {
    pub fn with_code(code: u16) -> Self {
        Self {
            code: Some(code),
            message: None,
        }
    }
}
