//! Deletion notifications for persons.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::connectors::kafka::NotificationSink;
use crate::error::{ErrorKind, GatewayResult, TypedError};

/// Payload published when a person is deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationMessage {
    pub person_id: String,
    pub request_id: String,
}

/// Announces person deletions.
#[async_trait]
pub trait DeletionNotifier: Send + Sync {
    async fn notify_deletion(&self, person_id: &str, request_id: &str) -> GatewayResult<()>;
}

/// [`DeletionNotifier`] publishing to the configured topic.
pub struct PersonNotifications {
    sink: Arc<dyn NotificationSink>,
    topic: String,
}

impl PersonNotifications {
    /// Fails when the sink has not been initialized.
    pub fn new(sink: Arc<dyn NotificationSink>, topic: impl Into<String>) -> GatewayResult<Self> {
        if !sink.is_ready() {
            return Err(TypedError::new(
                ErrorKind::KafkaError,
                500,
                "notification producer is not initialized",
            ));
        }
        Ok(Self {
            sink,
            topic: topic.into(),
        })
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }
}

#[async_trait]
impl DeletionNotifier for PersonNotifications {
    async fn notify_deletion(&self, person_id: &str, request_id: &str) -> GatewayResult<()> {
        let message = NotificationMessage {
            person_id: person_id.to_string(),
            request_id: request_id.to_string(),
        };
        let payload = serde_json::to_value(&message).map_err(|e| {
            TypedError::new(ErrorKind::KafkaNotificationDeletePerson, 500, e.to_string())
        })?;

        self.sink
            .send(&self.topic, payload, request_id)
            .await
            .map_err(|error| {
                tracing::error!(
                    person_id = %person_id,
                    request_id = %request_id,
                    error = %error,
                    "Failed to send notification"
                );
                TypedError::new(ErrorKind::KafkaNotificationDeletePerson, 500, error.message)
            })
    }
}
