//! Notification producer.
//!
//! # Responsibilities
//! - Hold the process-wide producer handle and its lifecycle
//! - Deliver fire-and-forget messages to a named topic
//! - Report delivery failures as `KAFKA_ERROR`
//!
//! # Design Decisions
//! - The broker client is opaque: anything implementing [`MessageTransport`]
//! - `init` must complete before the first `send`; `send` after `shutdown` fails
//! - The handle is shared via `Arc` and safe for concurrent use

use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use tokio::sync::mpsc;

use crate::error::{ErrorKind, GatewayResult, TypedError};
use crate::observability::metrics;

/// A message addressed to a topic.
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundMessage {
    pub topic: String,
    pub message: Value,
}

/// Failure reported by a transport.
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct TransportError(pub String);

/// Send-only connection to a message broker.
#[async_trait]
pub trait MessageTransport: Send + Sync {
    async fn deliver(&self, message: OutboundMessage) -> Result<(), TransportError>;
}

/// Destination for fire-and-forget notifications.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Whether `send` may be called.
    fn is_ready(&self) -> bool {
        true
    }

    async fn send(&self, topic: &str, message: Value, request_id: &str) -> GatewayResult<()>;
}

enum ProducerState {
    Uninitialized,
    Ready(Arc<dyn MessageTransport>),
    ShutDown,
}

/// Process-wide producer handle.
///
/// Lifecycle: `Uninitialized → Ready → ShutDown`.
pub struct KafkaProducer {
    state: RwLock<ProducerState>,
}

impl KafkaProducer {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(ProducerState::Uninitialized),
        }
    }

    /// Attach the transport. Fails if called more than once.
    pub fn init(&self, transport: Arc<dyn MessageTransport>) -> GatewayResult<()> {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        if let ProducerState::Ready(_) = *state {
            return Err(producer_error("producer is already initialized"));
        }
        if let ProducerState::ShutDown = *state {
            return Err(producer_error("producer has been shut down"));
        }
        *state = ProducerState::Ready(transport);
        tracing::info!("Notification producer initialized");
        Ok(())
    }

    /// Detach the transport; later sends fail.
    pub fn shutdown(&self) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        if matches!(*state, ProducerState::Ready(_)) {
            tracing::info!("Notification producer shut down");
        }
        *state = ProducerState::ShutDown;
    }

    fn transport(&self) -> GatewayResult<Arc<dyn MessageTransport>> {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        match &*state {
            ProducerState::Ready(transport) => Ok(Arc::clone(transport)),
            ProducerState::Uninitialized => Err(producer_error("producer is not initialized")),
            ProducerState::ShutDown => Err(producer_error("producer has been shut down")),
        }
    }
}

impl Default for KafkaProducer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for KafkaProducer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KafkaProducer")
            .field("ready", &self.is_ready())
            .finish()
    }
}

#[async_trait]
impl NotificationSink for KafkaProducer {
    fn is_ready(&self) -> bool {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        matches!(*state, ProducerState::Ready(_))
    }

    async fn send(&self, topic: &str, message: Value, request_id: &str) -> GatewayResult<()> {
        let delivery = match self.transport() {
            Ok(transport) => transport
                .deliver(OutboundMessage {
                    topic: topic.to_string(),
                    message,
                })
                .await
                .map_err(|e| producer_error(e.0)),
            Err(e) => Err(e),
        };

        metrics::record_notification(topic, delivery.is_ok());
        match &delivery {
            Ok(()) => {
                tracing::debug!(request_id = %request_id, topic = %topic, "Notification sent");
            }
            Err(error) => {
                tracing::error!(
                    request_id = %request_id,
                    topic = %topic,
                    error = %error,
                    "Failed to send message to topic"
                );
            }
        }
        delivery
    }
}

fn producer_error(message: impl Into<String>) -> TypedError {
    TypedError::new(ErrorKind::KafkaError, 500, message)
}

/// Writes every message to the log instead of a broker.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogTransport;

#[async_trait]
impl MessageTransport for LogTransport {
    async fn deliver(&self, message: OutboundMessage) -> Result<(), TransportError> {
        tracing::info!(topic = %message.topic, message = %message.message, "Notification published");
        Ok(())
    }
}

/// Hands messages to an in-process receiver.
#[derive(Debug, Clone)]
pub struct ChannelTransport {
    tx: mpsc::UnboundedSender<OutboundMessage>,
}

impl ChannelTransport {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<OutboundMessage>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

#[async_trait]
impl MessageTransport for ChannelTransport {
    async fn deliver(&self, message: OutboundMessage) -> Result<(), TransportError> {
        self.tx
            .send(message)
            .map_err(|_| TransportError("notification channel closed".to_string()))
    }
}
