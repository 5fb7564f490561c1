//! Outbound connectors.
//!
//! # Data Flow
//! ```text
//! models/person.rs
//!     → persons.rs (base URL + path, per-service timeout)
//!     → rest.rs (one HTTP call, JSON decode, error log)
//!     → upstream person service
//!
//! models/notifications.rs
//!     → kafka.rs (producer handle, topic)
//!     → MessageTransport (broker)
//! ```

pub mod kafka;
pub mod persons;
pub mod rest;

pub use kafka::{
    ChannelTransport, KafkaProducer, LogTransport, MessageTransport, NotificationSink,
    OutboundMessage,
};
pub use persons::{PersonsApi, PersonsConnector, PersonsRequest};
pub use rest::{ConnectorError, RestConnector, RestRequest};
