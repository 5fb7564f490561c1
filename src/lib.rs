//! Persons gateway library.
//!
//! REST gateway in front of an upstream person service: reads and deletes
//! persons, fans a read out to a person's children and publishes a
//! best-effort notification after each deletion.

pub mod config;
pub mod connectors;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod models;
pub mod observability;
pub mod service;

pub use config::GatewayConfig;
pub use error::{ErrorKind, GatewayResult, TypedError};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use service::PersonsManager;
