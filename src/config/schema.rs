//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Placeholder the person path template substitutes the id into.
pub const PERSON_ID_PLACEHOLDER: &str = "{person_id}";

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address, inbound timeout).
    pub listener: ListenerConfig,

    /// Upstream person service and its notification topic.
    pub persons: PersonsServiceConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Service identity.
    pub service: ServiceConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:3000").
    pub bind_address: String,

    /// Total time allowed for handling one inbound request, in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
            request_timeout_secs: 30,
        }
    }
}

/// Upstream person service configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PersonsServiceConfig {
    /// Base URL of the person service (e.g., "http://persons:8080").
    pub service_url: String,

    /// Per-call timeout for the person service, in seconds.
    pub request_timeout_secs: u64,

    /// Resource path under `service_url`; `{person_id}` is replaced per call.
    pub person_path_template: String,

    /// Topic receiving deletion notifications.
    pub delete_notification_topic: String,
}

impl Default for PersonsServiceConfig {
    fn default() -> Self {
        Self {
            service_url: "http://localhost:8080".to_string(),
            request_timeout_secs: 2,
            person_path_template: format!("v1/persons/{}", PERSON_ID_PLACEHOLDER),
            delete_notification_topic: "persons.deleted".to_string(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log line format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Identity of this gateway instance, attached to startup logs.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub instance_name: String,
    pub environment: Option<String>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            instance_name: "persons-gateway".to_string(),
            environment: None,
        }
    }
}
