//! Person service client.
//!
//! Binds the [`RestConnector`] to the configured person service base URL and
//! per-service timeout. Paths are resolved as `service_url + "/" + path`.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::config::PersonsServiceConfig;
use crate::connectors::rest::{ConnectorError, RestConnector, RestRequest};

/// A call against the person service, relative to its base URL.
#[derive(Debug, Clone, Default)]
pub struct PersonsRequest {
    pub method: String,
    pub path: String,
    pub body: Option<Value>,
    pub headers: Vec<(String, String)>,
    pub query: Vec<(String, String)>,
    pub request_id: String,
}

/// Access to the upstream person service.
#[async_trait]
pub trait PersonsApi: Send + Sync {
    async fn execute(&self, request: PersonsRequest) -> Result<Option<Value>, ConnectorError>;
}

/// [`PersonsApi`] over HTTP.
#[derive(Debug, Clone)]
pub struct PersonsConnector {
    rest: RestConnector,
    service_url: String,
    timeout: Duration,
}

impl PersonsConnector {
    pub fn new(rest: RestConnector, service_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            rest,
            service_url: service_url.into(),
            timeout,
        }
    }

    pub fn from_config(rest: RestConnector, config: &PersonsServiceConfig) -> Self {
        Self::new(
            rest,
            config.service_url.clone(),
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    /// Absolute URL for a service-relative path.
    pub fn resolve_url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.service_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

#[async_trait]
impl PersonsApi for PersonsConnector {
    async fn execute(&self, request: PersonsRequest) -> Result<Option<Value>, ConnectorError> {
        let url = self.resolve_url(&request.path);
        self.rest
            .execute(RestRequest {
                method: request.method,
                url,
                body: request.body,
                headers: request.headers,
                query: request.query,
                timeout: self.timeout,
                request_id: request.request_id,
            })
            .await
    }
}
