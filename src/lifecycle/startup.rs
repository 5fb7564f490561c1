//! Startup wiring.
//!
//! Assembles the connectors, models and manager in dependency order. The
//! notification sink must already be initialized.

use std::sync::Arc;

use thiserror::Error;

use crate::config::GatewayConfig;
use crate::connectors::kafka::NotificationSink;
use crate::connectors::persons::PersonsConnector;
use crate::connectors::rest::RestConnector;
use crate::error::TypedError;
use crate::models::notifications::PersonNotifications;
use crate::models::person::PersonModel;
use crate::service::PersonsManager;

/// Errors that abort startup.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("notifications unavailable: {0}")]
    Notifications(TypedError),
}

/// Build the manager over a fresh connection pool.
pub fn build_manager(
    config: &GatewayConfig,
    sink: Arc<dyn NotificationSink>,
) -> Result<PersonsManager, StartupError> {
    build_manager_with(config, RestConnector::new()?, sink)
}

/// Build the manager over the given connector.
pub fn build_manager_with(
    config: &GatewayConfig,
    rest: RestConnector,
    sink: Arc<dyn NotificationSink>,
) -> Result<PersonsManager, StartupError> {
    let connector = PersonsConnector::from_config(rest, &config.persons);
    let model = PersonModel::new(
        Arc::new(connector),
        config.persons.person_path_template.clone(),
    );
    let notifications = PersonNotifications::new(sink, config.persons.delete_notification_topic.clone())
        .map_err(StartupError::Notifications)?;

    Ok(PersonsManager::new(Arc::new(model), Arc::new(notifications)))
}
