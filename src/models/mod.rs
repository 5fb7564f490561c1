//! Domain models over the outbound connectors.
//!
//! # Responsibilities
//! - Shape requests for the person service and project its responses
//! - Normalize upstream failures into typed errors
//! - Publish deletion notifications

pub mod notifications;
pub mod person;

pub use notifications::{DeletionNotifier, NotificationMessage, PersonNotifications};
pub use person::{map_upstream_failure, Person, PersonModel, PersonStore};
