//! Orchestration layer between the HTTP boundary and the domain models.

pub mod manager;

pub use manager::PersonsManager;
