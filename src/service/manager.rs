//! Request orchestration over the person model.
//!
//! # Responsibilities
//! - Pass person reads through unchanged
//! - Fan a parent read out to its children concurrently
//! - Sequence delete then notify, absorbing notification failures
//!
//! # Design Decisions
//! - Child fetches are spawned tasks: the first failure is returned right away
//!   while the remaining fetches run to completion and are discarded
//! - Deletion succeeds exactly when the upstream delete succeeds

use std::sync::Arc;

use futures_util::stream::{FuturesUnordered, StreamExt};

use crate::error::{ErrorKind, GatewayResult, TypedError};
use crate::models::notifications::DeletionNotifier;
use crate::models::person::{Person, PersonStore};

/// Orchestrates person reads, children fan-out and deletions.
pub struct PersonsManager {
    persons: Arc<dyn PersonStore>,
    notifier: Arc<dyn DeletionNotifier>,
}

impl PersonsManager {
    pub fn new(persons: Arc<dyn PersonStore>, notifier: Arc<dyn DeletionNotifier>) -> Self {
        Self { persons, notifier }
    }

    /// Fetch a person.
    pub async fn get_person(&self, person_id: &str, request_id: &str) -> GatewayResult<Person> {
        self.persons
            .get_person(person_id, request_id)
            .await
            .inspect_err(|error| {
                tracing::error!(
                    person_id = %person_id,
                    request_id = %request_id,
                    error = %error,
                    "Failed to get a person"
                );
            })
    }

    /// Fetch every child of a person.
    ///
    /// Results keep the order of the parent's `children` list.
    pub async fn get_person_children(
        &self,
        person_id: &str,
        request_id: &str,
    ) -> GatewayResult<Vec<Person>> {
        self.fetch_children(person_id, request_id)
            .await
            .inspect_err(|error| {
                tracing::error!(
                    person_id = %person_id,
                    request_id = %request_id,
                    error = %error,
                    "Failed to get a person's children"
                );
            })
    }

    /// Delete a person, then announce the deletion.
    pub async fn delete_person(&self, person_id: &str, request_id: &str) -> GatewayResult<()> {
        if let Err(error) = self.persons.delete_person(person_id, request_id).await {
            tracing::error!(
                person_id = %person_id,
                request_id = %request_id,
                error = %error,
                "Failed to delete a person"
            );
            return Err(error);
        }

        // The delete already happened upstream; a lost notification must not undo that.
        if let Err(error) = self.notifier.notify_deletion(person_id, request_id).await {
            tracing::error!(
                person_id = %person_id,
                request_id = %request_id,
                error = %error,
                "Failed to send delete notification"
            );
        }

        Ok(())
    }

    async fn fetch_children(&self, person_id: &str, request_id: &str) -> GatewayResult<Vec<Person>> {
        let parent = self.persons.get_person(person_id, request_id).await?;
        let child_ids = parent.child_ids();
        if child_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut pending: FuturesUnordered<_> = child_ids
            .iter()
            .cloned()
            .enumerate()
            .map(|(index, child_id)| {
                let persons = Arc::clone(&self.persons);
                let request_id = request_id.to_string();
                let handle = tokio::spawn(async move {
                    persons.get_person(&child_id, &request_id).await
                });
                async move { (index, handle.await) }
            })
            .collect();

        let mut children: Vec<Option<Person>> = vec![None; child_ids.len()];
        while let Some((index, joined)) = pending.next().await {
            let child = joined.map_err(|e| {
                tracing::error!(request_id = %request_id, error = %e, "Child fetch task failed");
                TypedError::new(ErrorKind::GetPerson, 500, "Unexpected error")
            })??;
            children[index] = Some(child);
        }

        Ok(children.into_iter().flatten().collect())
    }
}
