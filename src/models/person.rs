//! Person domain model.
//!
//! Calls the person service and normalizes both the payload and its failures.
//! The failure table is fixed: upstream 404 becomes `404 person not found`,
//! anything else (including no status at all) becomes `500 Unexpected error`.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::form_urlencoded;

use crate::config::schema::PERSON_ID_PLACEHOLDER;
use crate::connectors::persons::{PersonsApi, PersonsRequest};
use crate::error::{ErrorKind, GatewayResult, TypedError, UpstreamFailure};

/// Header carrying the request ID to the person service.
pub const REQUEST_ID_HEADER: &str = "requestId";

/// A person as exposed by the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub person_id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<String>>,
}

impl Person {
    /// Project the person service payload; unknown fields are dropped.
    pub fn from_upstream(value: Value) -> Result<Self, serde_json::Error> {
        let raw: UpstreamPerson = serde_json::from_value(value)?;
        Ok(Self {
            person_id: raw.person_id,
            name: raw.name,
            children: raw.children,
        })
    }

    /// Child ids, empty when the field is absent.
    pub fn child_ids(&self) -> &[String] {
        self.children.as_deref().unwrap_or(&[])
    }
}

/// Wire shape returned by the person service.
#[derive(Debug, Deserialize)]
struct UpstreamPerson {
    person_id: String,
    name: String,
    #[serde(default)]
    children: Option<Vec<String>>,
}

/// Read and delete access to persons.
#[async_trait]
pub trait PersonStore: Send + Sync {
    async fn get_person(&self, person_id: &str, request_id: &str) -> GatewayResult<Person>;

    async fn delete_person(&self, person_id: &str, request_id: &str) -> GatewayResult<()>;
}

/// Translate an upstream failure into the gateway's typed error.
pub fn map_upstream_failure(kind: ErrorKind, failure: &UpstreamFailure) -> TypedError {
    match failure.code {
        Some(404) => TypedError::new(kind, 404, "person not found"),
        _ => TypedError::new(kind, 500, "Unexpected error"),
    }
}

/// [`PersonStore`] backed by the person service.
pub struct PersonModel {
    api: Arc<dyn PersonsApi>,
    path_template: String,
}

impl PersonModel {
    pub fn new(api: Arc<dyn PersonsApi>, path_template: impl Into<String>) -> Self {
        Self {
            api,
            path_template: path_template.into(),
        }
    }

    /// Upstream path for a person, with the id confined to a single segment.
    fn person_path(&self, person_id: &str) -> Result<String, UpstreamFailure> {
        let segment = encode_segment(person_id).ok_or_else(|| UpstreamFailure {
            code: Some(404),
            message: Some(format!("person id '{}' is not addressable", person_id)),
        })?;
        Ok(self.path_template.replace(PERSON_ID_PLACEHOLDER, &segment))
    }

    fn request(
        &self,
        method: &str,
        person_id: &str,
        request_id: &str,
    ) -> Result<PersonsRequest, UpstreamFailure> {
        Ok(PersonsRequest {
            method: method.to_string(),
            path: self.person_path(person_id)?,
            headers: vec![(REQUEST_ID_HEADER.to_string(), request_id.to_string())],
            request_id: request_id.to_string(),
            ..Default::default()
        })
    }

    async fn extract_person(&self, person_id: &str, request_id: &str) -> Result<Person, UpstreamFailure> {
        let request = self.request("GET", person_id, request_id)?;
        let body = self
            .api
            .execute(request)
            .await
            .map_err(|e| UpstreamFailure::from(&e))?;

        Person::from_upstream(body.unwrap_or(Value::Null)).map_err(|e| UpstreamFailure {
            code: None,
            message: Some(format!("malformed person payload: {}", e)),
        })
    }

    async fn remove_person(&self, person_id: &str, request_id: &str) -> Result<(), UpstreamFailure> {
        let request = self.request("DELETE", person_id, request_id)?;
        self.api
            .execute(request)
            .await
            .map(|_| ())
            .map_err(|e| UpstreamFailure::from(&e))
    }
}

/// Percent-encode `person_id` so it cannot leave its path segment.
///
/// Dot segments are rejected: URL parsing collapses `.` and `..` even when
/// their dots are percent-encoded.
fn encode_segment(person_id: &str) -> Option<String> {
    if matches!(person_id, "" | "." | "..") {
        return None;
    }
    // `byte_serialize` writes a space as `+`, which a path reads literally.
    Some(
        form_urlencoded::byte_serialize(person_id.as_bytes())
            .collect::<String>()
            .replace('+', "%20"),
    )
}

#[async_trait]
impl PersonStore for PersonModel {
    async fn get_person(&self, person_id: &str, request_id: &str) -> GatewayResult<Person> {
        self.extract_person(person_id, request_id)
            .await
            .map_err(|failure| {
                tracing::error!(
                    person_id = %person_id,
                    request_id = %request_id,
                    upstream_code = ?failure.code,
                    error = failure.message.as_deref().unwrap_or_default(),
                    "Failed to get a person"
                );
                map_upstream_failure(ErrorKind::GetPerson, &failure)
            })
    }

    async fn delete_person(&self, person_id: &str, request_id: &str) -> GatewayResult<()> {
        self.remove_person(person_id, request_id)
            .await
            .map_err(|failure| {
                tracing::error!(
                    person_id = %person_id,
                    request_id = %request_id,
                    upstream_code = ?failure.code,
                    error = failure.message.as_deref().unwrap_or_default(),
                    "Failed to delete a person"
                );
                map_upstream_failure(ErrorKind::DeletePerson, &failure)
            })
    }
}
