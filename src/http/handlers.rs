use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;

use crate::error::{ErrorKind, TypedError};
use crate::http::request::RequestId;
use crate::http::server::AppState;
use crate::models::person::Person;

#[derive(Debug, Serialize)]
pub struct SystemStatus {
    pub status: &'static str,
}

pub async fn get_person(
    State(state): State<AppState>,
    Path(person_id): Path<String>,
    request_id: RequestId,
) -> Result<Json<Person>, TypedError> {
    let person = state.manager.get_person(&person_id, request_id.as_str()).await?;
    Ok(Json(person))
}

pub async fn get_person_children(
    State(state): State<AppState>,
    Path(person_id): Path<String>,
    request_id: RequestId,
) -> Result<Json<Vec<Person>>, TypedError> {
    let children = state
        .manager
        .get_person_children(&person_id, request_id.as_str())
        .await?;
    Ok(Json(children))
}

pub async fn delete_person(
    State(state): State<AppState>,
    Path(person_id): Path<String>,
    request_id: RequestId,
) -> Result<StatusCode, TypedError> {
    state
        .manager
        .delete_person(&person_id, request_id.as_str())
        .await?;
    Ok(StatusCode::OK)
}

pub async fn status() -> Json<SystemStatus> {
    Json(SystemStatus { status: "OK" })
}

pub async fn unsupported_path() -> TypedError {
    TypedError::new(ErrorKind::UnsupportedPath, 404, "No such path")
}
