//! Handlers for the `/todo` routes.
//!
//! Each handler is a stateless request-to-response step: validate the input,
//! make one storage call through `AppState::store`, map the result to the
//! wire shape and wrap it in an `Envelope`. Nothing is cached between
//! requests; the store is the only source of truth.
//!
//! Bodies are read as raw bytes and decoded here so a malformed or missing
//! body always produces the envelope error, whatever the `Content-Type`.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::de::DeserializeOwned;
use todo_core::{
    parse_id, CreateTodo, DeleteOutcome, Envelope, Todo, TodoChanges, TodoRecord, UpdateTodo,
};

use crate::error::{ApiError, StorageAction};
use crate::store::TodoStore;

/// Shared application dependencies.
///
/// Cloned into every request; the clone shares the single store handle.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn TodoStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn TodoStore>) -> Self {
        Self { store }
    }
}

fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(ApiError::UndecodableBody)
}

/// `GET /todo/`
pub async fn list_todos(
    State(state): State<AppState>,
) -> Result<Json<Envelope<Vec<Todo>>>, ApiError> {
    let records = state
        .store
        .find_all()
        .await
        .map_err(|source| ApiError::storage(StorageAction::List, source))?;

    let todos: Vec<Todo> = records.into_iter().map(Todo::from).collect();
    tracing::debug!(count = todos.len(), "Todos retrieved");
    Ok(Json(Envelope::ok("todos retrieved successfully", todos)))
}

/// `POST /todo/` with `{"title": ...}`. Responds 201 with the new `ID`.
pub async fn create_todo(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<Envelope<()>>), ApiError> {
    let request: CreateTodo = decode(&body)?;
    if request.title.is_empty() {
        return Err(ApiError::TitleRequired);
    }

    let record = TodoRecord::mint(request);
    let id = state
        .store
        .insert(&record)
        .await
        .map_err(|source| ApiError::storage(StorageAction::Insert, source))?;

    tracing::info!(%id, "Todo created");
    Ok((
        StatusCode::CREATED,
        Json(Envelope::created("todo created successfully", id.to_hex())),
    ))
}

/// `PUT /todo/{id}` with `{"title": ..., "completed": ...}`.
///
/// Only `title` and `completed` are written. An identifier that matches
/// nothing is not an error; `data` is then `0`.
pub async fn update_todo(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    body: Bytes,
) -> Result<Json<Envelope<u64>>, ApiError> {
    let id = parse_id(&raw_id)?;
    let request: UpdateTodo = decode(&body)?;
    if request.title.is_empty() {
        return Err(ApiError::EmptyTitle);
    }

    let changes = TodoChanges::from(request);
    let modified = state
        .store
        .update(id, &changes)
        .await
        .map_err(|source| ApiError::storage(StorageAction::Update, source))?;

    tracing::info!(%id, modified, "Todo updated");
    Ok(Json(Envelope::ok("todo updated successfully", modified)))
}

/// `DELETE /todo/{id}`. Deleting a missing identifier reports zero
/// deletions and succeeds, however often it is repeated.
pub async fn delete_todo(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<Envelope<DeleteOutcome>>, ApiError> {
    let id = parse_id(&raw_id)?;

    let deleted_count = state
        .store
        .delete(id)
        .await
        .map_err(|source| ApiError::storage(StorageAction::Delete, source))?;

    tracing::info!(%id, deleted_count, "Todo deleted");
    Ok(Json(Envelope::ok(
        "item deleted successfully",
        DeleteOutcome { deleted_count },
    )))
}
