//! Wire DTOs for the todo API.
//!
//! # Design
//! These are the JSON shapes clients see. The storage shape lives in
//! `record`; the two are kept apart so the hex identifier and RFC 3339
//! timestamp never leak into the persisted document, and the store-native
//! `ObjectId` / BSON date never leak onto the wire.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single todo item as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Todo {
    /// Lowercase hex form of the storage identifier (24 characters).
    pub id: String,
    pub title: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

/// Request payload for creating a new todo.
///
/// A missing `title` decodes to the empty string so the handler can answer
/// with its own validation message instead of a decoder error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateTodo {
    #[serde(default)]
    pub title: String,
}

/// Request payload for updating an existing todo. Both fields are written on
/// every update; an omitted `completed` means `false`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTodo {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub completed: bool,
}
