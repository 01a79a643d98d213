//! The JSON wrapper every endpoint responds with.
//!
//! `message` is always present. A success carries its payload in `data`
//! (or, for create, the new identifier in `ID`); a failure carries the
//! underlying error text in `error`. Absent fields are left out of the JSON.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(rename = "ID", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> Envelope<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            message: message.into(),
            data: Some(data),
            id: None,
            error: None,
        }
    }
}

impl Envelope<()> {
    /// Response to a successful create: the message and the new identifier.
    pub fn created(message: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            data: None,
            id: Some(id.into()),
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            data: None,
            id: None,
            error: Some(error.into()),
        }
    }

    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            data: None,
            id: None,
            error: None,
        }
    }
}

/// Payload of a successful delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteOutcome {
    pub deleted_count: u64,
}
