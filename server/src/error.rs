//! Conversion of request failures into envelope responses.
//!
//! Every handler returns `Result<_, ApiError>`. Input problems answer 400,
//! storage failures answer 500, and both come back as an `Envelope` so the
//! client always gets the same JSON shape.

use std::error::Error as _;
use std::fmt;
use std::time::Duration;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    BoxError, Json,
};
use thiserror::Error;
use todo_core::{Envelope, IdError};

use crate::store::StoreError;

/// The storage call that failed, used to pick the response message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageAction {
    List,
    Insert,
    Update,
    Delete,
}

impl fmt::Display for StorageAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            Self::List => "could not fetch the todo collection",
            Self::Insert => "failed to insert data into the database",
            Self::Update => "failed to update data in the database",
            Self::Delete => "an error occurred while deleting todo item",
        };
        f.write_str(message)
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    /// The request body is not the expected JSON. The decoder's message is
    /// logged but not returned.
    #[error("could not decode data")]
    UndecodableBody(#[source] serde_json::Error),

    #[error("title required.")]
    TitleRequired,

    #[error("title cannot be empty")]
    EmptyTitle,

    #[error("the id is invalid")]
    InvalidId(#[from] IdError),

    #[error("{action}")]
    Storage {
        action: StorageAction,
        #[source]
        source: StoreError,
    },

    /// The handler did not finish within the per-request timeout.
    #[error("request timed out")]
    Timeout(Duration),

    /// A middleware failure other than the timeout.
    #[error("internal server error")]
    Middleware(String),
}

impl ApiError {
    pub const fn storage(action: StorageAction, source: StoreError) -> Self {
        Self::Storage { action, source }
    }

    /// Maps an error raised by the middleware stack in front of the handlers.
    pub fn from_middleware(error: BoxError, timeout: Duration) -> Self {
        if error.is::<tower::timeout::error::Elapsed>() {
            Self::Timeout(timeout)
        } else {
            Self::Middleware(error.to_string())
        }
    }

    pub const fn status(&self) -> StatusCode {
        match self {
            Self::UndecodableBody(_) | Self::TitleRequired | Self::EmptyTitle | Self::InvalidId(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::Timeout(_) => StatusCode::REQUEST_TIMEOUT,
            Self::Storage { .. } | Self::Middleware(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Underlying error text returned to the client, if any.
    fn detail(&self) -> Option<String> {
        match self {
            Self::InvalidId(error) => Some(error.to_string()),
            Self::Storage { source, .. } => Some(source.to_string()),
            Self::Timeout(timeout) => Some(format!("no response within {timeout:?}")),
            Self::Middleware(detail) => Some(detail.clone()),
            Self::UndecodableBody(_) | Self::TitleRequired | Self::EmptyTitle => None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let cause = self.source().map(ToString::to_string).unwrap_or_default();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %self, %cause, "Request failed");
        } else {
            tracing::warn!(status = status.as_u16(), error = %self, %cause, "Request rejected");
        }

        let envelope = match self.detail() {
            Some(detail) => Envelope::failure(self.to_string(), detail),
            None => Envelope::message(self.to_string()),
        };
        (status, Json(envelope)).into_response()
    }
}
