//! Storage connector for todo documents.
//!
//! `TodoStore` is the seam between the handlers and the document store.
//! The binary talks to MongoDB through `MongoStore`; `InMemoryStore` backs
//! local runs with `STORAGE_MODE=in_memory` and the test suites. Both follow
//! the same counting rules: an update reports how many documents actually
//! changed, a delete how many were removed, and a missing identifier is a
//! count of zero rather than an error.

mod memory;
mod mongo;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use todo_core::{ObjectId, TodoChanges, TodoRecord};

use crate::config::{Config, StorageMode};

pub use memory::InMemoryStore;
pub use mongo::MongoStore;

/// Errors that can occur during storage operations.
#[derive(Debug, Error, Clone)]
pub enum StoreError {
    /// The store could not be reached or rejected the liveness check.
    #[error("could not connect to the document store: {0}")]
    Connect(String),

    /// The operation did not finish within its time budget.
    #[error("document store did not respond within {0:?}")]
    Timeout(Duration),

    /// A query or write failed; carries the driver's error text.
    #[error("{0}")]
    Operation(String),

    /// The handle was used after `disconnect`.
    #[error("the document store connection is closed")]
    Disconnected,
}

impl From<mongodb::error::Error> for StoreError {
    fn from(error: mongodb::error::Error) -> Self {
        Self::Operation(error.to_string())
    }
}

/// Operations the handlers need from the document store.
#[async_trait]
pub trait TodoStore: Send + Sync {
    /// Liveness check.
    async fn ping(&self) -> Result<(), StoreError>;

    /// Every stored record, in whatever order the store yields them.
    async fn find_all(&self) -> Result<Vec<TodoRecord>, StoreError>;

    /// Inserts a minted record and returns its identifier.
    async fn insert(&self, record: &TodoRecord) -> Result<ObjectId, StoreError>;

    /// Sets `title` and `completed` on the record with `id`. Returns the
    /// number of documents modified (0 or 1).
    async fn update(&self, id: ObjectId, changes: &TodoChanges) -> Result<u64, StoreError>;

    /// Removes the record with `id`. Returns the number deleted (0 or 1).
    async fn delete(&self, id: ObjectId) -> Result<u64, StoreError>;

    /// Closes the connection. Called once, during shutdown.
    async fn disconnect(&self) -> Result<(), StoreError>;
}

/// Opens the backend selected by `config.storage_mode`.
///
/// For MongoDB this connects and pings within `config.storage_timeout`;
/// any failure is returned so the caller can refuse to start serving.
pub async fn open(config: &Config) -> Result<Arc<dyn TodoStore>, StoreError> {
    match config.storage_mode {
        StorageMode::Mongo => {
            let store = MongoStore::connect(
                &config.mongo_uri,
                &config.database,
                &config.collection,
                config.storage_timeout,
            )
            .await?;
            Ok(Arc::new(store))
        }
        StorageMode::InMemory => {
            tracing::warn!("Using in-memory storage, todos are lost on exit");
            Ok(Arc::new(InMemoryStore::new()))
        }
    }
}
