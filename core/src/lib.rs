//! Data layer for the todo service.
//!
//! # Overview
//! Everything here is plain data and pure conversion: the JSON types clients
//! exchange with the service, the document shape persisted in the store, the
//! mapper between the two, and the response envelope. Nothing in this crate
//! performs I/O; the server crate owns the network and the storage driver.
//!
//! # Design
//! - `Todo` / `CreateTodo` / `UpdateTodo` are the wire shapes.
//! - `TodoRecord` is the storage shape, keyed by a BSON `ObjectId`.
//! - `TodoRecord::mint` and `From<TodoRecord> for Todo` are the two mapping
//!   directions; `TodoChanges` is the only thing an update may write.
//! - `parse_id` is the sole source of "invalid id" errors.

pub mod envelope;
pub mod error;
pub mod record;
pub mod types;

pub use bson::oid::ObjectId;
pub use envelope::{DeleteOutcome, Envelope};
pub use error::IdError;
pub use record::{parse_id, TodoChanges, TodoRecord};
pub use types::{CreateTodo, Todo, UpdateTodo};
