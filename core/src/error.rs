//! Error types for the data layer.

use thiserror::Error;

/// A path identifier that is not a 24-character hex `ObjectId`.
///
/// The display text is the parser's own message; handlers pass it through
/// to the client in the envelope's `error` field.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct IdError(#[from] bson::oid::Error);
