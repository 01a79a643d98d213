//! Storage representation of a todo and the mapping to and from the wire.
//!
//! # Design
//! `TodoRecord` is exactly what sits in the collection: the `ObjectId` under
//! the document's native `_id` key, the title, the completed flag and a BSON
//! date. Every field has one wire counterpart in `Todo`, so the conversion in
//! either direction drops nothing.
//!
//! Updates go through `TodoChanges`, which only carries `title` and
//! `completed`. The identifier and creation time cannot be part of an update
//! set because the type has nowhere to put them.

use bson::oid::ObjectId;
use bson::DateTime;
use serde::{Deserialize, Serialize};

use crate::error::IdError;
use crate::types::{CreateTodo, Todo, UpdateTodo};

/// A todo document as persisted in the collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoRecord {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub title: String,
    pub completed: bool,
    pub created_at: DateTime,
}

impl TodoRecord {
    /// Mints a new record for insertion: fresh identifier, not completed,
    /// stamped with the current time.
    pub fn mint(request: CreateTodo) -> Self {
        Self {
            id: ObjectId::new(),
            title: request.title,
            completed: false,
            created_at: DateTime::now(),
        }
    }
}

impl From<TodoRecord> for Todo {
    fn from(record: TodoRecord) -> Self {
        Self {
            id: record.id.to_hex(),
            title: record.title,
            completed: record.completed,
            created_at: record.created_at.to_chrono(),
        }
    }
}

/// The fields an update is allowed to set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoChanges {
    pub title: String,
    pub completed: bool,
}

impl TodoChanges {
    /// Applies the changes to `record` in place. Returns `true` when a field
    /// actually changed, matching the document store's modified-count rule.
    pub fn apply(&self, record: &mut TodoRecord) -> bool {
        let modified = record.title != self.title || record.completed != self.completed;
        if modified {
            record.title.clone_from(&self.title);
            record.completed = self.completed;
        }
        modified
    }
}

impl From<UpdateTodo> for TodoChanges {
    fn from(request: UpdateTodo) -> Self {
        Self {
            title: request.title,
            completed: request.completed,
        }
    }
}

/// Parses a path identifier into a storage identifier.
///
/// Surrounding whitespace is ignored; anything else that is not exactly 24
/// hex characters is rejected.
pub fn parse_id(raw: &str) -> Result<ObjectId, IdError> {
    Ok(ObjectId::parse_str(raw.trim())?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(title: &str, completed: bool) -> TodoRecord {
        TodoRecord {
            id: ObjectId::new(),
            title: title.to_string(),
            completed,
            created_at: DateTime::from_millis(1_700_000_000_123),
        }
    }

    #[test]
    fn mint_starts_incomplete_with_fresh_id() {
        let before = DateTime::now();
        let first = TodoRecord::mint(CreateTodo {
            title: "buy milk".to_string(),
        });
        let second = TodoRecord::mint(CreateTodo {
            title: "buy milk".to_string(),
        });
        let after = DateTime::now();

        assert_eq!(first.title, "buy milk");
        assert!(!first.completed);
        assert_ne!(first.id, second.id);
        assert!(first.created_at >= before && first.created_at <= after);
    }

    #[test]
    fn to_wire_renders_lowercase_hex_and_keeps_fields() {
        let stored = record("walk dog", true);
        let todo = Todo::from(stored.clone());

        assert_eq!(todo.id, stored.id.to_hex());
        assert_eq!(todo.id.len(), 24);
        assert!(todo.id.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert_eq!(todo.title, "walk dog");
        assert!(todo.completed);
        assert_eq!(todo.created_at.timestamp_millis(), 1_700_000_000_123);
    }

    #[test]
    fn apply_reports_whether_anything_changed() {
        let mut stored = record("walk dog", false);
        let original = stored.clone();

        let same = TodoChanges {
            title: "walk dog".to_string(),
            completed: false,
        };
        assert!(!same.apply(&mut stored));
        assert_eq!(stored, original);

        let done = TodoChanges {
            title: "walk dog".to_string(),
            completed: true,
        };
        assert!(done.apply(&mut stored));
        assert!(stored.completed);
        assert_eq!(stored.id, original.id);
        assert_eq!(stored.created_at, original.created_at);
    }

    #[test]
    fn parse_id_accepts_hex_and_trims() {
        let id = ObjectId::new();
        assert_eq!(parse_id(&id.to_hex()).unwrap(), id);
        assert_eq!(parse_id(&format!("  {}\n", id.to_hex())).unwrap(), id);
    }

    #[test]
    fn parse_id_rejects_malformed_values() {
        for raw in ["", "abc", "zzzzzzzzzzzzzzzzzzzzzzzz", "507f1f77bcf86cd7994390110"] {
            assert!(parse_id(raw).is_err(), "{raw:?} should be rejected");
        }
    }
}
