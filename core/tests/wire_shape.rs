//! JSON shapes of the wire types and envelopes.
//!
//! Compares parsed `serde_json::Value`s rather than raw strings so field
//! ordering does not matter.

use serde_json::json;
use todo_core::{CreateTodo, DeleteOutcome, Envelope, ObjectId, Todo, TodoRecord, UpdateTodo};

#[test]
fn todo_serializes_with_rfc3339_timestamp() {
    let record = TodoRecord {
        id: ObjectId::parse_str("507f1f77bcf86cd799439011").unwrap(),
        title: "buy milk".to_string(),
        completed: false,
        created_at: bson::DateTime::from_millis(1_700_000_000_000),
    };
    let value = serde_json::to_value(Todo::from(record)).unwrap();

    assert_eq!(
        value,
        json!({
            "id": "507f1f77bcf86cd799439011",
            "title": "buy milk",
            "completed": false,
            "created_at": "2023-11-14T22:13:20Z",
        })
    );
}

#[test]
fn record_uses_native_id_key() {
    let record = TodoRecord::mint(CreateTodo {
        title: "walk dog".to_string(),
    });
    let document = bson::to_document(&record).unwrap();

    assert_eq!(document.get_object_id("_id").unwrap(), record.id);
    assert_eq!(document.get_str("title").unwrap(), "walk dog");
    assert!(!document.get_bool("completed").unwrap());
    assert!(document.get_datetime("created_at").is_ok());
    assert_eq!(document.len(), 4);
}

#[test]
fn create_body_without_title_decodes_to_empty() {
    let input: CreateTodo = serde_json::from_str("{}").unwrap();
    assert!(input.title.is_empty());
}

#[test]
fn update_body_defaults_completed_and_ignores_unknown_fields() {
    let input: UpdateTodo = serde_json::from_str(
        r#"{"title":"x","id":"507f1f77bcf86cd799439011","created_at":"1999-01-01T00:00:00Z"}"#,
    )
    .unwrap();
    assert_eq!(input.title, "x");
    assert!(!input.completed);
}

#[test]
fn list_envelope_keeps_empty_data_as_array() {
    let value = serde_json::to_value(Envelope::ok("todos retrieved successfully", Vec::<Todo>::new()))
        .unwrap();
    assert_eq!(value, json!({"message": "todos retrieved successfully", "data": []}));
}

#[test]
fn created_envelope_carries_upper_case_id_key() {
    let value = serde_json::to_value(Envelope::created(
        "todo created successfully",
        "507f1f77bcf86cd799439011",
    ))
    .unwrap();
    assert_eq!(
        value,
        json!({"message": "todo created successfully", "ID": "507f1f77bcf86cd799439011"})
    );
}

#[test]
fn failure_envelope_has_no_data() {
    let value = serde_json::to_value(Envelope::failure("the id is invalid", "bad hex")).unwrap();
    assert_eq!(value, json!({"message": "the id is invalid", "error": "bad hex"}));

    let value = serde_json::to_value(Envelope::message("title required.")).unwrap();
    assert_eq!(value, json!({"message": "title required."}));
}

#[test]
fn delete_outcome_shape() {
    let value = serde_json::to_value(Envelope::ok(
        "item deleted successfully",
        DeleteOutcome { deleted_count: 1 },
    ))
    .unwrap();
    assert_eq!(
        value,
        json!({"message": "item deleted successfully", "data": {"deleted_count": 1}})
    );
}

#[test]
fn delete_envelope_decodes_with_and_without_data() {
    let deleted: Envelope<DeleteOutcome> = serde_json::from_value(json!({
        "message": "item deleted successfully",
        "data": {"deleted_count": 2}
    }))
    .unwrap();
    assert_eq!(deleted.data, Some(DeleteOutcome { deleted_count: 2 }));

    let failed: Envelope<DeleteOutcome> = serde_json::from_value(json!({
        "message": "the id is invalid",
        "error": "invalid hex"
    }))
    .unwrap();
    assert_eq!(failed.data, None);
    assert_eq!(failed.id, None);
    assert_eq!(failed.error.as_deref(), Some("invalid hex"));
}
