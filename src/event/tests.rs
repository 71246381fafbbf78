use super::*;
use serde_json::json;

#[test]
fn test_valid_event_passes_validation() {
    let event = NotificationEvent::record(
        UserId::from("u1"),
        "comment",
        json!({"post_id": 42, "actor_name": "alice"}),
    );

    assert!(event.validate().is_ok());
}

#[test]
fn test_record_stamps_current_time() {
    let before = Utc::now();
    let event = NotificationEvent::record(UserId::from("u1"), "like", json!({}));
    let after = Utc::now();

    assert!(event.timestamp >= before);
    assert!(event.timestamp <= after);
}

#[test]
fn test_empty_user_id_fails() {
    let event = NotificationEvent::record(UserId::from(""), "comment", json!({"post_id": 42}));

    assert_eq!(event.validate().unwrap_err(), ValidationError::EmptyUserId);
}

#[test]
fn test_numeric_user_id_passes() {
    let event = NotificationEvent::record(UserId::from(7), "comment", json!({"post_id": 42}));

    assert!(event.validate().is_ok());
}

#[test]
fn test_empty_type_fails() {
    let event = NotificationEvent::record(UserId::from("u1"), "", json!({"post_id": 42}));

    assert_eq!(event.validate().unwrap_err(), ValidationError::EmptyType);
}

#[test]
fn test_invalid_type_format_fails() {
    let event = NotificationEvent::record(UserId::from("u1"), "New Like", json!({}));

    match event.validate().unwrap_err() {
        ValidationError::InvalidTypeFormat(_) => {}
        other => panic!("Expected InvalidTypeFormat error, got {:?}", other),
    }
}

#[test]
fn test_non_object_payload_fails() {
    let event = NotificationEvent::record(UserId::from("u1"), "comment", json!([1, 2, 3]));
    assert_eq!(event.validate().unwrap_err(), ValidationError::PayloadNotObject);

    let event = NotificationEvent::record(UserId::from("u1"), "comment", json!("text"));
    assert_eq!(event.validate().unwrap_err(), ValidationError::PayloadNotObject);

    let event = NotificationEvent::record(UserId::from("u1"), "comment", Value::Null);
    assert_eq!(event.validate().unwrap_err(), ValidationError::PayloadNotObject);
}

#[test]
fn test_wire_format_key_order() {
    let event = NotificationEvent::record(UserId::from("u1"), "comment", json!({"post_id": 42}));
    let body = serde_json::to_string(&event).unwrap();

    // Exactly four keys, in wire order, with message_type renamed to "type"
    let user_id = body.find("\"user_id\"").unwrap();
    let kind = body.find("\"type\"").unwrap();
    let payload = body.find("\"payload\"").unwrap();
    let timestamp = body.find("\"timestamp\"").unwrap();
    assert!(user_id < kind);
    assert!(kind < payload);
    assert!(payload < timestamp);
    assert!(!body.contains("message_type"));
}

#[test]
fn test_wire_format_round_trip() {
    let event = NotificationEvent::record(
        UserId::from("u1"),
        "comment",
        json!({"post_id": 42, "actor_name": "alice"}),
    );
    let body = serde_json::to_vec(&event).unwrap();

    let parsed: NotificationEvent = serde_json::from_slice(&body).unwrap();
    assert_eq!(parsed.user_id, UserId::Text("u1".to_string()));
    assert_eq!(parsed.message_type, "comment");
    assert_eq!(parsed.payload["post_id"], 42);
    assert_eq!(parsed.payload["actor_name"], "alice");
    assert_eq!(parsed.timestamp, event.timestamp);
}

#[test]
fn test_numeric_user_id_serializes_as_number() {
    let event = NotificationEvent::record(UserId::from(42), "like", json!({}));
    let value: Value = serde_json::to_value(&event).unwrap();

    assert_eq!(value["user_id"], json!(42));
}

#[test]
fn test_timestamp_serializes_as_iso8601() {
    let event = NotificationEvent::record(UserId::from("u1"), "like", json!({}));
    let value: Value = serde_json::to_value(&event).unwrap();

    let raw = value["timestamp"].as_str().expect("timestamp must be a string");
    let parsed: DateTime<Utc> = raw.parse().unwrap();
    assert_eq!(parsed, event.timestamp);
}

#[test]
fn test_user_id_display() {
    assert_eq!(UserId::from("u1").to_string(), "u1");
    assert_eq!(UserId::from(42).to_string(), "42");
}
