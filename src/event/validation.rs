use super::{NotificationEvent, UserId};
use std::fmt;

/// Validation errors for NotificationEvent
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    EmptyUserId,
    EmptyType,
    InvalidTypeFormat(String),
    PayloadNotObject,
    NotSerializable(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::EmptyUserId => write!(f, "user_id is required"),
            ValidationError::EmptyType => write!(f, "message type is required"),
            ValidationError::InvalidTypeFormat(t) => {
                write!(f, "invalid message type '{}': must be a lowercase tag", t)
            }
            ValidationError::PayloadNotObject => {
                write!(f, "payload must be a JSON object")
            }
            ValidationError::NotSerializable(e) => {
                write!(f, "payload not representable as JSON: {}", e)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Validates a NotificationEvent before publishing.
///
/// Validation rules:
/// - user_id: non-empty in its text form
/// - message type: lowercase tag (e.g. "comment", "follow.request")
/// - payload: must be a JSON object (not array, string, etc.)
pub fn validate(event: &NotificationEvent) -> Result<(), ValidationError> {
    if let UserId::Text(id) = &event.user_id {
        if id.is_empty() {
            return Err(ValidationError::EmptyUserId);
        }
    }

    if event.message_type.is_empty() {
        return Err(ValidationError::EmptyType);
    }
    if !is_valid_type_tag(&event.message_type) {
        return Err(ValidationError::InvalidTypeFormat(event.message_type.clone()));
    }

    if !event.payload.is_object() {
        return Err(ValidationError::PayloadNotObject);
    }

    Ok(())
}

/// Validates message type format.
///
/// Valid type tags:
/// - Lowercase letters (a-z)
/// - Numbers (0-9)
/// - Underscores, dots (.) for hierarchy
/// - No leading/trailing dots
/// - No consecutive dots
fn is_valid_type_tag(tag: &str) -> bool {
    if tag.is_empty() {
        return false;
    }

    if tag.starts_with('.') || tag.ends_with('.') {
        return false;
    }

    if tag.contains("..") {
        return false;
    }

    tag.chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '.')
}

#[cfg(test)]
mod validation_tests {
    use super::*;

    #[test]
    fn test_valid_type_tags() {
        assert!(is_valid_type_tag("comment"));
        assert!(is_valid_type_tag("like"));
        assert!(is_valid_type_tag("follow.request"));
        assert!(is_valid_type_tag("story_reply"));
        assert!(is_valid_type_tag("mention2"));
    }

    #[test]
    fn test_invalid_type_tags() {
        assert!(!is_valid_type_tag(""));
        assert!(!is_valid_type_tag(".comment"));
        assert!(!is_valid_type_tag("comment."));
        assert!(!is_valid_type_tag("follow..request"));
        assert!(!is_valid_type_tag("Comment"));
        assert!(!is_valid_type_tag("LIKE"));
        assert!(!is_valid_type_tag("like!"));
        assert!(!is_valid_type_tag("new like"));
    }
}
