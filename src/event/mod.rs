use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

mod validation;
#[cfg(test)]
mod tests;

pub use validation::{validate, ValidationError};

/// Recipient identifier. Opaque to the publisher: callers use whatever
/// their user store keys on, string or integer.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum UserId {
    Text(String),
    Number(i64),
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserId::Text(s) => write!(f, "{}", s),
            UserId::Number(n) => write!(f, "{}", n),
        }
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        UserId::Text(s.to_string())
    }
}

impl From<String> for UserId {
    fn from(s: String) -> Self {
        UserId::Text(s)
    }
}

impl From<i64> for UserId {
    fn from(n: i64) -> Self {
        UserId::Number(n)
    }
}

/// NotificationEvent is the unit of work handed to the broker.
///
/// Field order here is the wire order: the published JSON body carries
/// exactly these four keys, with `message_type` serialized as `type`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NotificationEvent {
    /// Recipient of the notification
    pub user_id: UserId,

    /// Short tag classifying the event (e.g. "comment", "like")
    #[serde(rename = "type")]
    pub message_type: String,

    /// Caller-supplied details (e.g. post_id, actor_name); opaque JSON object
    pub payload: Value,

    /// Assigned by the publisher at send time, UTC, sub-second precision.
    /// Never caller-supplied, so producer and consumer clocks can't disagree
    /// about when the event was created.
    pub timestamp: DateTime<Utc>,
}

impl NotificationEvent {
    /// Build an event from caller input, stamping the current wall-clock time.
    pub fn record(user_id: UserId, message_type: impl Into<String>, payload: Value) -> Self {
        Self {
            user_id,
            message_type: message_type.into(),
            payload,
            timestamp: Utc::now(),
        }
    }

    /// Structural validation applied before any broker I/O.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validation::validate(self)
    }
}
