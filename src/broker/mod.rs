// AMQP broker integration

mod amqp;
mod publisher;
mod transport;

#[cfg(test)]
mod tests;

pub use amqp::{AmqpTransport, BrokerConfig};
pub use publisher::{ConnectionState, Publisher};
pub use transport::{BrokerChannel, BrokerTransport, ChannelError};

use crate::event::ValidationError;
use thiserror::Error;

/// Errors establishing the transport connection, channel, or queue.
#[derive(Debug, Error)]
pub enum ConnectError {
    /// Endpoint unreachable (DNS, TCP, broker down)
    #[error("broker endpoint unreachable: {0}")]
    Unreachable(String),

    /// Broker rejected the credentials in the connection URL
    #[error("broker rejected credentials: {0}")]
    AuthFailed(String),

    /// Queue already exists with conflicting settings (e.g. non-durable)
    #[error("queue '{queue}' exists with conflicting settings: {reason}")]
    QueueConflict { queue: String, reason: String },

    /// Any other broker-side failure during setup
    #[error("broker error: {0}")]
    Broker(String),

    /// The publisher was closed; terminal
    #[error("publisher is closed")]
    Closed,
}

/// Errors surfaced to `send` callers.
///
/// Notification delivery is best-effort: every variant is returned as a
/// value and logged, never raised as a fault that could crash the caller.
#[derive(Debug, Error)]
pub enum PublishError {
    /// No connection could be established before publishing. The message
    /// was not queued anywhere; the caller's workflow continues.
    #[error("broker unavailable: {0}")]
    Unavailable(ConnectError),

    /// Connection established but publishing failed after exhausting the
    /// retry budget. The publisher is now degraded.
    #[error("delivery failed after {attempts} attempts: {reason}")]
    DeliveryFailed { attempts: u32, reason: String },

    /// Input failed structural validation; never retried
    #[error("invalid payload: {0}")]
    InvalidPayload(#[from] ValidationError),

    /// `send` called after `close`
    #[error("publisher is closed")]
    Closed,
}
