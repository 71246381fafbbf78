use async_trait::async_trait;
use thiserror::Error;

use super::{BrokerConfig, ConnectError};

/// Publish failure on an established channel (broker NACK, closed
/// channel, connection dropped mid-publish).
#[derive(Debug, Error)]
#[error("publish failed: {0}")]
pub struct ChannelError(pub String);

/// Connection factory for a broker endpoint.
///
/// The production implementation is [`AmqpTransport`](super::AmqpTransport);
/// tests inject in-memory fakes through the same seam.
#[async_trait]
pub trait BrokerTransport: Send + Sync {
    /// Open a transport connection and a logical channel, and ensure the
    /// target durable queue exists. The queue declaration is idempotent:
    /// safe when the queue already exists with matching durability.
    async fn connect(&self, config: &BrokerConfig)
        -> Result<Box<dyn BrokerChannel>, ConnectError>;
}

/// An open logical channel to the broker.
#[async_trait]
pub trait BrokerChannel: Send + Sync {
    /// Publish `body` to `queue`, marked persistent, awaiting the broker's
    /// confirmation.
    async fn publish(&self, queue: &str, body: &[u8]) -> Result<(), ChannelError>;

    /// Whether the underlying channel is still usable.
    fn is_open(&self) -> bool;

    /// Graceful shutdown. Errors are logged, never propagated.
    async fn close(&self);
}
