use std::time::Duration;

use serde_json::Value;
use tokio::sync::Mutex;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::event::{NotificationEvent, UserId, ValidationError};

use super::transport::{BrokerChannel, BrokerTransport};
use super::{BrokerConfig, ConnectError, PublishError};

/// Lifecycle of the publisher's broker handle. Owned exclusively by
/// [`Publisher`]; exposed read-only via [`Publisher::state`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Ready,
    Degraded,
    Closed,
}

struct Inner {
    state: ConnectionState,
    channel: Option<Box<dyn BrokerChannel>>,
}

/// Notification publisher with a single logical broker channel.
///
/// All callers share one channel; the inner mutex is the serialization
/// point for `send`/`connect`/`close`. The mutex is never held across a
/// backoff sleep, so one caller's retries delay only that caller.
///
/// Constructed explicitly and passed to whatever needs to send
/// notifications; there is no process-wide instance.
pub struct Publisher {
    transport: Box<dyn BrokerTransport>,
    config: BrokerConfig,
    inner: Mutex<Inner>,
}

impl Publisher {
    pub fn new(transport: Box<dyn BrokerTransport>, config: BrokerConfig) -> Self {
        Self {
            transport,
            config,
            inner: Mutex::new(Inner {
                state: ConnectionState::Disconnected,
                channel: None,
            }),
        }
    }

    /// Current lifecycle state.
    pub async fn state(&self) -> ConnectionState {
        self.inner.lock().await.state
    }

    /// Establish the transport connection, logical channel, and durable
    /// queue. Safe to call when already connected.
    ///
    /// On failure the state is left where it was: `Disconnected`, or
    /// `Degraded` if the publisher had already degraded.
    pub async fn connect(&self) -> Result<(), ConnectError> {
        let mut inner = self.inner.lock().await;
        self.connect_locked(&mut inner).await
    }

    async fn connect_locked(&self, inner: &mut Inner) -> Result<(), ConnectError> {
        if inner.state == ConnectionState::Closed {
            return Err(ConnectError::Closed);
        }
        if let Some(channel) = inner.channel.as_ref() {
            if channel.is_open() {
                inner.state = ConnectionState::Ready;
                return Ok(());
            }
        }

        let fallback = match inner.state {
            ConnectionState::Degraded => ConnectionState::Degraded,
            _ => ConnectionState::Disconnected,
        };
        inner.state = ConnectionState::Connecting;
        inner.channel = None;

        match self.transport.connect(&self.config).await {
            Ok(channel) => {
                inner.channel = Some(channel);
                inner.state = ConnectionState::Ready;
                Ok(())
            }
            Err(e) => {
                inner.state = fallback;
                warn!(error = %e, "Broker connection failed");
                Err(e)
            }
        }
    }

    /// Publish one notification with at-least-once intent.
    ///
    /// Stamps the current time, serializes the canonical four-key JSON
    /// body, and publishes it marked persistent. If no connection is up, a
    /// single connect is attempted; failure there returns
    /// [`PublishError::Unavailable`] immediately rather than queuing the
    /// message, so a notification outage never stalls the caller.
    ///
    /// Publish failures on an established connection are retried up to
    /// `max_retries` times with exponential backoff, reconnecting between
    /// attempts. Worst-case latency is bounded by the configured backoff
    /// sum plus broker I/O.
    pub async fn send(
        &self,
        user_id: impl Into<UserId>,
        message_type: impl Into<String>,
        payload: Value,
    ) -> Result<(), PublishError> {
        let event = NotificationEvent::record(user_id.into(), message_type, payload);
        event.validate()?;

        // Programmer error, never retried
        let body = serde_json::to_vec(&event).map_err(|e| {
            PublishError::InvalidPayload(ValidationError::NotSerializable(e.to_string()))
        })?;

        let mut attempts: u32 = 0;
        let mut last_error = String::new();

        loop {
            {
                let mut inner = self.inner.lock().await;
                if inner.state == ConnectionState::Closed {
                    return Err(PublishError::Closed);
                }

                let connected = inner.channel.as_ref().map_or(false, |c| c.is_open());
                if !connected {
                    match self.connect_locked(&mut inner).await {
                        Ok(()) => {}
                        Err(e) if attempts == 0 => {
                            // Cold connect failure: fail fast, never buffer
                            // the message in memory.
                            warn!(
                                user_id = %event.user_id,
                                error = %e,
                                "Notification skipped, broker unavailable"
                            );
                            return Err(PublishError::Unavailable(e));
                        }
                        Err(e) => {
                            debug!(
                                user_id = %event.user_id,
                                attempt = attempts + 1,
                                error = %e,
                                "Reconnect attempt failed"
                            );
                            last_error = e.to_string();
                        }
                    }
                }

                if let Some(channel) = inner.channel.as_ref() {
                    attempts += 1;
                    match channel.publish(&self.config.queue_name, &body).await {
                        Ok(()) => {
                            inner.state = ConnectionState::Ready;
                            info!(
                                user_id = %event.user_id,
                                message_type = %event.message_type,
                                attempt = attempts,
                                "Notification published"
                            );
                            return Ok(());
                        }
                        Err(e) => {
                            warn!(
                                user_id = %event.user_id,
                                attempt = attempts,
                                error = %e,
                                "Publish attempt failed"
                            );
                            last_error = e.to_string();
                            // Channel may be poisoned; reconnect next attempt
                            inner.channel = None;
                        }
                    }
                } else {
                    attempts += 1;
                }

                if attempts > self.config.max_retries {
                    inner.state = ConnectionState::Degraded;
                    warn!(
                        user_id = %event.user_id,
                        attempts,
                        "Notification delivery failed, publisher degraded"
                    );
                    return Err(PublishError::DeliveryFailed {
                        attempts,
                        reason: last_error,
                    });
                }
            }

            // Lock released: only this caller waits out the backoff.
            sleep(self.backoff(attempts)).await;
        }
    }

    /// Graceful shutdown; terminal and idempotent. Safe to call when never
    /// connected or already closed. Internal errors are logged by the
    /// transport, never propagated, so shutdown can't mask the caller's
    /// own cleanup path.
    pub async fn close(&self) {
        let mut inner = self.inner.lock().await;
        if let Some(channel) = inner.channel.take() {
            channel.close().await;
        }
        if inner.state != ConnectionState::Closed {
            info!("Publisher closed");
            inner.state = ConnectionState::Closed;
        }
    }

    /// Exponential backoff for the given retry (1-based): base * 2^(n-1),
    /// capped at max_backoff_ms.
    fn backoff(&self, retry: u32) -> Duration {
        let exp = retry.saturating_sub(1).min(16);
        let ms = self.config.base_backoff_ms.saturating_mul(1u64 << exp);
        Duration::from_millis(ms.min(self.config.max_backoff_ms))
    }
}
