//! Event notifier port (driven port).
//!
//! Lifecycle events are handed to this port for downstream broadcast.
//! Publishing is fire-and-forget: implementations must never block the
//! engine, and callers log delivery errors without propagating them.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::orders::events::OrderEvent;

/// Event publishing error.
#[derive(Debug, Clone, Error)]
pub enum NotifyError {
    /// Delivery failed.
    #[error("Event publish failed: {message}")]
    PublishFailed {
        /// Error details.
        message: String,
    },
}

/// Port for publishing lifecycle events.
#[async_trait]
pub trait EventNotifier: Send + Sync {
    /// Publish a batch of lifecycle events.
    async fn publish_events(&self, events: Vec<OrderEvent>) -> Result<(), NotifyError>;

    /// Publish a single lifecycle event.
    async fn publish_event(&self, event: OrderEvent) -> Result<(), NotifyError> {
        self.publish_events(vec![event]).await
    }
}

/// No-op notifier for tests and minimal wiring.
#[derive(Debug, Clone, Default)]
pub struct NoOpEventNotifier;

#[async_trait]
impl EventNotifier for NoOpEventNotifier {
    async fn publish_events(&self, _events: Vec<OrderEvent>) -> Result<(), NotifyError> {
        Ok(())
    }
}
