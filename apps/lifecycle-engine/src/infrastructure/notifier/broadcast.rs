//! Broadcast-channel event notifier.
//!
//! Fans lifecycle events out to in-process subscribers over a
//! `tokio::sync::broadcast` channel. Sending never blocks; events published
//! with no subscribers are dropped.

use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::application::ports::{EventNotifier, NotifyError};
use crate::domain::orders::events::OrderEvent;

/// Default channel capacity.
const DEFAULT_CAPACITY: usize = 256;

/// Notifier backed by a broadcast channel.
#[derive(Debug)]
pub struct BroadcastEventNotifier {
    tx: broadcast::Sender<OrderEvent>,
}

impl BroadcastEventNotifier {
    /// Create a notifier with the default capacity.
    #[must_use]
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(DEFAULT_CAPACITY);
        Self { tx }
    }

    /// Subscribe to lifecycle events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<OrderEvent> {
        self.tx.subscribe()
    }
}

impl Default for BroadcastEventNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventNotifier for BroadcastEventNotifier {
    async fn publish_events(&self, events: Vec<OrderEvent>) -> Result<(), NotifyError> {
        for event in events {
            // No subscribers is not an error for fire-and-forget delivery.
            let _ = self.tx.send(event);
        }
        Ok(())
    }
}
