//! Structured-log event notifier.

use async_trait::async_trait;

use crate::application::ports::{EventNotifier, NotifyError};
use crate::domain::orders::events::OrderEvent;

/// Notifier that emits lifecycle events as structured log lines.
#[derive(Debug, Clone, Default)]
pub struct TracingEventNotifier;

#[async_trait]
impl EventNotifier for TracingEventNotifier {
    async fn publish_events(&self, events: Vec<OrderEvent>) -> Result<(), NotifyError> {
        for event in events {
            tracing::info!(
                event_type = event.event_type(),
                order_id = %event.order_id(),
                "Lifecycle event"
            );
        }
        Ok(())
    }
}
