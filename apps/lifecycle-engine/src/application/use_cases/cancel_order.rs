//! Cancel order use case.
//!
//! User-initiated cancellation goes through the same compare-and-set
//! discipline as scheduled transitions, so it cannot race a concurrent
//! execution into a double terminal state.

use std::sync::Arc;

use crate::application::ports::EventNotifier;
use crate::application::services::LinkedOrderCoordinator;
use crate::domain::orders::aggregate::Order;
use crate::domain::orders::store::OrderStore;
use crate::domain::orders::value_objects::{CancelReason, OrderStatus};
use crate::domain::shared::{OcoGroupId, OrderId};
use crate::error::EngineError;

/// Use case for cancelling orders and order groups.
pub struct CancelOrderUseCase<S, N>
where
    S: OrderStore,
    N: EventNotifier,
{
    store: Arc<S>,
    notifier: Arc<N>,
    linked: LinkedOrderCoordinator<S, N>,
}

impl<S, N> CancelOrderUseCase<S, N>
where
    S: OrderStore,
    N: EventNotifier,
{
    /// Create a new cancel use case.
    pub fn new(store: Arc<S>, notifier: Arc<N>) -> Self {
        let linked = LinkedOrderCoordinator::new(Arc::clone(&store), Arc::clone(&notifier));
        Self {
            store,
            notifier,
            linked,
        }
    }

    /// Cancel a single order.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for unknown ids and `InvalidTransition` when the
    /// order is already terminal (including losing the race to a concurrent
    /// transition).
    pub async fn cancel(&self, id: &OrderId, reason: CancelReason) -> Result<Order, EngineError> {
        let order = self
            .store
            .get(id)
            .await?
            .ok_or_else(|| EngineError::NotFound {
                order_id: id.as_str().to_string(),
            })?;

        if order.status().is_terminal() {
            return Err(EngineError::InvalidTransition {
                from: order.status(),
                to: OrderStatus::Cancelled,
            });
        }

        let expected = order.status();
        let mut updated = order;
        updated.cancel(reason)?;

        match self.store.compare_and_swap(expected, &updated).await {
            Ok(()) => {
                let events = updated.drain_events();
                if let Err(e) = self.notifier.publish_events(events).await {
                    tracing::warn!(order_id = %id, error = %e, "Failed to publish cancel events");
                }
                tracing::info!(order_id = %id, "Order cancelled");
                Ok(updated)
            }
            Err(e) if e.is_conflict() => {
                // Another operation transitioned the order first; report the
                // state it actually reached.
                let current = self.store.get(id).await?.map_or(OrderStatus::Cancelled, |o| o.status());
                Err(EngineError::InvalidTransition {
                    from: current,
                    to: OrderStatus::Cancelled,
                })
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Cancel every non-terminal member of an OCO group with a uniform
    /// reason. Returns the members cancelled by this call.
    ///
    /// # Errors
    ///
    /// Returns `Store` if the group cannot be loaded.
    pub async fn cancel_group(
        &self,
        group_id: &OcoGroupId,
        reason: CancelReason,
    ) -> Result<Vec<Order>, EngineError> {
        let cancelled = self.linked.cancel_group(group_id, reason).await?;
        tracing::info!(
            group_id = %group_id,
            cancelled = cancelled.len(),
            "Order group cancelled"
        );
        Ok(cancelled)
    }
}
