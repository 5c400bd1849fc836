//! Linked-order coordinator.
//!
//! Enforces OCO group invariants when an order's status changes and
//! implements group-level cancellation. Each sibling cancellation is an
//! independent compare-and-set; lost races are benign because the loser
//! already reached a terminal state.

use std::sync::Arc;

use crate::application::ports::EventNotifier;
use crate::domain::orders::aggregate::Order;
use crate::domain::orders::store::OrderStore;
use crate::domain::orders::value_objects::CancelReason;
use crate::domain::shared::OcoGroupId;

/// Coordinates OCO and bracket relationships between orders.
pub struct LinkedOrderCoordinator<S, N>
where
    S: OrderStore,
    N: EventNotifier,
{
    store: Arc<S>,
    notifier: Arc<N>,
}

impl<S, N> LinkedOrderCoordinator<S, N>
where
    S: OrderStore,
    N: EventNotifier,
{
    /// Create a new coordinator.
    pub const fn new(store: Arc<S>, notifier: Arc<N>) -> Self {
        Self { store, notifier }
    }

    /// Cascade after an order reaches `Executed`: cancel every non-terminal
    /// OCO sibling with reason "OCO - other order executed".
    ///
    /// Bracket children carry no runtime coupling beyond `parent_order_id`;
    /// nothing cascades to them here.
    pub async fn on_executed(&self, executed: &Order) {
        let Some(group_id) = executed.oco_group_id() else {
            return;
        };

        let siblings = match self.store.by_group(group_id).await {
            Ok(siblings) => siblings,
            Err(e) => {
                tracing::error!(
                    group_id = %group_id,
                    error = %e,
                    "Failed to load OCO group for cascade"
                );
                return;
            }
        };

        for sibling in siblings {
            if sibling.id() == executed.id() || sibling.status().is_terminal() {
                continue;
            }
            self.cancel_member(sibling, CancelReason::oco_sibling_executed())
                .await;
        }
    }

    /// Cancel every non-terminal member of a group with a uniform reason.
    ///
    /// Returns the members that were cancelled by this call.
    ///
    /// # Errors
    ///
    /// Returns error if the group cannot be loaded.
    pub async fn cancel_group(
        &self,
        group_id: &OcoGroupId,
        reason: CancelReason,
    ) -> Result<Vec<Order>, crate::domain::orders::store::StoreError> {
        let members = self.store.by_group(group_id).await?;
        let mut cancelled = Vec::new();

        for member in members {
            if member.status().is_terminal() {
                continue;
            }
            if let Some(order) = self.cancel_member(member, reason.clone()).await {
                cancelled.push(order);
            }
        }

        Ok(cancelled)
    }

    /// Cancel a single member through compare-and-set; a conflict means
    /// another operation already transitioned it.
    async fn cancel_member(&self, order: Order, reason: CancelReason) -> Option<Order> {
        let expected = order.status();
        let mut updated = order;

        if let Err(e) = updated.cancel(reason) {
            tracing::debug!(order_id = %updated.id(), error = %e, "Skipping cascade cancel");
            return None;
        }

        match self.store.compare_and_swap(expected, &updated).await {
            Ok(()) => {
                let events = updated.drain_events();
                if let Err(e) = self.notifier.publish_events(events).await {
                    tracing::warn!(order_id = %updated.id(), error = %e, "Failed to publish cancel events");
                }
                tracing::info!(
                    order_id = %updated.id(),
                    reason = %updated.termination().map_or("", |t| t.reason.as_str()),
                    "Linked order cancelled"
                );
                Some(updated)
            }
            Err(e) if e.is_conflict() => {
                tracing::debug!(order_id = %updated.id(), "Cascade cancel lost the race");
                None
            }
            Err(e) => {
                tracing::error!(order_id = %updated.id(), error = %e, "Cascade cancel failed");
                None
            }
        }
    }
}
