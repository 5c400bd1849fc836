//! Execution coordinator.
//!
//! Orchestrates validate -> execute -> persist -> notify -> cascade for a
//! single order. The check-trigger-then-execute sequence is a serialized
//! critical section: a keyed async lock (OCO group when present, otherwise
//! the order id) prevents concurrent evaluators from reaching the trade
//! executor twice, and the store's compare-and-set backs every status
//! commit. Execution is never retried; a failed order is terminal and must
//! be resubmitted.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex as AsyncMutex;

use crate::application::ports::{
    EventNotifier, MarketDataFeed, PortfolioProvider, RiskValidator, TradeExecutor,
};
use crate::application::services::LinkedOrderCoordinator;
use crate::domain::orders::aggregate::Order;
use crate::domain::orders::store::OrderStore;
use crate::domain::orders::value_objects::OrderFill;
use crate::domain::shared::{Money, OrderId, Quantity, Timestamp};

/// Result of an execution attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// Whether the order reached `Executed`.
    pub success: bool,
    /// Execution price, on success.
    pub executed_price: Option<Money>,
    /// Executed quantity, on success.
    pub executed_quantity: Option<Quantity>,
    /// Commission charged, on success.
    pub commission: Option<Money>,
    /// Outcome detail.
    pub message: String,
    /// When the attempt completed.
    pub timestamp: Timestamp,
}

impl ExecutionResult {
    fn success(price: Money, quantity: Quantity, commission: Money) -> Self {
        Self {
            success: true,
            executed_price: Some(price),
            executed_quantity: Some(quantity),
            commission: Some(commission),
            message: "executed".to_string(),
            timestamp: Timestamp::now(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            executed_price: None,
            executed_quantity: None,
            commission: None,
            message: message.into(),
            timestamp: Timestamp::now(),
        }
    }
}

/// Keyed async locks serializing execution critical sections.
#[derive(Default)]
struct ExecutionLocks {
    inner: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl ExecutionLocks {
    fn for_key(&self, key: &str) -> Arc<AsyncMutex<()>> {
        let mut map = self.inner.lock();
        Arc::clone(
            map.entry(key.to_string())
                .or_insert_with(|| Arc::new(AsyncMutex::new(()))),
        )
    }
}

/// Coordinates execution of a single order.
pub struct ExecutionCoordinator<S, F, R, P, X, N>
where
    S: OrderStore,
    F: MarketDataFeed,
    R: RiskValidator,
    P: PortfolioProvider,
    X: TradeExecutor,
    N: EventNotifier,
{
    store: Arc<S>,
    feed: Arc<F>,
    risk: Arc<R>,
    portfolios: Arc<P>,
    executor: Arc<X>,
    notifier: Arc<N>,
    linked: LinkedOrderCoordinator<S, N>,
    locks: ExecutionLocks,
    commission_rate: Decimal,
}

impl<S, F, R, P, X, N> ExecutionCoordinator<S, F, R, P, X, N>
where
    S: OrderStore,
    F: MarketDataFeed,
    R: RiskValidator,
    P: PortfolioProvider,
    X: TradeExecutor,
    N: EventNotifier,
{
    /// Create a new execution coordinator.
    pub fn new(
        store: Arc<S>,
        feed: Arc<F>,
        risk: Arc<R>,
        portfolios: Arc<P>,
        executor: Arc<X>,
        notifier: Arc<N>,
        commission_rate: Decimal,
    ) -> Self {
        let linked = LinkedOrderCoordinator::new(Arc::clone(&store), Arc::clone(&notifier));
        Self {
            store,
            feed,
            risk,
            portfolios,
            executor,
            notifier,
            linked,
            locks: ExecutionLocks::default(),
            commission_rate,
        }
    }

    /// Execute an order at the given price, or the latest market price.
    ///
    /// On success the order is `Executed`, fill fields are populated, OCO
    /// siblings are cancelled, and an `order_executed` event is published.
    /// On failure the order is terminally `Cancelled` with reason
    /// "Execution failed: ..." and an `order_execution_failed` event is
    /// published.
    pub async fn execute(
        &self,
        order_id: &OrderId,
        market_price: Option<Money>,
    ) -> ExecutionResult {
        // The lock key is resolved from an unlocked read; linking never
        // changes after submission, so the key is stable.
        let probe = match self.store.get(order_id).await {
            Ok(Some(order)) => order,
            Ok(None) => return ExecutionResult::failure("order not found"),
            Err(e) => return ExecutionResult::failure(e.to_string()),
        };
        let key = probe.oco_group_id().map_or_else(
            || order_id.as_str().to_string(),
            |group| format!("oco:{group}"),
        );

        let lock = self.locks.for_key(&key);
        let _guard = lock.lock().await;

        // Re-read under the lock: an OCO cascade or a user cancel may have
        // landed while we waited.
        let order = match self.store.get(order_id).await {
            Ok(Some(order)) => order,
            Ok(None) => return ExecutionResult::failure("order not found"),
            Err(e) => return ExecutionResult::failure(e.to_string()),
        };
        if !order.status().is_active() {
            tracing::debug!(
                order_id = %order_id,
                status = %order.status(),
                "Skipping execution, order already transitioned"
            );
            return ExecutionResult::failure("order already transitioned");
        }

        let Some(price) = self.resolve_price(&order, market_price).await else {
            return self.fail(order, "invalid execution price").await;
        };

        // Pre-trade re-validation against the live portfolio.
        match self.portfolios.fetch(order.portfolio_id()).await {
            Some(portfolio) => {
                let report = self.risk.validate(&order, &portfolio).await;
                for warning in &report.warnings {
                    tracing::warn!(order_id = %order_id, warning = %warning, "Risk warning");
                }
                if !report.valid {
                    return self.fail(order, &report.errors.join("; ")).await;
                }
            }
            None => return self.fail(order, "portfolio unavailable").await,
        }

        let commission = price * (order.quantity().amount() * self.commission_rate);

        let trade = match self
            .executor
            .execute(
                order.portfolio_id(),
                order.symbol(),
                order.side(),
                order.quantity(),
            )
            .await
        {
            Ok(trade) => trade,
            Err(e) => return self.fail(order, &e.to_string()).await,
        };

        let expected = order.status();
        let mut updated = order;
        let fill = OrderFill {
            fill_id: trade.fill_id,
            executed_price: price,
            executed_quantity: updated.quantity(),
            commission,
            executed_at: Timestamp::now(),
        };
        if let Err(e) = updated.execute(fill) {
            tracing::debug!(order_id = %order_id, error = %e, "Fill dropped, order not executable");
            return ExecutionResult::failure(e.to_string());
        }

        match self.store.compare_and_swap(expected, &updated).await {
            Ok(()) => {
                let events = updated.drain_events();
                if let Err(e) = self.notifier.publish_events(events).await {
                    tracing::warn!(order_id = %order_id, error = %e, "Failed to publish execution events");
                }

                // Cascade before the group lock is released, so an OCO
                // sibling waiting on the lock sees itself cancelled.
                self.linked.on_executed(&updated).await;

                tracing::info!(
                    order_id = %order_id,
                    price = %price,
                    quantity = %updated.quantity(),
                    "Order executed"
                );
                ExecutionResult::success(price, updated.quantity(), commission)
            }
            Err(e) if e.is_conflict() => {
                tracing::debug!(order_id = %order_id, "Execution commit lost the race");
                ExecutionResult::failure("order already transitioned")
            }
            Err(e) => {
                tracing::error!(order_id = %order_id, error = %e, "Failed to persist execution");
                ExecutionResult::failure(e.to_string())
            }
        }
    }

    async fn resolve_price(&self, order: &Order, market_price: Option<Money>) -> Option<Money> {
        let price = match market_price {
            Some(price) => Some(price),
            None => self
                .feed
                .snapshot(std::slice::from_ref(order.symbol()))
                .await
                .ok()
                .and_then(|snapshot| snapshot.get(order.symbol()).map(|quote| quote.price)),
        };
        price.filter(Money::is_positive)
    }

    /// Terminally cancel the order after a failed attempt and publish an
    /// `order_execution_failed` event.
    async fn fail(&self, order: Order, message: &str) -> ExecutionResult {
        let order_id = order.id().clone();
        let expected = order.status();
        let mut updated = order;

        if updated.fail_execution(message).is_ok() {
            match self.store.compare_and_swap(expected, &updated).await {
                Ok(()) => {
                    let events = updated.drain_events();
                    if let Err(e) = self.notifier.publish_events(events).await {
                        tracing::warn!(order_id = %order_id, error = %e, "Failed to publish failure events");
                    }
                    tracing::warn!(order_id = %order_id, reason = %message, "Order execution failed");
                }
                Err(e) if e.is_conflict() => {
                    tracing::debug!(order_id = %order_id, "Failure commit lost the race");
                }
                Err(e) => {
                    tracing::error!(order_id = %order_id, error = %e, "Failed to persist execution failure");
                }
            }
        }

        ExecutionResult::failure(message)
    }

    /// The linked-order coordinator sharing this coordinator's store.
    #[must_use]
    pub const fn linked(&self) -> &LinkedOrderCoordinator<S, N> {
        &self.linked
    }
}
