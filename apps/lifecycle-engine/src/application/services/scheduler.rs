//! Lifecycle scheduler.
//!
//! Owns the two periodic background passes: monitoring (price-triggered
//! orders) and expiration. Passes run independently of request-driven
//! operations; any failure inside a single order's evaluation is caught and
//! logged so the rest of the pass continues.

use std::collections::HashMap;
use std::sync::Arc;

use futures::future::join_all;
use tokio_util::sync::CancellationToken;

use crate::application::ports::{
    EventNotifier, MarketDataFeed, PortfolioProvider, RiskValidator, TradeExecutor,
};
use crate::application::services::ExecutionCoordinator;
use crate::config::EngineConfig;
use crate::domain::orders::aggregate::Order;
use crate::domain::orders::services::{self, TriggerDecision};
use crate::domain::orders::store::OrderStore;
use crate::domain::orders::value_objects::{OrderTerms, Quote};
use crate::domain::shared::{Symbol, Timestamp};

/// Periodic lifecycle scheduler.
///
/// Start with [`LifecycleScheduler::start`]; stop by cancelling the
/// injected token. The pass bodies are public so deterministic tests can
/// drive single ticks without timers.
pub struct LifecycleScheduler<S, F, R, P, X, N>
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
    coordinator: Arc<ExecutionCoordinator<S, F, R, P, X, N>>,
    notifier: Arc<N>,
    config: EngineConfig,
    shutdown: CancellationToken,
}

impl<S, F, R, P, X, N> LifecycleScheduler<S, F, R, P, X, N>
where
    S: OrderStore + 'static,
    F: MarketDataFeed + 'static,
    R: RiskValidator + 'static,
    P: PortfolioProvider + 'static,
    X: TradeExecutor + 'static,
    N: EventNotifier + 'static,
{
    /// Create a new scheduler.
    pub const fn new(
        store: Arc<S>,
        feed: Arc<F>,
        coordinator: Arc<ExecutionCoordinator<S, F, R, P, X, N>>,
        notifier: Arc<N>,
        config: EngineConfig,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            store,
            feed,
            coordinator,
            notifier,
            config,
            shutdown,
        }
    }

    /// Spawn the monitoring and expiration loops.
    pub fn start(self: &Arc<Self>) {
        tracing::info!(
            monitoring_interval_secs = self.config.monitoring_interval.as_secs(),
            expiration_interval_secs = self.config.expiration_interval.as_secs(),
            "Starting lifecycle scheduler"
        );

        let monitor = Arc::clone(self);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(monitor.config.monitoring_interval);
            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        monitor.run_monitoring_pass().await;
                    }
                    () = monitor.shutdown.cancelled() => {
                        tracing::info!("Monitoring pass shutting down");
                        break;
                    }
                }
            }
        });

        let expirer = Arc::clone(self);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(expirer.config.expiration_interval);
            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        expirer.run_expiration_pass().await;
                    }
                    () = expirer.shutdown.cancelled() => {
                        tracing::info!("Expiration pass shutting down");
                        break;
                    }
                }
            }
        });
    }

    /// Run one monitoring pass over all active orders.
    ///
    /// Skipped entirely while the market is closed. Orders are grouped by
    /// symbol to amortize price lookups; symbol groups evaluate
    /// concurrently, orders within a group sequentially. No ordering is
    /// guaranteed across symbols or within a group; correctness rests on
    /// the per-order compare-and-set, not on evaluation order.
    pub async fn run_monitoring_pass(&self) {
        if !self.feed.market_open().await {
            tracing::debug!("Market closed, skipping monitoring pass");
            return;
        }

        let orders = match self.store.active().await {
            Ok(orders) => orders,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load active orders");
                return;
            }
        };
        if orders.is_empty() {
            return;
        }

        let mut by_symbol: HashMap<Symbol, Vec<Order>> = HashMap::new();
        for order in orders {
            by_symbol.entry(order.symbol().clone()).or_default().push(order);
        }

        let symbols: Vec<Symbol> = by_symbol.keys().cloned().collect();
        let snapshot = match self.feed.snapshot(&symbols).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::error!(error = %e, "Failed to fetch market snapshot");
                return;
            }
        };

        let groups = by_symbol.into_iter().map(|(symbol, group)| {
            let quote = snapshot.get(&symbol).cloned();
            async move {
                let Some(quote) = quote else {
                    tracing::warn!(symbol = %symbol, "No quote for symbol, skipping group");
                    return;
                };
                for order in group {
                    self.evaluate_order(order, &quote).await;
                }
            }
        });
        join_all(groups).await;
    }

    /// Evaluate a single order against the tick's quote.
    async fn evaluate_order(&self, order: Order, quote: &Quote) {
        let order = match self.refresh_trailing(order, quote).await {
            Some(order) => order,
            None => return,
        };

        match services::evaluate(&order, quote) {
            TriggerDecision::Hold => {}
            TriggerDecision::Arm => self.arm_order(order, quote).await,
            TriggerDecision::Execute => {
                let result = self
                    .coordinator
                    .execute(order.id(), Some(quote.price))
                    .await;
                tracing::debug!(
                    order_id = %order.id(),
                    success = result.success,
                    outcome = %result.message,
                    "Scheduled execution attempt"
                );
            }
        }
    }

    /// Recompute the trailing high-water mark ahead of trigger evaluation.
    ///
    /// The update goes through the same compare-and-set as status
    /// transitions; losing the race skips the order for this tick.
    async fn refresh_trailing(&self, order: Order, quote: &Quote) -> Option<Order> {
        if !matches!(order.terms(), OrderTerms::TrailingStop { .. }) {
            return Some(order);
        }

        let expected = order.status();
        let mut updated = order;
        if !updated.update_trailing(quote.price) {
            return Some(updated);
        }

        match self.store.compare_and_swap(expected, &updated).await {
            Ok(()) => Some(updated),
            Err(e) if e.is_conflict() => {
                tracing::debug!(order_id = %updated.id(), "Trailing update lost the race");
                None
            }
            Err(e) => {
                tracing::error!(order_id = %updated.id(), error = %e, "Failed to persist trailing state");
                None
            }
        }
    }

    /// Arm a two-phase order (`Pending -> Triggered`), no fill.
    async fn arm_order(&self, order: Order, quote: &Quote) {
        let expected = order.status();
        let mut updated = order;

        if let Err(e) = updated.mark_triggered(quote.price) {
            tracing::debug!(order_id = %updated.id(), error = %e, "Skipping arm");
            return;
        }

        match self.store.compare_and_swap(expected, &updated).await {
            Ok(()) => {
                let events = updated.drain_events();
                if let Err(e) = self.notifier.publish_events(events).await {
                    tracing::warn!(order_id = %updated.id(), error = %e, "Failed to publish trigger events");
                }
                tracing::info!(
                    order_id = %updated.id(),
                    price = %quote.price,
                    "Order triggered"
                );
            }
            Err(e) if e.is_conflict() => {
                tracing::debug!(order_id = %updated.id(), "Arm lost the race");
            }
            Err(e) => {
                tracing::error!(order_id = %updated.id(), error = %e, "Failed to persist trigger");
            }
        }
    }

    /// Run one expiration pass: every active order whose expiry date has
    /// passed transitions to `Expired` with reason "Order expired".
    pub async fn run_expiration_pass(&self) {
        let orders = match self.store.active().await {
            Ok(orders) => orders,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load active orders for expiration");
                return;
            }
        };

        let now = Timestamp::now();
        for order in orders {
            if !order.is_expired_at(now) {
                continue;
            }

            let expected = order.status();
            let mut updated = order;
            if let Err(e) = updated.expire() {
                tracing::debug!(order_id = %updated.id(), error = %e, "Skipping expiry");
                continue;
            }

            match self.store.compare_and_swap(expected, &updated).await {
                Ok(()) => {
                    let events = updated.drain_events();
                    if let Err(e) = self.notifier.publish_events(events).await {
                        tracing::warn!(order_id = %updated.id(), error = %e, "Failed to publish expiry events");
                    }
                    tracing::info!(order_id = %updated.id(), "Order expired");
                }
                Err(e) if e.is_conflict() => {
                    tracing::debug!(order_id = %updated.id(), "Expiry lost the race");
                }
                Err(e) => {
                    tracing::error!(order_id = %updated.id(), error = %e, "Failed to persist expiry");
                }
            }
        }
    }
}
