//! Submit order use case.
//!
//! Validates a draft, runs pre-trade risk checks, persists the order as
//! pending, creates bracket children, and executes immediate order types.

use std::sync::Arc;

use crate::application::ports::{
    EventNotifier, MarketDataFeed, PortfolioProvider, RiskValidator, TradeExecutor,
};
use crate::application::services::ExecutionCoordinator;
use crate::domain::orders::aggregate::{Order, OrderDraft};
use crate::domain::orders::store::OrderStore;
use crate::error::EngineError;

/// Use case for order submission.
pub struct SubmitOrderUseCase<S, F, R, P, X, N>
where
    S: OrderStore,
    F: MarketDataFeed,
    R: RiskValidator,
    P: PortfolioProvider,
    X: TradeExecutor,
    N: EventNotifier,
{
    store: Arc<S>,
    risk: Arc<R>,
    portfolios: Arc<P>,
    notifier: Arc<N>,
    coordinator: Arc<ExecutionCoordinator<S, F, R, P, X, N>>,
}

impl<S, F, R, P, X, N> SubmitOrderUseCase<S, F, R, P, X, N>
where
    S: OrderStore,
    F: MarketDataFeed,
    R: RiskValidator,
    P: PortfolioProvider,
    X: TradeExecutor,
    N: EventNotifier,
{
    /// Create a new submit use case.
    pub const fn new(
        store: Arc<S>,
        risk: Arc<R>,
        portfolios: Arc<P>,
        notifier: Arc<N>,
        coordinator: Arc<ExecutionCoordinator<S, F, R, P, X, N>>,
    ) -> Self {
        Self {
            store,
            risk,
            portfolios,
            notifier,
            coordinator,
        }
    }

    /// Submit an order.
    ///
    /// The draft is validated (every violated rule reported), checked by
    /// the risk validator, and persisted as `Pending`. Bracket submissions
    /// additionally persist stop-loss and take-profit children referencing
    /// the entry; all three race the market simultaneously. Market and
    /// bracket entries execute immediately.
    ///
    /// # Errors
    ///
    /// Returns `Validation` or `RiskRejected` without persisting anything,
    /// or `Store` on persistence failure.
    pub async fn submit(&self, draft: OrderDraft) -> Result<Order, EngineError> {
        if let Some(parent_id) = &draft.parent_order_id
            && self.store.get(parent_id).await?.is_none()
        {
            return Err(EngineError::Validation {
                violations: vec![format!("parent order does not exist: {parent_id}")],
            });
        }

        let mut order = Order::submit(draft)?;

        let portfolio = self
            .portfolios
            .fetch(order.portfolio_id())
            .await
            .ok_or_else(|| EngineError::RiskRejected {
                errors: vec![format!("unknown portfolio: {}", order.portfolio_id())],
            })?;

        let report = self.risk.validate(&order, &portfolio).await;
        for warning in &report.warnings {
            tracing::warn!(order_id = %order.id(), warning = %warning, "Risk warning");
        }
        if !report.valid {
            return Err(EngineError::RiskRejected {
                errors: report.errors,
            });
        }

        self.store.insert(&order).await?;
        let events = order.drain_events();
        if let Err(e) = self.notifier.publish_events(events).await {
            tracing::warn!(order_id = %order.id(), error = %e, "Failed to publish creation events");
        }

        tracing::info!(
            order_id = %order.id(),
            symbol = %order.symbol(),
            order_type = %order.order_type(),
            side = %order.side(),
            quantity = %order.quantity(),
            "Order submitted"
        );

        if let Some((profit_draft, protect_draft)) = order.bracket_child_drafts() {
            self.persist_child(profit_draft).await?;
            self.persist_child(protect_draft).await?;
        }

        if order.terms().executes_on_submission() {
            let result = self.coordinator.execute(order.id(), None).await;
            tracing::debug!(
                order_id = %order.id(),
                success = result.success,
                outcome = %result.message,
                "Immediate execution attempt"
            );
            if let Some(refreshed) = self.store.get(order.id()).await? {
                return Ok(refreshed);
            }
        }

        Ok(order)
    }

    /// Persist one bracket child as an independent pending order.
    async fn persist_child(&self, draft: OrderDraft) -> Result<(), EngineError> {
        let mut child = Order::submit(draft)?;
        self.store.insert(&child).await?;
        let events = child.drain_events();
        if let Err(e) = self.notifier.publish_events(events).await {
            tracing::warn!(order_id = %child.id(), error = %e, "Failed to publish child creation events");
        }
        tracing::info!(
            order_id = %child.id(),
            parent_order_id = %child.parent_order_id().map_or("", |p| p.as_str()),
            order_type = %child.order_type(),
            "Bracket child created"
        );
        Ok(())
    }
}
