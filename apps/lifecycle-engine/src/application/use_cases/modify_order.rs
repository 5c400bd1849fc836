//! Modify order use case.
//!
//! Modification is cancel-then-resubmit: the original order is cancelled
//! with a replacement reason and a new order is created from the original's
//! parameters plus the requested changes, preserving `parent_order_id` and
//! `oco_group_id`.

use std::sync::Arc;

use crate::application::ports::{
    EventNotifier, MarketDataFeed, PortfolioProvider, RiskValidator, TradeExecutor,
};
use crate::application::use_cases::{CancelOrderUseCase, SubmitOrderUseCase};
use crate::domain::orders::aggregate::{Order, OrderDraft};
use crate::domain::orders::store::OrderStore;
use crate::domain::orders::value_objects::{
    CancelReason, OrderStatus, OrderTerms, TimeInForce,
};
use crate::domain::shared::{OrderId, Quantity, Timestamp};
use crate::error::EngineError;

/// Requested changes to an active order. Unset fields keep the original
/// values; symbol and side are not modifiable.
#[derive(Debug, Clone, Default)]
pub struct OrderUpdate {
    /// Replacement pricing terms.
    pub terms: Option<OrderTerms>,
    /// Replacement quantity.
    pub quantity: Option<Quantity>,
    /// Replacement time in force.
    pub time_in_force: Option<TimeInForce>,
    /// Replacement expiry date.
    pub expiry_date: Option<Timestamp>,
}

/// Use case for modifying orders.
pub struct ModifyOrderUseCase<S, F, R, P, X, N>
where
    S: OrderStore,
    F: MarketDataFeed,
    R: RiskValidator,
    P: PortfolioProvider,
    X: TradeExecutor,
    N: EventNotifier,
{
    store: Arc<S>,
    submit: Arc<SubmitOrderUseCase<S, F, R, P, X, N>>,
    cancel: Arc<CancelOrderUseCase<S, N>>,
}

impl<S, F, R, P, X, N> ModifyOrderUseCase<S, F, R, P, X, N>
where
    S: OrderStore,
    F: MarketDataFeed,
    R: RiskValidator,
    P: PortfolioProvider,
    X: TradeExecutor,
    N: EventNotifier,
{
    /// Create a new modify use case.
    pub const fn new(
        store: Arc<S>,
        submit: Arc<SubmitOrderUseCase<S, F, R, P, X, N>>,
        cancel: Arc<CancelOrderUseCase<S, N>>,
    ) -> Self {
        Self {
            store,
            submit,
            cancel,
        }
    }

    /// Replace an active order with a modified copy.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for unknown ids, `InvalidTransition` when the
    /// order is terminal, and validation/risk errors from the resubmission.
    pub async fn modify(&self, id: &OrderId, update: OrderUpdate) -> Result<Order, EngineError> {
        let original = self
            .store
            .get(id)
            .await?
            .ok_or_else(|| EngineError::NotFound {
                order_id: id.as_str().to_string(),
            })?;

        if original.status().is_terminal() {
            return Err(EngineError::InvalidTransition {
                from: original.status(),
                to: OrderStatus::Cancelled,
            });
        }

        let draft = OrderDraft {
            portfolio_id: original.portfolio_id().clone(),
            symbol: original.symbol().clone(),
            side: original.side(),
            terms: update.terms.unwrap_or_else(|| original.terms().clone()),
            quantity: update.quantity.unwrap_or(original.quantity()),
            time_in_force: update.time_in_force.unwrap_or(original.time_in_force()),
            expiry_date: update.expiry_date.or(original.expiry_date()),
            parent_order_id: original.parent_order_id().cloned(),
            oco_group_id: original.oco_group_id().cloned(),
        };

        self.cancel.cancel(id, CancelReason::replaced()).await?;

        let replacement = self.submit.submit(draft).await?;
        tracing::info!(
            original_order_id = %id,
            replacement_order_id = %replacement.id(),
            "Order modified"
        );
        Ok(replacement)
    }
}
