//! Order queries.
//!
//! Read-side lookups consumed by outer surfaces. Terminal orders are
//! retained for history and remain queryable by id.

use std::sync::Arc;

use crate::domain::orders::aggregate::Order;
use crate::domain::orders::store::OrderStore;
use crate::domain::shared::{OrderId, PortfolioId};
use crate::error::EngineError;

/// Read-side queries over the order store.
pub struct OrderQueries<S>
where
    S: OrderStore,
{
    store: Arc<S>,
}

impl<S> OrderQueries<S>
where
    S: OrderStore,
{
    /// Create new queries over a store.
    pub const fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Fetch an order by id.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for unknown ids.
    pub async fn get_order(&self, id: &OrderId) -> Result<Order, EngineError> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| EngineError::NotFound {
                order_id: id.as_str().to_string(),
            })
    }

    /// Fetch all active (non-terminal) orders, optionally scoped to one
    /// portfolio.
    ///
    /// # Errors
    ///
    /// Returns `Store` on query failure.
    pub async fn active_orders(
        &self,
        portfolio_id: Option<&PortfolioId>,
    ) -> Result<Vec<Order>, EngineError> {
        Ok(self.store.active_by_portfolio(portfolio_id).await?)
    }
}
