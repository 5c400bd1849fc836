//! In-memory order store.
//!
//! Keyed storage with per-order atomic compare-and-set on status. The
//! whole-map lock is held only for the duration of a single read or swap,
//! which gives the same serialization guarantee per order.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::domain::orders::aggregate::Order;
use crate::domain::orders::store::{OrderStore, StoreError};
use crate::domain::orders::value_objects::OrderStatus;
use crate::domain::shared::{OcoGroupId, OrderId, PortfolioId, Symbol};

/// In-memory implementation of the order store.
#[derive(Debug, Default)]
pub struct InMemoryOrderStore {
    orders: RwLock<HashMap<String, Order>>,
}

impl InMemoryOrderStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored orders, terminal included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.orders.read().len()
    }

    /// Whether the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.orders.read().is_empty()
    }

    /// Stored copies never carry pending events; publication happens at the
    /// mutation site.
    fn detached(order: &Order) -> Order {
        let mut copy = order.clone();
        copy.drain_events();
        copy
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn insert(&self, order: &Order) -> Result<(), StoreError> {
        let mut orders = self.orders.write();
        let key = order.id().as_str().to_string();
        if orders.contains_key(&key) {
            return Err(StoreError::DuplicateId { order_id: key });
        }
        orders.insert(key, Self::detached(order));
        Ok(())
    }

    async fn get(&self, id: &OrderId) -> Result<Option<Order>, StoreError> {
        Ok(self.orders.read().get(id.as_str()).cloned())
    }

    async fn active(&self) -> Result<Vec<Order>, StoreError> {
        Ok(self
            .orders
            .read()
            .values()
            .filter(|o| o.status().is_active())
            .cloned()
            .collect())
    }

    async fn active_by_symbol(&self, symbol: &Symbol) -> Result<Vec<Order>, StoreError> {
        Ok(self
            .orders
            .read()
            .values()
            .filter(|o| o.status().is_active() && o.symbol() == symbol)
            .cloned()
            .collect())
    }

    async fn active_by_portfolio(
        &self,
        portfolio_id: Option<&PortfolioId>,
    ) -> Result<Vec<Order>, StoreError> {
        Ok(self
            .orders
            .read()
            .values()
            .filter(|o| {
                o.status().is_active()
                    && portfolio_id.is_none_or(|pf| o.portfolio_id() == pf)
            })
            .cloned()
            .collect())
    }

    async fn by_group(&self, group_id: &OcoGroupId) -> Result<Vec<Order>, StoreError> {
        Ok(self
            .orders
            .read()
            .values()
            .filter(|o| o.oco_group_id() == Some(group_id))
            .cloned()
            .collect())
    }

    async fn compare_and_swap(
        &self,
        expected: OrderStatus,
        order: &Order,
    ) -> Result<(), StoreError> {
        let mut orders = self.orders.write();
        let key = order.id().as_str();

        let stored = orders.get(key).ok_or_else(|| StoreError::NotFound {
            order_id: key.to_string(),
        })?;

        if stored.status() != expected {
            return Err(StoreError::Conflict {
                order_id: key.to_string(),
                expected,
                actual: stored.status(),
            });
        }

        orders.insert(key.to_string(), Self::detached(order));
        Ok(())
    }
}
