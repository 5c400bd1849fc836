//! Order store trait.
//!
//! Persistence abstraction for orders, implemented by adapters in the
//! infrastructure layer. The store is the only shared mutable resource in
//! the engine; every status transition goes through `compare_and_swap`, so
//! concurrent evaluators can never commit two transitions for one order.

use async_trait::async_trait;
use thiserror::Error;

use super::aggregate::Order;
use super::value_objects::OrderStatus;
use crate::domain::shared::{OcoGroupId, OrderId, PortfolioId, Symbol};

/// Store-level errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The stored status no longer matches the expected pre-transition
    /// status; another operation already transitioned this order. Benign.
    #[error("Conflicting update for order {order_id}: expected {expected}, found {actual}")]
    Conflict {
        /// Order id.
        order_id: String,
        /// Status the caller observed before mutating.
        expected: OrderStatus,
        /// Status actually stored.
        actual: OrderStatus,
    },

    /// Order not found.
    #[error("Order not found: {order_id}")]
    NotFound {
        /// The missing order id.
        order_id: String,
    },

    /// Duplicate order id on insert.
    #[error("Duplicate order id: {order_id}")]
    DuplicateId {
        /// The duplicated order id.
        order_id: String,
    },
}

impl StoreError {
    /// Returns true for benign lost-race conflicts.
    #[must_use]
    pub const fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}

/// Persistence port for orders.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Persist a newly created order.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateId` if the id is already stored.
    async fn insert(&self, order: &Order) -> Result<(), StoreError>;

    /// Fetch an order by id.
    ///
    /// # Errors
    ///
    /// Returns error if the query fails.
    async fn get(&self, id: &OrderId) -> Result<Option<Order>, StoreError>;

    /// Fetch all non-terminal orders.
    ///
    /// # Errors
    ///
    /// Returns error if the query fails.
    async fn active(&self) -> Result<Vec<Order>, StoreError>;

    /// Fetch all non-terminal orders for one symbol.
    ///
    /// # Errors
    ///
    /// Returns error if the query fails.
    async fn active_by_symbol(&self, symbol: &Symbol) -> Result<Vec<Order>, StoreError>;

    /// Fetch all non-terminal orders, optionally scoped to a portfolio.
    ///
    /// # Errors
    ///
    /// Returns error if the query fails.
    async fn active_by_portfolio(
        &self,
        portfolio_id: Option<&PortfolioId>,
    ) -> Result<Vec<Order>, StoreError>;

    /// Fetch every member of an OCO group, terminal or not.
    ///
    /// # Errors
    ///
    /// Returns error if the query fails.
    async fn by_group(&self, group_id: &OcoGroupId) -> Result<Vec<Order>, StoreError>;

    /// Replace the stored order only if its status still matches `expected`.
    ///
    /// This is the serialization point for all state transitions and for
    /// trailing-stop state updates.
    ///
    /// # Errors
    ///
    /// Returns `Conflict` if the stored status differs from `expected`,
    /// `NotFound` if the order is unknown.
    async fn compare_and_swap(
        &self,
        expected: OrderStatus,
        order: &Order,
    ) -> Result<(), StoreError>;
}
