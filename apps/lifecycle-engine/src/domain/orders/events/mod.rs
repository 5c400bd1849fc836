//! Domain events for the order lifecycle.
//!
//! Events capture state transitions and feed the event notifier for
//! downstream broadcast.

use serde::{Deserialize, Serialize};

use super::value_objects::{CancelReason, OrderSide, OrderType};
use crate::domain::shared::{Money, OrderId, PortfolioId, Quantity, Symbol, Timestamp};

/// All lifecycle events an order can emit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OrderEvent {
    /// Order validated and persisted as pending.
    Created(OrderCreated),
    /// Two-phase order armed by its stop condition.
    Triggered(OrderTriggered),
    /// Order filled.
    Executed(OrderExecuted),
    /// Execution attempted and failed; the order is terminally cancelled.
    ExecutionFailed(OrderExecutionFailed),
    /// Order cancelled.
    Cancelled(OrderCancelled),
    /// Order expired past its expiry date.
    Expired(OrderExpired),
}

impl OrderEvent {
    /// Get the order id for this event.
    #[must_use]
    pub fn order_id(&self) -> &OrderId {
        match self {
            Self::Created(e) => &e.order_id,
            Self::Triggered(e) => &e.order_id,
            Self::Executed(e) => &e.order_id,
            Self::ExecutionFailed(e) => &e.order_id,
            Self::Cancelled(e) => &e.order_id,
            Self::Expired(e) => &e.order_id,
        }
    }

    /// Get the event type name used on the notifier wire.
    #[must_use]
    pub const fn event_type(&self) -> &'static str {
        match self {
            Self::Created(_) => "order_created",
            Self::Triggered(_) => "order_triggered",
            Self::Executed(_) => "order_executed",
            Self::ExecutionFailed(_) => "order_execution_failed",
            Self::Cancelled(_) => "order_cancelled",
            Self::Expired(_) => "order_expired",
        }
    }
}

/// Event: order validated and persisted as pending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderCreated {
    /// Order id.
    pub order_id: OrderId,
    /// Portfolio the order trades against.
    pub portfolio_id: PortfolioId,
    /// Symbol.
    pub symbol: Symbol,
    /// Side.
    pub side: OrderSide,
    /// Order type tag.
    pub order_type: OrderType,
    /// Quantity.
    pub quantity: Quantity,
    /// When the event occurred.
    pub occurred_at: Timestamp,
}

/// Event: two-phase order armed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderTriggered {
    /// Order id.
    pub order_id: OrderId,
    /// Price that armed the order.
    pub trigger_price: Money,
    /// When the event occurred.
    pub occurred_at: Timestamp,
}

/// Event: order filled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderExecuted {
    /// Order id.
    pub order_id: OrderId,
    /// Execution price.
    pub executed_price: Money,
    /// Executed quantity.
    pub executed_quantity: Quantity,
    /// Commission charged.
    pub commission: Money,
    /// When the event occurred.
    pub occurred_at: Timestamp,
}

/// Event: execution failed; the order is terminally cancelled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderExecutionFailed {
    /// Order id.
    pub order_id: OrderId,
    /// Failure detail.
    pub message: String,
    /// When the event occurred.
    pub occurred_at: Timestamp,
}

/// Event: order cancelled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderCancelled {
    /// Order id.
    pub order_id: OrderId,
    /// Why the order was cancelled.
    pub reason: CancelReason,
    /// When the event occurred.
    pub occurred_at: Timestamp,
}

/// Event: order expired.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderExpired {
    /// Order id.
    pub order_id: OrderId,
    /// When the event occurred.
    pub occurred_at: Timestamp,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_type_names() {
        let event = OrderEvent::Expired(OrderExpired {
            order_id: OrderId::new("ord-1"),
            occurred_at: Timestamp::now(),
        });
        assert_eq!(event.event_type(), "order_expired");
        assert_eq!(event.order_id().as_str(), "ord-1");
    }

    #[test]
    fn event_serde_tagged() {
        let event = OrderEvent::ExecutionFailed(OrderExecutionFailed {
            order_id: OrderId::new("ord-1"),
            message: "no liquidity".to_string(),
            occurred_at: Timestamp::now(),
        });
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"execution_failed\""));
    }
}
