//! Order lifecycle errors.

use thiserror::Error;

use super::value_objects::OrderStatus;

/// Errors raised by the order aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderError {
    /// Order creation failed validation; every violated rule is listed.
    #[error("Order validation failed: {}", violations.join("; "))]
    Validation {
        /// All violated rules, not just the first.
        violations: Vec<String>,
    },

    /// Invalid state transition attempted.
    #[error("Invalid order state transition: {from} -> {to}")]
    InvalidStateTransition {
        /// Current order status.
        from: OrderStatus,
        /// Attempted status.
        to: OrderStatus,
    },

    /// Order not found.
    #[error("Order not found: {order_id}")]
    NotFound {
        /// The missing order id.
        order_id: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_lists_every_violation() {
        let err = OrderError::Validation {
            violations: vec![
                "Invalid quantity: order quantity must be positive".to_string(),
                "Invalid limit_price: price must be positive".to_string(),
            ],
        };
        let msg = err.to_string();
        assert!(msg.contains("quantity"));
        assert!(msg.contains("limit_price"));
    }

    #[test]
    fn invalid_transition_display() {
        let err = OrderError::InvalidStateTransition {
            from: OrderStatus::Executed,
            to: OrderStatus::Cancelled,
        };
        assert!(err.to_string().contains("EXECUTED -> CANCELLED"));
    }
}
