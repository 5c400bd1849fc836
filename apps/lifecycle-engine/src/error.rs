//! Engine-level error taxonomy.
//!
//! Validation and risk errors surface synchronously to submitters.
//! Execution failures during scheduled monitoring are captured as terminal
//! cancelled orders plus a notification; they never propagate to the
//! scheduler. Compare-and-set conflicts are benign and silently skipped.

use thiserror::Error;

use crate::domain::orders::errors::OrderError;
use crate::domain::orders::store::StoreError;
use crate::domain::orders::value_objects::OrderStatus;

/// Errors surfaced by the engine's exposed operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Creation-time validation failed; the order was never persisted.
    /// Every violated rule is listed.
    #[error("Order validation failed: {}", violations.join("; "))]
    Validation {
        /// All violated rules.
        violations: Vec<String>,
    },

    /// The risk validator rejected the order; never persisted.
    #[error("Risk validation rejected order: {}", errors.join("; "))]
    RiskRejected {
        /// Errors reported by the validator.
        errors: Vec<String>,
    },

    /// Execution failed; the order is terminally cancelled and must be
    /// resubmitted.
    #[error("Execution failed: {message}")]
    ExecutionFailure {
        /// Failure detail.
        message: String,
    },

    /// Operation referenced an unknown order.
    #[error("Order not found: {order_id}")]
    NotFound {
        /// The missing order id.
        order_id: String,
    },

    /// Attempt to cancel or modify a terminal order.
    #[error("Invalid transition from {from} to {to}")]
    InvalidTransition {
        /// Current (terminal) status.
        from: OrderStatus,
        /// Attempted status.
        to: OrderStatus,
    },

    /// Order store failure.
    #[error("Order store error: {0}")]
    Store(#[from] StoreError),
}

impl From<OrderError> for EngineError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::Validation { violations } => Self::Validation { violations },
            OrderError::InvalidStateTransition { from, to } => Self::InvalidTransition { from, to },
            OrderError::NotFound { order_id } => Self::NotFound { order_id },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_joins_violations() {
        let err = EngineError::Validation {
            violations: vec!["a".to_string(), "b".to_string()],
        };
        assert_eq!(err.to_string(), "Order validation failed: a; b");
    }

    #[test]
    fn order_error_conversion() {
        let err: EngineError = OrderError::NotFound {
            order_id: "ord-1".to_string(),
        }
        .into();
        assert!(matches!(err, EngineError::NotFound { .. }));
    }

    #[test]
    fn store_error_conversion() {
        let err: EngineError = StoreError::NotFound {
            order_id: "ord-1".to_string(),
        }
        .into();
        assert!(matches!(err, EngineError::Store(_)));
    }
}
