//! Order state machine service.
//!
//! Validates lifecycle transitions. Terminal states are final: no order is
//! ever reactivated.

use crate::domain::orders::errors::OrderError;
use crate::domain::orders::value_objects::OrderStatus;

/// Order state machine for validating transitions.
pub struct OrderStateMachine;

impl OrderStateMachine {
    /// Check if a state transition is valid.
    #[must_use]
    pub fn is_valid_transition(from: OrderStatus, to: OrderStatus) -> bool {
        matches!(
            (from, to),
            // From Pending
            (OrderStatus::Pending, OrderStatus::Triggered)
                | (OrderStatus::Pending, OrderStatus::Executed)
                | (OrderStatus::Pending, OrderStatus::Cancelled)
                | (OrderStatus::Pending, OrderStatus::Expired)
                // From Triggered
                | (OrderStatus::Triggered, OrderStatus::Executed)
                | (OrderStatus::Triggered, OrderStatus::Cancelled)
                | (OrderStatus::Triggered, OrderStatus::Expired)
        )
    }

    /// Validate a state transition.
    ///
    /// # Errors
    ///
    /// Returns error if the transition is invalid.
    pub fn validate_transition(from: OrderStatus, to: OrderStatus) -> Result<(), OrderError> {
        if Self::is_valid_transition(from, to) {
            Ok(())
        } else {
            Err(OrderError::InvalidStateTransition { from, to })
        }
    }

    /// Get all valid next states from a given state.
    #[must_use]
    pub fn valid_next_states(from: OrderStatus) -> Vec<OrderStatus> {
        match from {
            OrderStatus::Pending => vec![
                OrderStatus::Triggered,
                OrderStatus::Executed,
                OrderStatus::Cancelled,
                OrderStatus::Expired,
            ],
            OrderStatus::Triggered => vec![
                OrderStatus::Executed,
                OrderStatus::Cancelled,
                OrderStatus::Expired,
            ],
            // Terminal states
            OrderStatus::Executed | OrderStatus::Cancelled | OrderStatus::Expired => vec![],
        }
    }
}
