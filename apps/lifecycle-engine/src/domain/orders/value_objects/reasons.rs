//! Cancellation reasons.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Reason an order was cancelled or expired.
///
/// The `message` is the string persisted on the order; downstream consumers
/// match on it, so the constructors here are the single source of the exact
/// wording.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CancelReason {
    /// Machine-readable code.
    pub code: String,
    /// Human-readable message stored on the order.
    pub message: String,
}

impl CancelReason {
    /// Create a new cancel reason.
    #[must_use]
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    /// User requested cancellation.
    #[must_use]
    pub fn user_requested() -> Self {
        Self::new("USER_REQUESTED", "Cancelled by user request")
    }

    /// An OCO sibling executed first.
    #[must_use]
    pub fn oco_sibling_executed() -> Self {
        Self::new("OCO_SIBLING_EXECUTED", "OCO - other order executed")
    }

    /// Execution was attempted and failed; the order is terminal.
    #[must_use]
    pub fn execution_failed(message: &str) -> Self {
        Self::new("EXECUTION_FAILED", format!("Execution failed: {message}"))
    }

    /// The order passed its expiry date.
    #[must_use]
    pub fn expired() -> Self {
        Self::new("EXPIRED", "Order expired")
    }

    /// Replaced through modify (cancel-then-resubmit).
    #[must_use]
    pub fn replaced() -> Self {
        Self::new("REPLACED", "Order replaced with modified order")
    }

    /// Group-level cancellation with a uniform reason.
    #[must_use]
    pub fn group(message: impl Into<String>) -> Self {
        Self::new("GROUP_CANCELLED", message)
    }
}

impl fmt::Display for CancelReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}
