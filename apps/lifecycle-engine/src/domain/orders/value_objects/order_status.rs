//! Order status in the lifecycle.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Order status.
///
/// Transitions are monotonic: `Pending -> {Triggered, Executed, Cancelled,
/// Expired}`, `Triggered -> {Executed, Cancelled, Expired}`. `Executed`,
/// `Cancelled` and `Expired` are terminal; no order is ever reactivated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Waiting for its trigger condition.
    Pending,
    /// Trigger condition met, awaiting execution (two-phase orders).
    Triggered,
    /// Filled. Terminal.
    Executed,
    /// Cancelled by a user, a cascade, or an execution failure. Terminal.
    Cancelled,
    /// Expired past its expiry date. Terminal.
    Expired,
}

impl OrderStatus {
    /// Returns true if the order is in a terminal state.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Executed | Self::Cancelled | Self::Expired)
    }

    /// Returns true if the order is still active (monitored by the scheduler).
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self, Self::Pending | Self::Triggered)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pending => "PENDING",
            Self::Triggered => "TRIGGERED",
            Self::Executed => "EXECUTED",
            Self::Cancelled => "CANCELLED",
            Self::Expired => "EXPIRED",
        };
        write!(f, "{s}")
    }
}
