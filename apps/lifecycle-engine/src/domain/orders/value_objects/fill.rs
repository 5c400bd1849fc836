//! Fill and termination records.

use serde::{Deserialize, Serialize};

use crate::domain::shared::{FillId, Money, Quantity, Timestamp};

/// Fill details, set only when an order reaches `Executed`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderFill {
    /// Fill id reported by the trade executor.
    pub fill_id: FillId,
    /// Execution price.
    pub executed_price: Money,
    /// Executed quantity.
    pub executed_quantity: Quantity,
    /// Commission charged (10 bps of notional).
    pub commission: Money,
    /// Execution time.
    pub executed_at: Timestamp,
}

/// Termination details, set only when an order reaches `Cancelled` or
/// `Expired`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Termination {
    /// When the order left the active set.
    pub cancelled_at: Timestamp,
    /// Why the order was terminated.
    pub reason: String,
}
