//! Time in force for orders.

use serde::{Deserialize, Serialize};

/// Time in force policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimeInForce {
    /// Valid for the current trading day only.
    #[default]
    Day,
    /// Good-til-cancelled.
    Gtc,
}
