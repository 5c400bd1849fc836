//! Market observation used for trigger evaluation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::shared::{Money, Symbol};

/// A point-in-time market observation for one symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    /// Symbol the observation is for.
    pub symbol: Symbol,
    /// Last traded price.
    pub price: Money,
    /// Session volume.
    pub volume: Decimal,
    /// Absolute price change since previous close.
    pub change: Decimal,
    /// Percentage price change since previous close.
    pub change_percent: Decimal,
}

impl Quote {
    /// Create a quote carrying only a price.
    ///
    /// Volume and change fields default to zero; conditional triggers on
    /// those fields will evaluate against zero.
    #[must_use]
    pub fn from_price(symbol: Symbol, price: Money) -> Self {
        Self {
            symbol,
            price,
            volume: Decimal::ZERO,
            change: Decimal::ZERO,
            change_percent: Decimal::ZERO,
        }
    }
}
