//! Per-type order parameters.
//!
//! Order pricing terms are a tagged variant: each order type carries exactly
//! the parameters it needs, and trigger evaluation dispatches on the variant
//! with a single pure function per type.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::conditional::ConditionalTrigger;
use super::order_side::OrderSide;
use crate::domain::shared::{DomainError, Money};

/// Fieldless order type tag, for reporting and event payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderType {
    /// Execute at the current market price on submission.
    Market,
    /// Execute at the limit price or better.
    Limit,
    /// Sell protection triggered below the stop price.
    StopLoss,
    /// Sell target triggered at or above the trigger price.
    TakeProfit,
    /// Two-phase stop-then-limit order.
    StopLimit,
    /// Stop that follows favorable price movement.
    TrailingStop,
    /// Entry order with stop-loss and take-profit children.
    Bracket,
    /// Order driven by a list of market-condition triggers.
    Conditional,
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Market => "MARKET",
            Self::Limit => "LIMIT",
            Self::StopLoss => "STOP_LOSS",
            Self::TakeProfit => "TAKE_PROFIT",
            Self::StopLimit => "STOP_LIMIT",
            Self::TrailingStop => "TRAILING_STOP",
            Self::Bracket => "BRACKET",
            Self::Conditional => "CONDITIONAL",
        };
        write!(f, "{s}")
    }
}

/// Trailing distance: a fixed amount or a percentage of the high-water mark.
///
/// Exactly one of the two forms is set for a trailing-stop order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Trail {
    /// Fixed dollar distance below the high-water mark.
    Amount(Money),
    /// Percentage distance below the high-water mark.
    Percent(Decimal),
}

impl Trail {
    /// Stop price implied by a high-water mark.
    #[must_use]
    pub fn stop_for(&self, high_water_mark: Money) -> Money {
        match self {
            Self::Amount(amount) => high_water_mark - *amount,
            Self::Percent(pct) => {
                high_water_mark * (Decimal::ONE - *pct / Decimal::new(100, 0))
            }
        }
    }

    /// Validate the trailing distance.
    ///
    /// # Errors
    ///
    /// Returns error if the amount is non-positive or the percentage is
    /// outside (0, 100).
    pub fn validate(&self) -> Result<(), DomainError> {
        match self {
            Self::Amount(amount) if !amount.is_positive() => Err(DomainError::invalid(
                "trail_amount",
                "trail amount must be positive",
            )),
            Self::Percent(pct)
                if *pct <= Decimal::ZERO || *pct >= Decimal::new(100, 0) =>
            {
                Err(DomainError::invalid(
                    "trail_percent",
                    "trail percent must be between 0 and 100",
                ))
            }
            _ => Ok(()),
        }
    }
}

/// Mutable derived state of a trailing-stop order.
///
/// The stop price only ever ratchets upward; a price dip never lowers it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrailingState {
    /// Highest price observed since submission.
    pub high_water_mark: Money,
    /// Current effective stop price.
    pub stop_price: Money,
}

impl TrailingState {
    /// Seed the state from the first observed price.
    #[must_use]
    pub fn seed(price: Money, trail: &Trail) -> Self {
        Self {
            high_water_mark: price,
            stop_price: trail.stop_for(price),
        }
    }

    /// Fold a new price observation into the state.
    ///
    /// Returns true if either the high-water mark or the stop price moved.
    pub fn observe(&mut self, price: Money, trail: &Trail) -> bool {
        let mut changed = false;
        if price > self.high_water_mark {
            self.high_water_mark = price;
            changed = true;
        }
        let candidate = trail.stop_for(self.high_water_mark);
        if candidate > self.stop_price {
            self.stop_price = candidate;
            changed = true;
        }
        changed
    }
}

/// Per-type pricing parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderTerms {
    /// Market order: no parameters.
    Market,
    /// Limit order.
    Limit {
        /// Execute at this price or better.
        limit_price: Money,
    },
    /// Stop-loss order (sell only).
    StopLoss {
        /// Execute once price reaches this level from above.
        stop_price: Money,
    },
    /// Take-profit order (sell only).
    TakeProfit {
        /// Execute once price reaches this level from below.
        trigger_price: Money,
    },
    /// Stop-limit order: stop phase arms the order, limit phase fills it.
    StopLimit {
        /// Price arming the order.
        stop_price: Money,
        /// Price at which the armed order fills.
        limit_price: Money,
    },
    /// Trailing stop (sell).
    TrailingStop {
        /// Trailing distance below the high-water mark.
        trail: Trail,
    },
    /// Bracket entry order; children are created alongside at submission.
    Bracket {
        /// Take-profit level for the profit child.
        take_profit: Money,
        /// Stop-loss level for the protection child.
        stop_loss: Money,
    },
    /// Conditional order driven by market-condition triggers.
    Conditional {
        /// Ordered trigger list, fold-combined left to right.
        triggers: Vec<ConditionalTrigger>,
    },
}

impl OrderTerms {
    /// The fieldless type tag for these terms.
    #[must_use]
    pub const fn order_type(&self) -> OrderType {
        match self {
            Self::Market => OrderType::Market,
            Self::Limit { .. } => OrderType::Limit,
            Self::StopLoss { .. } => OrderType::StopLoss,
            Self::TakeProfit { .. } => OrderType::TakeProfit,
            Self::StopLimit { .. } => OrderType::StopLimit,
            Self::TrailingStop { .. } => OrderType::TrailingStop,
            Self::Bracket { .. } => OrderType::Bracket,
            Self::Conditional { .. } => OrderType::Conditional,
        }
    }

    /// Returns true for types that execute immediately on submission.
    #[must_use]
    pub const fn executes_on_submission(&self) -> bool {
        matches!(self, Self::Market | Self::Bracket { .. })
    }

    /// Collect every validation violation for these terms.
    ///
    /// All violated rules are reported, not just the first.
    #[must_use]
    pub fn violations(&self, side: OrderSide) -> Vec<DomainError> {
        let mut out = Vec::new();

        match self {
            Self::Market => {}
            Self::Limit { limit_price } => {
                if let Err(e) = limit_price.validate_as_price("limit_price") {
                    out.push(e);
                }
            }
            Self::StopLoss { stop_price } => {
                if let Err(e) = stop_price.validate_as_price("stop_price") {
                    out.push(e);
                }
                if !side.is_sell() {
                    out.push(DomainError::invalid(
                        "side",
                        "stop-loss orders must be sell orders",
                    ));
                }
            }
            Self::TakeProfit { trigger_price } => {
                if let Err(e) = trigger_price.validate_as_price("trigger_price") {
                    out.push(e);
                }
                if !side.is_sell() {
                    out.push(DomainError::invalid(
                        "side",
                        "take-profit orders must be sell orders",
                    ));
                }
            }
            Self::StopLimit {
                stop_price,
                limit_price,
            } => {
                if let Err(e) = stop_price.validate_as_price("stop_price") {
                    out.push(e);
                }
                if let Err(e) = limit_price.validate_as_price("limit_price") {
                    out.push(e);
                }
            }
            Self::TrailingStop { trail } => {
                if let Err(e) = trail.validate() {
                    out.push(e);
                }
                if !side.is_sell() {
                    out.push(DomainError::invalid(
                        "side",
                        "trailing-stop orders must be sell orders",
                    ));
                }
            }
            Self::Bracket {
                take_profit,
                stop_loss,
            } => {
                if let Err(e) = take_profit.validate_as_price("take_profit") {
                    out.push(e);
                }
                if let Err(e) = stop_loss.validate_as_price("stop_loss") {
                    out.push(e);
                }
            }
            Self::Conditional { triggers } => {
                if triggers.is_empty() {
                    out.push(DomainError::invalid(
                        "conditional_triggers",
                        "conditional orders require at least one trigger",
                    ));
                }
                for trigger in triggers {
                    if let Err(e) = trigger.validate() {
                        out.push(e);
                    }
                }
            }
        }

        out
    }
}
