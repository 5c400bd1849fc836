//! Conditional trigger definitions.
//!
//! A conditional order carries an ordered list of triggers that are
//! evaluated against a market snapshot and fold-combined left to right.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Quote;
use crate::domain::shared::DomainError;

/// Market field a conditional trigger compares against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerField {
    /// Last traded price.
    Price,
    /// Session volume.
    Volume,
    /// Absolute change since previous close.
    Change,
    /// Percentage change since previous close.
    ChangePercent,
}

/// Comparison applied to the selected field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerCondition {
    /// Field strictly greater than `value`.
    GreaterThan,
    /// Field strictly less than `value`.
    LessThan,
    /// Field equal to `value`.
    Equals,
    /// Field within `[value, value2]` inclusive.
    Between,
}

/// Operator combining a trigger with the accumulated result of the
/// triggers before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogicalOperator {
    /// Conjunction (default when no operator is given).
    And,
    /// Disjunction.
    Or,
}

/// A single conditional trigger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionalTrigger {
    /// Field to inspect.
    pub field: TriggerField,
    /// Comparison to apply.
    pub condition: TriggerCondition,
    /// Comparison value.
    pub value: Decimal,
    /// Upper bound for `Between`.
    pub value2: Option<Decimal>,
    /// How this trigger combines with the accumulated result.
    pub logical_operator: Option<LogicalOperator>,
}

impl ConditionalTrigger {
    /// Evaluate this trigger against a market snapshot.
    #[must_use]
    pub fn matches(&self, quote: &Quote) -> bool {
        let observed = match self.field {
            TriggerField::Price => quote.price.amount(),
            TriggerField::Volume => quote.volume,
            TriggerField::Change => quote.change,
            TriggerField::ChangePercent => quote.change_percent,
        };

        match self.condition {
            TriggerCondition::GreaterThan => observed > self.value,
            TriggerCondition::LessThan => observed < self.value,
            TriggerCondition::Equals => observed == self.value,
            TriggerCondition::Between => self
                .value2
                .is_some_and(|upper| observed >= self.value && observed <= upper),
        }
    }

    /// Validate the trigger definition.
    ///
    /// # Errors
    ///
    /// Returns error if `Between` is missing its upper bound.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.condition == TriggerCondition::Between && self.value2.is_none() {
            return Err(DomainError::invalid(
                "conditional_triggers",
                "between condition requires value2",
            ));
        }
        Ok(())
    }
}
