//! Risk validation and portfolio ports (driven ports).

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::orders::aggregate::Order;
use crate::domain::shared::{Money, PortfolioId, Quantity, Symbol};

/// Point-in-time view of a portfolio used for pre-trade checks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioSnapshot {
    /// Portfolio id.
    pub portfolio_id: PortfolioId,
    /// Available cash.
    pub cash: Money,
    /// Held quantity per symbol.
    pub positions: HashMap<Symbol, Quantity>,
}

impl PortfolioSnapshot {
    /// Held quantity for a symbol, zero when absent.
    #[must_use]
    pub fn position(&self, symbol: &Symbol) -> Quantity {
        self.positions.get(symbol).copied().unwrap_or(Quantity::ZERO)
    }
}

/// Outcome of pre-trade validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskReport {
    /// Whether the order passed validation.
    pub valid: bool,
    /// Violated rules; non-empty when invalid.
    pub errors: Vec<String>,
    /// Non-blocking findings, surfaced in logs.
    pub warnings: Vec<String>,
}

impl RiskReport {
    /// A passing report.
    #[must_use]
    pub fn passed() -> Self {
        Self {
            valid: true,
            errors: vec![],
            warnings: vec![],
        }
    }

    /// A failing report listing every violated rule.
    #[must_use]
    pub fn failed(errors: Vec<String>) -> Self {
        Self {
            valid: false,
            errors,
            warnings: vec![],
        }
    }
}

/// Port for pre-trade risk validation.
#[async_trait]
pub trait RiskValidator: Send + Sync {
    /// Validate an order against a portfolio snapshot.
    ///
    /// All violated rules are reported, not just the first.
    async fn validate(&self, order: &Order, portfolio: &PortfolioSnapshot) -> RiskReport;
}

/// Port supplying portfolio snapshots.
#[async_trait]
pub trait PortfolioProvider: Send + Sync {
    /// Fetch the snapshot for a portfolio, if known.
    async fn fetch(&self, portfolio_id: &PortfolioId) -> Option<PortfolioSnapshot>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn snapshot_position_defaults_to_zero() {
        let snapshot = PortfolioSnapshot {
            portfolio_id: PortfolioId::new("pf-1"),
            cash: Money::new(dec!(2000)),
            positions: HashMap::new(),
        };
        assert_eq!(snapshot.position(&Symbol::new("AAPL")), Quantity::ZERO);
    }

    #[test]
    fn report_constructors() {
        assert!(RiskReport::passed().valid);
        let failed = RiskReport::failed(vec!["insufficient cash".to_string()]);
        assert!(!failed.valid);
        assert_eq!(failed.errors.len(), 1);
    }
}
