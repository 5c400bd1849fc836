//! Simulated trade executor.
//!
//! Paper-trading executor: every trade fills unless a failure has been
//! injected. Records executed trades for inspection.

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::application::ports::{TradeError, TradeExecutor, TradeFill};
use crate::domain::orders::value_objects::OrderSide;
use crate::domain::shared::{FillId, PortfolioId, Quantity, Symbol};

/// A trade the simulator has executed.
#[derive(Debug, Clone)]
pub struct ExecutedTrade {
    /// Portfolio traded against.
    pub portfolio_id: PortfolioId,
    /// Symbol traded.
    pub symbol: Symbol,
    /// Side.
    pub side: OrderSide,
    /// Quantity.
    pub quantity: Quantity,
}

/// Simulated trade executor.
#[derive(Debug, Default)]
pub struct SimTradeExecutor {
    trades: RwLock<Vec<ExecutedTrade>>,
    fail_with: RwLock<Option<String>>,
}

impl SimTradeExecutor {
    /// Create a new simulator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent trade fail with the given reason, until
    /// cleared with [`SimTradeExecutor::clear_failure`].
    pub fn fail_with(&self, reason: impl Into<String>) {
        *self.fail_with.write() = Some(reason.into());
    }

    /// Let trades succeed again.
    pub fn clear_failure(&self) {
        *self.fail_with.write() = None;
    }

    /// Trades executed so far.
    #[must_use]
    pub fn trades(&self) -> Vec<ExecutedTrade> {
        self.trades.read().clone()
    }

    /// Number of trades executed so far.
    #[must_use]
    pub fn trade_count(&self) -> usize {
        self.trades.read().len()
    }
}

#[async_trait]
impl TradeExecutor for SimTradeExecutor {
    async fn execute(
        &self,
        portfolio_id: &PortfolioId,
        symbol: &Symbol,
        side: OrderSide,
        quantity: Quantity,
    ) -> Result<TradeFill, TradeError> {
        if let Some(reason) = self.fail_with.read().clone() {
            return Err(TradeError::Rejected { reason });
        }

        self.trades.write().push(ExecutedTrade {
            portfolio_id: portfolio_id.clone(),
            symbol: symbol.clone(),
            side,
            quantity,
        });

        Ok(TradeFill {
            fill_id: FillId::generate(),
        })
    }
}
