//! Trade executor port (driven port).
//!
//! Interface to the component that applies the underlying buy/sell against
//! a portfolio and reports the fill.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::orders::value_objects::OrderSide;
use crate::domain::shared::{FillId, PortfolioId, Quantity, Symbol};

/// Fill acknowledgment from the trade executor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeFill {
    /// Executor-assigned fill id.
    pub fill_id: FillId,
}

/// Trade executor errors. Any error terminally cancels the order; execution
/// is never retried automatically.
#[derive(Debug, Clone, Error)]
pub enum TradeError {
    /// The trade was rejected.
    #[error("Trade rejected: {reason}")]
    Rejected {
        /// Rejection reason.
        reason: String,
    },

    /// The executor is unavailable.
    #[error("Trade executor unavailable: {message}")]
    Unavailable {
        /// Error details.
        message: String,
    },
}

/// Port for executing the underlying trade.
#[async_trait]
pub trait TradeExecutor: Send + Sync {
    /// Execute a buy/sell against a portfolio.
    ///
    /// # Errors
    ///
    /// Returns error if the trade cannot be completed; the caller treats
    /// the order as terminally failed.
    async fn execute(
        &self,
        portfolio_id: &PortfolioId,
        symbol: &Symbol,
        side: OrderSide,
        quantity: Quantity,
    ) -> Result<TradeFill, TradeError>;
}
