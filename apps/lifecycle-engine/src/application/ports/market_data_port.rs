//! Market data port (driven port).
//!
//! Interface to the market data feed consumed by the monitoring pass and
//! price resolution.

use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::orders::value_objects::Quote;
use crate::domain::shared::Symbol;

/// Market data errors.
#[derive(Debug, Clone, Error)]
pub enum MarketDataError {
    /// No data available for a symbol.
    #[error("No market data for symbol: {symbol}")]
    Unavailable {
        /// Symbol without data.
        symbol: String,
    },

    /// Feed-level failure.
    #[error("Market data feed error: {message}")]
    FeedError {
        /// Error details.
        message: String,
    },
}

/// Port for market data access.
#[async_trait]
pub trait MarketDataFeed: Send + Sync {
    /// Fetch the current snapshot for a set of symbols.
    ///
    /// Symbols without data are absent from the returned map.
    async fn snapshot(&self, symbols: &[Symbol]) -> Result<HashMap<Symbol, Quote>, MarketDataError>;

    /// Whether the market is currently open for trading.
    ///
    /// The monitoring pass is skipped entirely while the market is closed.
    async fn market_open(&self) -> bool;
}
