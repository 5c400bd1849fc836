//! Mock market data feed.
//!
//! Settable prices and session state, used by tests and by the default
//! binary wiring.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use rust_decimal::Decimal;

use crate::application::ports::{MarketDataError, MarketDataFeed};
use crate::domain::orders::value_objects::Quote;
use crate::domain::shared::{Money, Symbol};

/// Mock market data feed with settable quotes.
#[derive(Debug, Default)]
pub struct MockMarketDataFeed {
    quotes: RwLock<HashMap<Symbol, Quote>>,
    market_open: RwLock<bool>,
}

impl MockMarketDataFeed {
    /// Create a feed with the market open and no quotes.
    #[must_use]
    pub fn new() -> Self {
        Self {
            quotes: RwLock::new(HashMap::new()),
            market_open: RwLock::new(true),
        }
    }

    /// Set the last price for a symbol, zeroing volume/change stats.
    pub fn set_price(&self, symbol: &str, price: Decimal) {
        let symbol = Symbol::new(symbol);
        let quote = Quote::from_price(symbol.clone(), Money::new(price));
        self.quotes.write().insert(symbol, quote);
    }

    /// Set the full quote for a symbol.
    pub fn set_quote(&self, quote: Quote) {
        self.quotes.write().insert(quote.symbol.clone(), quote);
    }

    /// Open or close the market.
    pub fn set_market_open(&self, open: bool) {
        *self.market_open.write() = open;
    }
}

#[async_trait]
impl MarketDataFeed for MockMarketDataFeed {
    async fn snapshot(
        &self,
        symbols: &[Symbol],
    ) -> Result<HashMap<Symbol, Quote>, MarketDataError> {
        let quotes = self.quotes.read();
        Ok(symbols
            .iter()
            .filter_map(|symbol| quotes.get(symbol).map(|q| (symbol.clone(), q.clone())))
            .collect())
    }

    async fn market_open(&self) -> bool {
        *self.market_open.read()
    }
}
