//! Trade executor adapters.

mod sim;

pub use sim::{ExecutedTrade, SimTradeExecutor};
