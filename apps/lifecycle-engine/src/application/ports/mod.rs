//! Driven ports: interfaces to external collaborators.

mod event_notifier_port;
mod market_data_port;
mod risk_port;
mod trade_executor_port;

pub use event_notifier_port::{EventNotifier, NoOpEventNotifier, NotifyError};
pub use market_data_port::{MarketDataError, MarketDataFeed};
pub use risk_port::{PortfolioProvider, PortfolioSnapshot, RiskReport, RiskValidator};
pub use trade_executor_port::{TradeError, TradeExecutor, TradeFill};
