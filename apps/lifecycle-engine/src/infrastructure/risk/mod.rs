//! Risk validation adapters.

mod cash_position;
mod portfolios;

pub use cash_position::CashPositionRiskValidator;
pub use portfolios::InMemoryPortfolios;
