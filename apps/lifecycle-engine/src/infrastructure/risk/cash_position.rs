//! Cash and position risk validator.
//!
//! Simple pre-trade checks: buy orders must be covered by available cash at
//! the reference price, sell orders by an existing position. Every violated
//! rule is reported.

use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::application::ports::{
    MarketDataFeed, PortfolioSnapshot, RiskReport, RiskValidator,
};
use crate::domain::orders::aggregate::Order;
use crate::domain::orders::value_objects::{OrderSide, OrderTerms};
use crate::domain::shared::Money;

/// Risk validator enforcing cash and position coverage.
pub struct CashPositionRiskValidator<F>
where
    F: MarketDataFeed,
{
    feed: Arc<F>,
}

impl<F> CashPositionRiskValidator<F>
where
    F: MarketDataFeed,
{
    /// Create a validator reading reference prices from a feed.
    pub const fn new(feed: Arc<F>) -> Self {
        Self { feed }
    }

    /// Reference price for the cash check: the live market price when
    /// available, else a price taken from the order's own terms.
    async fn reference_price(&self, order: &Order) -> Option<Money> {
        let quoted = self
            .feed
            .snapshot(std::slice::from_ref(order.symbol()))
            .await
            .ok()
            .and_then(|snapshot| snapshot.get(order.symbol()).map(|quote| quote.price));

        quoted.or(match order.terms() {
            OrderTerms::Limit { limit_price } => Some(*limit_price),
            OrderTerms::StopLimit { limit_price, .. } => Some(*limit_price),
            OrderTerms::Bracket { take_profit, .. } => Some(*take_profit),
            _ => None,
        })
    }
}

#[async_trait]
impl<F> RiskValidator for CashPositionRiskValidator<F>
where
    F: MarketDataFeed,
{
    async fn validate(&self, order: &Order, portfolio: &PortfolioSnapshot) -> RiskReport {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        match order.side() {
            OrderSide::Buy => match self.reference_price(order).await {
                Some(price) => {
                    let notional = price * order.quantity().amount();
                    if notional > portfolio.cash {
                        errors.push(format!(
                            "insufficient cash: required {notional}, available {}",
                            portfolio.cash
                        ));
                    } else if notional.amount()
                        > portfolio.cash.amount() * Decimal::new(5, 1)
                    {
                        warnings.push(format!(
                            "order consumes more than half of available cash ({notional})"
                        ));
                    }
                }
                None => errors.push(format!(
                    "no reference price available for {}",
                    order.symbol()
                )),
            },
            OrderSide::Sell => {
                let held = portfolio.position(order.symbol());
                if !held.is_positive() {
                    errors.push(format!("no position held in {}", order.symbol()));
                } else if order.quantity() > held {
                    errors.push(format!(
                        "insufficient position: selling {}, holding {held}",
                        order.quantity()
                    ));
                }
            }
        }

        RiskReport {
            valid: errors.is_empty(),
            errors,
            warnings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::orders::aggregate::OrderDraft;
    use crate::domain::orders::value_objects::TimeInForce;
    use crate::domain::shared::{PortfolioId, Quantity, Symbol};
    use crate::infrastructure::market_data::MockMarketDataFeed;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;

    fn order(side: OrderSide, terms: OrderTerms, quantity: i64) -> Order {
        Order::submit(OrderDraft {
            portfolio_id: PortfolioId::new("pf-1"),
            symbol: Symbol::new("AAPL"),
            side,
            terms,
            quantity: Quantity::from_i64(quantity),
            time_in_force: TimeInForce::Day,
            expiry_date: None,
            parent_order_id: None,
            oco_group_id: None,
        })
        .unwrap()
    }

    fn portfolio(cash: Decimal, held: i64) -> PortfolioSnapshot {
        let mut positions = HashMap::new();
        if held > 0 {
            positions.insert(Symbol::new("AAPL"), Quantity::from_i64(held));
        }
        PortfolioSnapshot {
            portfolio_id: PortfolioId::new("pf-1"),
            cash: Money::new(cash),
            positions,
        }
    }

    #[tokio::test]
    async fn buy_within_cash_passes() {
        let feed = Arc::new(MockMarketDataFeed::new());
        feed.set_price("AAPL", dec!(100));
        let validator = CashPositionRiskValidator::new(feed);

        let order = order(
            OrderSide::Buy,
            OrderTerms::Limit {
                limit_price: Money::new(dec!(100)),
            },
            10,
        );
        let report = validator.validate(&order, &portfolio(dec!(2000), 0)).await;

        assert!(report.valid);
        // Notional 1000 is half of 2000; no warning at exactly half.
        assert!(report.warnings.is_empty());
    }

    #[tokio::test]
    async fn buy_beyond_cash_fails() {
        let feed = Arc::new(MockMarketDataFeed::new());
        feed.set_price("AAPL", dec!(300));
        let validator = CashPositionRiskValidator::new(feed);

        let order = order(
            OrderSide::Buy,
            OrderTerms::Limit {
                limit_price: Money::new(dec!(300)),
            },
            10,
        );
        let report = validator.validate(&order, &portfolio(dec!(2000), 0)).await;

        assert!(!report.valid);
        assert!(report.errors[0].contains("insufficient cash"));
    }

    #[tokio::test]
    async fn buy_falls_back_to_limit_price() {
        let feed = Arc::new(MockMarketDataFeed::new());
        let validator = CashPositionRiskValidator::new(feed);

        let order = order(
            OrderSide::Buy,
            OrderTerms::Limit {
                limit_price: Money::new(dec!(100)),
            },
            10,
        );
        let report = validator.validate(&order, &portfolio(dec!(2000), 0)).await;
        assert!(report.valid);
    }

    #[tokio::test]
    async fn market_buy_without_feed_price_fails() {
        let feed = Arc::new(MockMarketDataFeed::new());
        let validator = CashPositionRiskValidator::new(feed);

        let order = order(OrderSide::Buy, OrderTerms::Market, 10);
        let report = validator.validate(&order, &portfolio(dec!(2000), 0)).await;

        assert!(!report.valid);
        assert!(report.errors[0].contains("no reference price"));
    }

    #[tokio::test]
    async fn sell_requires_position() {
        let feed = Arc::new(MockMarketDataFeed::new());
        feed.set_price("AAPL", dec!(100));
        let validator = CashPositionRiskValidator::new(feed);

        let order = order(
            OrderSide::Sell,
            OrderTerms::StopLoss {
                stop_price: Money::new(dec!(90)),
            },
            5,
        );

        let report = validator.validate(&order, &portfolio(dec!(0), 0)).await;
        assert!(!report.valid);
        assert!(report.errors[0].contains("no position"));

        let report = validator.validate(&order, &portfolio(dec!(0), 3)).await;
        assert!(!report.valid);
        assert!(report.errors[0].contains("insufficient position"));

        let report = validator.validate(&order, &portfolio(dec!(0), 5)).await;
        assert!(report.valid);
    }

    #[tokio::test]
    async fn large_buy_warns() {
        let feed = Arc::new(MockMarketDataFeed::new());
        feed.set_price("AAPL", dec!(150));
        let validator = CashPositionRiskValidator::new(feed);

        let order = order(OrderSide::Buy, OrderTerms::Market, 10);
        let report = validator.validate(&order, &portfolio(dec!(2000), 0)).await;

        assert!(report.valid);
        assert_eq!(report.warnings.len(), 1);
    }
}
