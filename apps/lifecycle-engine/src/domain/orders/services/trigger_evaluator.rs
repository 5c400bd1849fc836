//! Pure trigger evaluation.
//!
//! Maps an order and a market snapshot to a trigger decision. No side
//! effects; the scheduler and execution coordinator act on the decision.

use crate::domain::orders::aggregate::Order;
use crate::domain::orders::value_objects::{
    ConditionalTrigger, LogicalOperator, OrderSide, OrderStatus, OrderTerms, Quote,
};

/// Outcome of evaluating an order against a market snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerDecision {
    /// Nothing to do this tick.
    Hold,
    /// Arm a two-phase order (`Pending -> Triggered`), no fill.
    Arm,
    /// Execute the order now.
    Execute,
}

/// Evaluate an order against a market snapshot.
///
/// Conditional triggers, when present, are evaluated ahead of the type-based
/// predicate: a match executes immediately and the standard evaluation is
/// skipped for this tick. Trailing-stop orders are evaluated against their
/// current stop price; callers fold the tick's price into the trailing state
/// first.
#[must_use]
pub fn evaluate(order: &Order, quote: &Quote) -> TriggerDecision {
    let triggers = order.conditional_triggers();
    if !triggers.is_empty() {
        return if fold_triggers(triggers, quote) {
            TriggerDecision::Execute
        } else {
            TriggerDecision::Hold
        };
    }

    let price = quote.price;

    match order.terms() {
        // Market and bracket entries execute immediately on submission; a
        // pending one reaching the monitoring pass executes on sight.
        OrderTerms::Market | OrderTerms::Bracket { .. } => TriggerDecision::Execute,

        OrderTerms::Limit { limit_price } => {
            let filled = match order.side() {
                OrderSide::Buy => price <= *limit_price,
                OrderSide::Sell => price >= *limit_price,
            };
            if filled {
                TriggerDecision::Execute
            } else {
                TriggerDecision::Hold
            }
        }

        OrderTerms::StopLoss { stop_price } => {
            if price <= *stop_price {
                TriggerDecision::Execute
            } else {
                TriggerDecision::Hold
            }
        }

        OrderTerms::TakeProfit { trigger_price } => {
            if price >= *trigger_price {
                TriggerDecision::Execute
            } else {
                TriggerDecision::Hold
            }
        }

        // Two-phase: the stop arms the order, the limit fills it.
        OrderTerms::StopLimit {
            stop_price,
            limit_price,
        } => match order.status() {
            OrderStatus::Pending if price <= *stop_price => TriggerDecision::Arm,
            OrderStatus::Triggered if price >= *limit_price => TriggerDecision::Execute,
            _ => TriggerDecision::Hold,
        },

        OrderTerms::TrailingStop { .. } => {
            let stopped = order
                .trailing()
                .is_some_and(|state| price <= state.stop_price);
            if stopped {
                TriggerDecision::Execute
            } else {
                TriggerDecision::Hold
            }
        }

        // Validation guarantees a non-empty trigger list, handled above.
        OrderTerms::Conditional { .. } => TriggerDecision::Hold,
    }
}

/// Fold-combine an ordered trigger list, left to right.
///
/// `acc` starts from the first trigger's result; each subsequent trigger
/// combines with `acc` through its own operator (AND when unset). This is a
/// strict left fold, not precedence-aware boolean algebra: mixed AND/OR
/// sequences are order-dependent. `[A(..), B(OR), C(AND)]` evaluates as
/// `((A) OR B) AND C`, never `A AND (B OR C)`.
#[must_use]
pub fn fold_triggers(triggers: &[ConditionalTrigger], quote: &Quote) -> bool {
    let mut iter = triggers.iter();
    let Some(first) = iter.next() else {
        return false;
    };

    let mut acc = first.matches(quote);
    for trigger in iter {
        let result = trigger.matches(quote);
        acc = match trigger.logical_operator {
            Some(LogicalOperator::Or) => acc || result,
            _ => acc && result,
        };
    }
    acc
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::orders::aggregate::OrderDraft;
    use crate::domain::orders::value_objects::{
        TimeInForce, Trail, TriggerCondition, TriggerField,
    };
    use crate::domain::shared::{Money, PortfolioId, Quantity, Symbol};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use test_case::test_case;

    fn order(side: OrderSide, terms: OrderTerms) -> Order {
        Order::submit(OrderDraft {
            portfolio_id: PortfolioId::new("pf-1"),
            symbol: Symbol::new("AAPL"),
            side,
            terms,
            quantity: Quantity::from_i64(10),
            time_in_force: TimeInForce::Day,
            expiry_date: None,
            parent_order_id: None,
            oco_group_id: None,
        })
        .unwrap()
    }

    fn quote(price: Decimal) -> Quote {
        Quote::from_price(Symbol::new("AAPL"), Money::new(price))
    }

    #[test]
    fn market_order_executes_on_sight() {
        let order = order(OrderSide::Buy, OrderTerms::Market);
        assert_eq!(evaluate(&order, &quote(dec!(100))), TriggerDecision::Execute);
    }

    #[test_case(dec!(99), TriggerDecision::Execute ; "below limit fills")]
    #[test_case(dec!(100), TriggerDecision::Execute ; "at limit fills")]
    #[test_case(dec!(101), TriggerDecision::Hold ; "above limit holds")]
    fn limit_buy(price: Decimal, expected: TriggerDecision) {
        let order = order(
            OrderSide::Buy,
            OrderTerms::Limit {
                limit_price: Money::new(dec!(100)),
            },
        );
        assert_eq!(evaluate(&order, &quote(price)), expected);
    }

    #[test_case(dec!(110), TriggerDecision::Execute ; "at limit fills")]
    #[test_case(dec!(111), TriggerDecision::Execute ; "above limit fills")]
    #[test_case(dec!(109), TriggerDecision::Hold ; "below limit holds")]
    fn limit_sell(price: Decimal, expected: TriggerDecision) {
        let order = order(
            OrderSide::Sell,
            OrderTerms::Limit {
                limit_price: Money::new(dec!(110)),
            },
        );
        assert_eq!(evaluate(&order, &quote(price)), expected);
    }

    #[test]
    fn stop_loss_triggers_below_stop() {
        let order = order(
            OrderSide::Sell,
            OrderTerms::StopLoss {
                stop_price: Money::new(dec!(90)),
            },
        );
        assert_eq!(evaluate(&order, &quote(dec!(89))), TriggerDecision::Execute);
        assert_eq!(evaluate(&order, &quote(dec!(91))), TriggerDecision::Hold);
    }

    #[test]
    fn take_profit_triggers_above_target() {
        let order = order(
            OrderSide::Sell,
            OrderTerms::TakeProfit {
                trigger_price: Money::new(dec!(110)),
            },
        );
        assert_eq!(evaluate(&order, &quote(dec!(110))), TriggerDecision::Execute);
        assert_eq!(evaluate(&order, &quote(dec!(109))), TriggerDecision::Hold);
    }

    #[test]
    fn stop_limit_two_phase() {
        let mut order = order(
            OrderSide::Sell,
            OrderTerms::StopLimit {
                stop_price: Money::new(dec!(95)),
                limit_price: Money::new(dec!(94)),
            },
        );

        // Phase one: stop arms the order, no fill.
        assert_eq!(evaluate(&order, &quote(dec!(96))), TriggerDecision::Hold);
        assert_eq!(evaluate(&order, &quote(dec!(95))), TriggerDecision::Arm);

        order.mark_triggered(Money::new(dec!(95))).unwrap();

        // Phase two: limit fills the armed order.
        assert_eq!(evaluate(&order, &quote(dec!(93))), TriggerDecision::Hold);
        assert_eq!(evaluate(&order, &quote(dec!(94))), TriggerDecision::Execute);
    }

    #[test]
    fn trailing_stop_uses_current_stop_price() {
        let mut order = order(
            OrderSide::Sell,
            OrderTerms::TrailingStop {
                trail: Trail::Amount(Money::new(dec!(5))),
            },
        );

        // Unseeded state never triggers.
        assert_eq!(evaluate(&order, &quote(dec!(1))), TriggerDecision::Hold);

        order.update_trailing(Money::new(dec!(100)));
        assert_eq!(evaluate(&order, &quote(dec!(96))), TriggerDecision::Hold);
        assert_eq!(evaluate(&order, &quote(dec!(95))), TriggerDecision::Execute);
    }

    fn price_trigger(
        condition: TriggerCondition,
        value: Decimal,
        op: Option<LogicalOperator>,
    ) -> ConditionalTrigger {
        ConditionalTrigger {
            field: TriggerField::Price,
            condition,
            value,
            value2: None,
            logical_operator: op,
        }
    }

    #[test]
    fn conditional_match_executes() {
        let order = order(
            OrderSide::Buy,
            OrderTerms::Conditional {
                triggers: vec![price_trigger(
                    TriggerCondition::GreaterThan,
                    dec!(100),
                    None,
                )],
            },
        );
        assert_eq!(evaluate(&order, &quote(dec!(101))), TriggerDecision::Execute);
        assert_eq!(evaluate(&order, &quote(dec!(99))), TriggerDecision::Hold);
    }

    // Strict left fold: [A, B(OR), C(AND)] evaluates as ((A OR B) AND C),
    // not A AND (B OR C). Full hand-picked truth table.
    #[test_case(true, true, true, true)]
    #[test_case(true, true, false, false)]
    #[test_case(true, false, true, true)]
    #[test_case(true, false, false, false)]
    #[test_case(false, true, true, true)]
    #[test_case(false, true, false, false)]
    #[test_case(false, false, true, false)]
    #[test_case(false, false, false, false)]
    fn conditional_fold_truth_table(a: bool, b: bool, c: bool, expected: bool) {
        // Build triggers whose truth against a fixed quote is forced: price
        // is 100, so GreaterThan 99 is true and GreaterThan 101 is false.
        let forced = |result: bool, op: Option<LogicalOperator>| {
            price_trigger(
                TriggerCondition::GreaterThan,
                if result { dec!(99) } else { dec!(101) },
                op,
            )
        };

        let triggers = vec![
            forced(a, Some(LogicalOperator::And)),
            forced(b, Some(LogicalOperator::Or)),
            forced(c, Some(LogicalOperator::And)),
        ];

        assert_eq!(fold_triggers(&triggers, &quote(dec!(100))), expected);
    }

    #[test]
    fn fold_empty_triggers_is_false() {
        assert!(!fold_triggers(&[], &quote(dec!(100))));
    }

    #[test]
    fn fold_missing_operator_defaults_to_and() {
        let triggers = vec![
            price_trigger(TriggerCondition::GreaterThan, dec!(99), None),
            price_trigger(TriggerCondition::LessThan, dec!(99), None),
        ];
        assert!(!fold_triggers(&triggers, &quote(dec!(100))));
    }
}
