//! Lifecycle Integration Tests
//!
//! End-to-end tests driving the engine through submission, scheduled
//! monitoring passes, execution, linked-order cascades, and expiration.
//! Passes are driven directly (no timers) so every scenario is
//! deterministic; the concurrency properties spawn real concurrent passes
//! against the shared store.

#![allow(clippy::expect_used, clippy::unwrap_used, clippy::too_many_lines)]

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Duration as ChronoDuration;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tokio_util::sync::CancellationToken;

use lifecycle_engine::{
    BroadcastEventNotifier, CancelOrderUseCase, CancelReason, CashPositionRiskValidator,
    ConditionalTrigger, EngineConfig, EngineError, ExecutionCoordinator, InMemoryOrderStore,
    InMemoryPortfolios, LifecycleScheduler, LogicalOperator, MockMarketDataFeed,
    ModifyOrderUseCase, Money, OcoGroupId, Order, OrderDraft, OrderQueries, OrderSide,
    OrderStatus, OrderStore, OrderTerms, OrderUpdate, PortfolioId, PortfolioSnapshot, Quantity,
    SimTradeExecutor, SubmitOrderUseCase, Symbol, TimeInForce, Timestamp, Trail,
    TriggerCondition, TriggerField,
};

type Risk = CashPositionRiskValidator<MockMarketDataFeed>;
type Coordinator = ExecutionCoordinator<
    InMemoryOrderStore,
    MockMarketDataFeed,
    Risk,
    InMemoryPortfolios,
    SimTradeExecutor,
    BroadcastEventNotifier,
>;
type Scheduler = LifecycleScheduler<
    InMemoryOrderStore,
    MockMarketDataFeed,
    Risk,
    InMemoryPortfolios,
    SimTradeExecutor,
    BroadcastEventNotifier,
>;
type Submit = SubmitOrderUseCase<
    InMemoryOrderStore,
    MockMarketDataFeed,
    Risk,
    InMemoryPortfolios,
    SimTradeExecutor,
    BroadcastEventNotifier,
>;
type Modify = ModifyOrderUseCase<
    InMemoryOrderStore,
    MockMarketDataFeed,
    Risk,
    InMemoryPortfolios,
    SimTradeExecutor,
    BroadcastEventNotifier,
>;
type Cancel = CancelOrderUseCase<InMemoryOrderStore, BroadcastEventNotifier>;

/// Fully wired engine over in-memory adapters.
struct TestEngine {
    store: Arc<InMemoryOrderStore>,
    feed: Arc<MockMarketDataFeed>,
    portfolios: Arc<InMemoryPortfolios>,
    executor: Arc<SimTradeExecutor>,
    notifier: Arc<BroadcastEventNotifier>,
    scheduler: Arc<Scheduler>,
    submit: Arc<Submit>,
    cancel: Arc<Cancel>,
    modify: Modify,
    queries: OrderQueries<InMemoryOrderStore>,
}

impl TestEngine {
    fn new() -> Self {
        let store = Arc::new(InMemoryOrderStore::new());
        let feed = Arc::new(MockMarketDataFeed::new());
        let risk = Arc::new(CashPositionRiskValidator::new(Arc::clone(&feed)));
        let portfolios = Arc::new(InMemoryPortfolios::new());
        let executor = Arc::new(SimTradeExecutor::new());
        let notifier = Arc::new(BroadcastEventNotifier::new());

        let coordinator: Arc<Coordinator> = Arc::new(ExecutionCoordinator::new(
            Arc::clone(&store),
            Arc::clone(&feed),
            Arc::clone(&risk),
            Arc::clone(&portfolios),
            Arc::clone(&executor),
            Arc::clone(&notifier),
            dec!(0.001),
        ));

        let scheduler = Arc::new(LifecycleScheduler::new(
            Arc::clone(&store),
            Arc::clone(&feed),
            Arc::clone(&coordinator),
            Arc::clone(&notifier),
            EngineConfig::default(),
            CancellationToken::new(),
        ));

        let submit = Arc::new(SubmitOrderUseCase::new(
            Arc::clone(&store),
            risk,
            Arc::clone(&portfolios),
            Arc::clone(&notifier),
            Arc::clone(&coordinator),
        ));
        let cancel = Arc::new(CancelOrderUseCase::new(
            Arc::clone(&store),
            Arc::clone(&notifier),
        ));
        let modify = ModifyOrderUseCase::new(
            Arc::clone(&store),
            Arc::clone(&submit),
            Arc::clone(&cancel),
        );
        let queries = OrderQueries::new(Arc::clone(&store));

        let engine = Self {
            store,
            feed,
            portfolios,
            executor,
            notifier,
            scheduler,
            submit,
            cancel,
            modify,
            queries,
        };
        engine.seed_portfolio(dec!(1_000_000), &[("AAPL", 100), ("MSFT", 100)]);
        engine
    }

    fn seed_portfolio(&self, cash: Decimal, positions: &[(&str, i64)]) {
        let positions = positions
            .iter()
            .map(|(symbol, qty)| (Symbol::new(*symbol), Quantity::from_i64(*qty)))
            .collect::<HashMap<_, _>>();
        self.portfolios.upsert(PortfolioSnapshot {
            portfolio_id: PortfolioId::new("pf-1"),
            cash: Money::new(cash),
            positions,
        });
    }

    async fn order(&self, order: &Order) -> Order {
        self.store.get(order.id()).await.unwrap().unwrap()
    }
}

fn draft(side: OrderSide, terms: OrderTerms, quantity: i64) -> OrderDraft {
    OrderDraft {
        portfolio_id: PortfolioId::new("pf-1"),
        symbol: Symbol::new("AAPL"),
        side,
        terms,
        quantity: Quantity::from_i64(quantity),
        time_in_force: TimeInForce::Gtc,
        expiry_date: None,
        parent_order_id: None,
        oco_group_id: None,
    }
}

fn limit_buy(limit: Decimal, quantity: i64) -> OrderDraft {
    draft(
        OrderSide::Buy,
        OrderTerms::Limit {
            limit_price: Money::new(limit),
        },
        quantity,
    )
}

// ============================================
// Submission and validation
// ============================================

#[tokio::test]
async fn submitted_limit_order_is_pending() {
    let engine = TestEngine::new();
    engine.feed.set_price("AAPL", dec!(105));

    let order = engine.submit.submit(limit_buy(dec!(100), 10)).await.unwrap();

    assert_eq!(order.status(), OrderStatus::Pending);
    let active = engine.queries.active_orders(None).await.unwrap();
    assert_eq!(active.len(), 1);
}

#[tokio::test]
async fn validation_lists_every_violated_rule() {
    let engine = TestEngine::new();

    let mut bad = limit_buy(dec!(0), 0);
    bad.quantity = Quantity::from_i64(0);

    let err = engine.submit.submit(bad).await.unwrap_err();
    match err {
        EngineError::Validation { violations } => {
            assert_eq!(violations.len(), 2);
            assert!(violations.iter().any(|v| v.contains("quantity")));
            assert!(violations.iter().any(|v| v.contains("limit_price")));
        }
        other => panic!("expected validation error, got {other}"),
    }
    // Nothing was persisted.
    assert!(engine.store.is_empty());
}

#[tokio::test]
async fn insufficient_cash_is_risk_rejected() {
    let engine = TestEngine::new();
    engine.seed_portfolio(dec!(500), &[]);
    engine.feed.set_price("AAPL", dec!(100));

    let err = engine.submit.submit(limit_buy(dec!(100), 10)).await.unwrap_err();
    match err {
        EngineError::RiskRejected { errors } => {
            assert!(errors[0].contains("insufficient cash"));
        }
        other => panic!("expected risk rejection, got {other}"),
    }
    assert!(engine.store.is_empty());
}

#[tokio::test]
async fn sell_without_position_is_risk_rejected() {
    let engine = TestEngine::new();
    engine.seed_portfolio(dec!(10_000), &[]);
    engine.feed.set_price("AAPL", dec!(100));

    let err = engine
        .submit
        .submit(draft(
            OrderSide::Sell,
            OrderTerms::StopLoss {
                stop_price: Money::new(dec!(90)),
            },
            5,
        ))
        .await
        .unwrap_err();

    assert!(matches!(err, EngineError::RiskRejected { .. }));
}

#[tokio::test]
async fn market_order_executes_on_submission() {
    let engine = TestEngine::new();
    engine.feed.set_price("AAPL", dec!(150));

    let order = engine
        .submit
        .submit(draft(OrderSide::Buy, OrderTerms::Market, 10))
        .await
        .unwrap();

    assert_eq!(order.status(), OrderStatus::Executed);
    assert_eq!(order.fill().unwrap().executed_price, Money::new(dec!(150)));
    assert_eq!(engine.executor.trade_count(), 1);
}

// ============================================
// Spec scenario: limit buy fills on a dip
// ============================================

#[tokio::test]
async fn limit_buy_fills_when_price_dips() {
    let engine = TestEngine::new();
    engine.seed_portfolio(dec!(2000), &[]);
    engine.feed.set_price("AAPL", dec!(105));

    let order = engine.submit.submit(limit_buy(dec!(100), 10)).await.unwrap();
    assert_eq!(order.status(), OrderStatus::Pending);

    // Above the limit: nothing happens.
    engine.scheduler.run_monitoring_pass().await;
    assert_eq!(engine.order(&order).await.status(), OrderStatus::Pending);

    // Price drops to 99: the next tick fills at 99 with 10 bps commission.
    engine.feed.set_price("AAPL", dec!(99));
    engine.scheduler.run_monitoring_pass().await;

    let executed = engine.order(&order).await;
    assert_eq!(executed.status(), OrderStatus::Executed);
    let fill = executed.fill().unwrap();
    assert_eq!(fill.executed_price, Money::new(dec!(99)));
    assert_eq!(fill.executed_quantity, Quantity::from_i64(10));
    assert_eq!(fill.commission, Money::new(dec!(0.99)));
}

// ============================================
// Two-phase stop-limit
// ============================================

#[tokio::test]
async fn stop_limit_arms_then_fills() {
    let engine = TestEngine::new();
    engine.feed.set_price("AAPL", dec!(100));

    let order = engine
        .submit
        .submit(draft(
            OrderSide::Sell,
            OrderTerms::StopLimit {
                stop_price: Money::new(dec!(95)),
                limit_price: Money::new(dec!(94)),
            },
            5,
        ))
        .await
        .unwrap();

    // Stop phase: price at the stop arms the order without filling.
    engine.feed.set_price("AAPL", dec!(95));
    engine.scheduler.run_monitoring_pass().await;
    assert_eq!(engine.order(&order).await.status(), OrderStatus::Triggered);
    assert_eq!(engine.executor.trade_count(), 0);

    // Below the limit: armed but not fillable.
    engine.feed.set_price("AAPL", dec!(93));
    engine.scheduler.run_monitoring_pass().await;
    assert_eq!(engine.order(&order).await.status(), OrderStatus::Triggered);

    // Limit phase: price back at the limit fills.
    engine.feed.set_price("AAPL", dec!(94));
    engine.scheduler.run_monitoring_pass().await;
    let executed = engine.order(&order).await;
    assert_eq!(executed.status(), OrderStatus::Executed);
    assert_eq!(executed.fill().unwrap().executed_price, Money::new(dec!(94)));
}

// ============================================
// Trailing stop
// ============================================

#[tokio::test]
async fn trailing_stop_follows_rally_then_fills_on_pullback() {
    let engine = TestEngine::new();
    engine.feed.set_price("AAPL", dec!(100));

    let order = engine
        .submit
        .submit(draft(
            OrderSide::Sell,
            OrderTerms::TrailingStop {
                trail: Trail::Amount(Money::new(dec!(5))),
            },
            10,
        ))
        .await
        .unwrap();

    // Seeding tick: high-water mark 100, stop 95.
    engine.scheduler.run_monitoring_pass().await;
    let seeded = engine.order(&order).await;
    assert_eq!(seeded.trailing().unwrap().stop_price, Money::new(dec!(95)));

    // Rally to 120: stop ratchets to 115.
    engine.feed.set_price("AAPL", dec!(120));
    engine.scheduler.run_monitoring_pass().await;
    let rallied = engine.order(&order).await;
    assert_eq!(rallied.trailing().unwrap().high_water_mark, Money::new(dec!(120)));
    assert_eq!(rallied.trailing().unwrap().stop_price, Money::new(dec!(115)));
    assert_eq!(rallied.status(), OrderStatus::Pending);

    // Pullback to 114: at or below the stop, fills.
    engine.feed.set_price("AAPL", dec!(114));
    engine.scheduler.run_monitoring_pass().await;
    let executed = engine.order(&order).await;
    assert_eq!(executed.status(), OrderStatus::Executed);
    assert_eq!(executed.fill().unwrap().executed_price, Money::new(dec!(114)));
}

// ============================================
// OCO invariant
// ============================================

#[tokio::test]
async fn oco_pair_executes_one_and_cancels_the_other() {
    let engine = TestEngine::new();
    engine.feed.set_price("AAPL", dec!(100));
    let group = OcoGroupId::new("oco-1");

    let mut limit_leg = draft(
        OrderSide::Sell,
        OrderTerms::Limit {
            limit_price: Money::new(dec!(110)),
        },
        5,
    );
    limit_leg.oco_group_id = Some(group.clone());
    let mut stop_leg = draft(
        OrderSide::Sell,
        OrderTerms::StopLoss {
            stop_price: Money::new(dec!(90)),
        },
        5,
    );
    stop_leg.oco_group_id = Some(group.clone());

    let limit_leg = engine.submit.submit(limit_leg).await.unwrap();
    let stop_leg = engine.submit.submit(stop_leg).await.unwrap();

    // Market rises to 111: the limit leg fills, the stop leg is cancelled.
    engine.feed.set_price("AAPL", dec!(111));
    engine.scheduler.run_monitoring_pass().await;

    let executed = engine.order(&limit_leg).await;
    assert_eq!(executed.status(), OrderStatus::Executed);

    let cancelled = engine.order(&stop_leg).await;
    assert_eq!(cancelled.status(), OrderStatus::Cancelled);
    assert_eq!(
        cancelled.termination().unwrap().reason,
        "OCO - other order executed"
    );
    assert_eq!(engine.executor.trade_count(), 1);
}

#[tokio::test]
async fn oco_group_never_executes_two_members() {
    // Two take-profit legs whose triggers are both satisfied by the same
    // tick, hammered by concurrent passes: at most one may execute.
    let engine = TestEngine::new();
    engine.feed.set_price("AAPL", dec!(90));
    let group = OcoGroupId::new("oco-race");

    let mut leg_a = draft(
        OrderSide::Sell,
        OrderTerms::TakeProfit {
            trigger_price: Money::new(dec!(100)),
        },
        5,
    );
    leg_a.oco_group_id = Some(group.clone());
    let mut leg_b = draft(
        OrderSide::Sell,
        OrderTerms::TakeProfit {
            trigger_price: Money::new(dec!(105)),
        },
        5,
    );
    leg_b.oco_group_id = Some(group.clone());

    let leg_a = engine.submit.submit(leg_a).await.unwrap();
    let leg_b = engine.submit.submit(leg_b).await.unwrap();

    engine.feed.set_price("AAPL", dec!(110));

    let passes: Vec<_> = (0..8)
        .map(|_| {
            let scheduler = Arc::clone(&engine.scheduler);
            tokio::spawn(async move { scheduler.run_monitoring_pass().await })
        })
        .collect();
    for pass in passes {
        pass.await.unwrap();
    }

    let a = engine.order(&leg_a).await;
    let b = engine.order(&leg_b).await;
    let executed = [&a, &b]
        .iter()
        .filter(|o| o.status() == OrderStatus::Executed)
        .count();

    assert_eq!(executed, 1, "exactly one OCO member may execute");
    assert_eq!(engine.executor.trade_count(), 1);
    for order in [&a, &b] {
        if order.status() != OrderStatus::Executed {
            assert_eq!(order.status(), OrderStatus::Cancelled);
            assert_eq!(
                order.termination().unwrap().reason,
                "OCO - other order executed"
            );
        }
    }
}

// ============================================
// No double execution
// ============================================

#[tokio::test]
async fn concurrent_ticks_and_cancel_yield_one_terminal_transition() {
    let engine = TestEngine::new();
    engine.feed.set_price("AAPL", dec!(99));

    let order = engine.submit.submit(limit_buy(dec!(100), 10)).await.unwrap();

    let mut tasks = Vec::new();
    for _ in 0..8 {
        let scheduler = Arc::clone(&engine.scheduler);
        tasks.push(tokio::spawn(async move {
            scheduler.run_monitoring_pass().await;
        }));
    }
    let cancel = Arc::clone(&engine.cancel);
    let order_id = order.id().clone();
    tasks.push(tokio::spawn(async move {
        // Losing the race to an execution is expected here.
        let _ = cancel.cancel(&order_id, CancelReason::user_requested()).await;
    }));
    for task in tasks {
        task.await.unwrap();
    }

    let settled = engine.order(&order).await;
    assert!(settled.status().is_terminal());
    assert!(engine.executor.trade_count() <= 1);
    match settled.status() {
        OrderStatus::Executed => {
            assert_eq!(engine.executor.trade_count(), 1);
            assert!(settled.fill().is_some());
        }
        OrderStatus::Cancelled => {
            assert!(settled.termination().is_some());
        }
        other => panic!("unexpected terminal status {other}"),
    }
}

// ============================================
// Conditional orders: strict left fold
// ============================================

fn price_above(value: Decimal, op: Option<LogicalOperator>) -> ConditionalTrigger {
    ConditionalTrigger {
        field: TriggerField::Price,
        condition: TriggerCondition::GreaterThan,
        value,
        value2: None,
        logical_operator: op,
    }
}

#[tokio::test]
async fn conditional_fold_is_order_dependent() {
    let engine = TestEngine::new();
    engine.feed.set_price("AAPL", dec!(100));

    // Against price 100: A (>99) = true, B (>98, OR) = true, C (>101, AND)
    // = false. Strict left fold: ((A OR B) AND C) = false, so the order must
    // hold. Precedence-aware algebra A AND (B OR C) would be true and would
    // have executed here.
    let order = engine
        .submit
        .submit(draft(
            OrderSide::Buy,
            OrderTerms::Conditional {
                triggers: vec![
                    price_above(dec!(99), Some(LogicalOperator::And)),
                    price_above(dec!(98), Some(LogicalOperator::Or)),
                    price_above(dec!(101), Some(LogicalOperator::And)),
                ],
            },
            10,
        ))
        .await
        .unwrap();

    engine.scheduler.run_monitoring_pass().await;
    assert_eq!(engine.order(&order).await.status(), OrderStatus::Pending);

    // At 102 every trigger is true and the fold passes; the conditional
    // match executes immediately.
    engine.feed.set_price("AAPL", dec!(102));
    engine.scheduler.run_monitoring_pass().await;
    let executed = engine.order(&order).await;
    assert_eq!(executed.status(), OrderStatus::Executed);
}

#[tokio::test]
async fn conditional_on_volume_and_change() {
    let engine = TestEngine::new();
    engine.feed.set_quote(lifecycle_engine::Quote {
        symbol: Symbol::new("AAPL"),
        price: Money::new(dec!(100)),
        volume: dec!(5_000_000),
        change: dec!(2.5),
        change_percent: dec!(2.56),
    });

    let order = engine
        .submit
        .submit(draft(
            OrderSide::Buy,
            OrderTerms::Conditional {
                triggers: vec![
                    ConditionalTrigger {
                        field: TriggerField::Volume,
                        condition: TriggerCondition::GreaterThan,
                        value: dec!(1_000_000),
                        value2: None,
                        logical_operator: None,
                    },
                    ConditionalTrigger {
                        field: TriggerField::ChangePercent,
                        condition: TriggerCondition::Between,
                        value: dec!(2),
                        value2: Some(dec!(3)),
                        logical_operator: Some(LogicalOperator::And),
                    },
                ],
            },
            10,
        ))
        .await
        .unwrap();

    engine.scheduler.run_monitoring_pass().await;
    assert_eq!(engine.order(&order).await.status(), OrderStatus::Executed);
}

// ============================================
// Bracket orders
// ============================================

#[tokio::test]
async fn bracket_creates_children_and_executes_entry() {
    let engine = TestEngine::new();
    engine.feed.set_price("AAPL", dec!(100));

    let entry = engine
        .submit
        .submit(draft(
            OrderSide::Buy,
            OrderTerms::Bracket {
                take_profit: Money::new(dec!(110)),
                stop_loss: Money::new(dec!(90)),
            },
            10,
        ))
        .await
        .unwrap();

    // Entry executes immediately like a market order.
    assert_eq!(entry.status(), OrderStatus::Executed);

    // Both children are live pending orders referencing the entry.
    let active = engine.queries.active_orders(None).await.unwrap();
    assert_eq!(active.len(), 2);
    for child in &active {
        assert_eq!(child.parent_order_id(), Some(entry.id()));
        assert_eq!(child.side(), OrderSide::Sell);
        assert_eq!(child.quantity(), Quantity::from_i64(10));
    }
    let types: Vec<_> = active.iter().map(|o| o.order_type().to_string()).collect();
    assert!(types.contains(&"TAKE_PROFIT".to_string()));
    assert!(types.contains(&"STOP_LOSS".to_string()));
}

// ============================================
// Expiration
// ============================================

#[tokio::test]
async fn expired_pending_order_is_swept() {
    let engine = TestEngine::new();
    engine.feed.set_price("AAPL", dec!(105));

    let mut stale = limit_buy(dec!(100), 10);
    stale.expiry_date = Some(Timestamp::now().minus(ChronoDuration::days(2)));
    let stale = engine.submit.submit(stale).await.unwrap();

    let fresh = engine.submit.submit(limit_buy(dec!(100), 10)).await.unwrap();

    engine.scheduler.run_expiration_pass().await;

    let expired = engine.order(&stale).await;
    assert_eq!(expired.status(), OrderStatus::Expired);
    let termination = expired.termination().unwrap();
    assert_eq!(termination.reason, "Order expired");
    assert!(termination.cancelled_at <= Timestamp::now());

    assert_eq!(engine.order(&fresh).await.status(), OrderStatus::Pending);
}

// ============================================
// Market session gate
// ============================================

#[tokio::test]
async fn monitoring_pass_skips_when_market_closed() {
    let engine = TestEngine::new();
    engine.feed.set_price("AAPL", dec!(99));
    engine.feed.set_market_open(false);

    let order = engine.submit.submit(limit_buy(dec!(100), 10)).await.unwrap();

    engine.scheduler.run_monitoring_pass().await;
    assert_eq!(engine.order(&order).await.status(), OrderStatus::Pending);

    engine.feed.set_market_open(true);
    engine.scheduler.run_monitoring_pass().await;
    assert_eq!(engine.order(&order).await.status(), OrderStatus::Executed);
}

// ============================================
// Execution failure
// ============================================

#[tokio::test]
async fn executor_failure_terminally_cancels_the_order() {
    let engine = TestEngine::new();
    let mut events = engine.notifier.subscribe();
    engine.feed.set_price("AAPL", dec!(99));
    engine.executor.fail_with("no liquidity");

    let order = engine.submit.submit(limit_buy(dec!(100), 10)).await.unwrap();
    engine.scheduler.run_monitoring_pass().await;

    let failed = engine.order(&order).await;
    assert_eq!(failed.status(), OrderStatus::Cancelled);
    assert_eq!(
        failed.termination().unwrap().reason,
        "Execution failed: Trade rejected: no liquidity"
    );

    // Failure is terminal: clearing the fault and re-ticking never retries.
    engine.executor.clear_failure();
    engine.scheduler.run_monitoring_pass().await;
    assert_eq!(engine.order(&order).await.status(), OrderStatus::Cancelled);
    assert_eq!(engine.executor.trade_count(), 0);

    // The failure event reached the notifier.
    let mut saw_failure = false;
    while let Ok(event) = events.try_recv() {
        if event.event_type() == "order_execution_failed" {
            saw_failure = true;
        }
    }
    assert!(saw_failure);
}

// ============================================
// Cancellation and modification
// ============================================

#[tokio::test]
async fn cancel_group_cancels_every_active_member() {
    let engine = TestEngine::new();
    engine.feed.set_price("AAPL", dec!(100));
    let group = OcoGroupId::new("oco-cancel");

    let mut leg_a = limit_buy(dec!(90), 5);
    leg_a.oco_group_id = Some(group.clone());
    let mut leg_b = limit_buy(dec!(85), 5);
    leg_b.oco_group_id = Some(group.clone());

    let leg_a = engine.submit.submit(leg_a).await.unwrap();
    let leg_b = engine.submit.submit(leg_b).await.unwrap();

    let cancelled = engine
        .cancel
        .cancel_group(&group, CancelReason::group("Strategy shutdown"))
        .await
        .unwrap();
    assert_eq!(cancelled.len(), 2);

    for order in [&leg_a, &leg_b] {
        let stored = engine.order(order).await;
        assert_eq!(stored.status(), OrderStatus::Cancelled);
        assert_eq!(stored.termination().unwrap().reason, "Strategy shutdown");
    }
}

#[tokio::test]
async fn cancel_terminal_order_is_invalid_transition() {
    let engine = TestEngine::new();
    engine.feed.set_price("AAPL", dec!(150));

    let order = engine
        .submit
        .submit(draft(OrderSide::Buy, OrderTerms::Market, 10))
        .await
        .unwrap();
    assert_eq!(order.status(), OrderStatus::Executed);

    let err = engine
        .cancel
        .cancel(order.id(), CancelReason::user_requested())
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidTransition { .. }));
}

#[tokio::test]
async fn cancel_unknown_order_is_not_found() {
    let engine = TestEngine::new();
    let err = engine
        .cancel
        .cancel(
            &lifecycle_engine::OrderId::new("missing"),
            CancelReason::user_requested(),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::NotFound { .. }));
}

#[tokio::test]
async fn modify_replaces_order_preserving_links() {
    let engine = TestEngine::new();
    engine.feed.set_price("AAPL", dec!(105));
    let group = OcoGroupId::new("oco-mod");

    let mut original = limit_buy(dec!(100), 10);
    original.oco_group_id = Some(group.clone());
    let original = engine.submit.submit(original).await.unwrap();

    let replacement = engine
        .modify
        .modify(
            original.id(),
            OrderUpdate {
                terms: Some(OrderTerms::Limit {
                    limit_price: Money::new(dec!(95)),
                }),
                quantity: Some(Quantity::from_i64(20)),
                ..OrderUpdate::default()
            },
        )
        .await
        .unwrap();

    // The original is terminally cancelled as replaced.
    let cancelled = engine.order(&original).await;
    assert_eq!(cancelled.status(), OrderStatus::Cancelled);
    assert_eq!(
        cancelled.termination().unwrap().reason,
        "Order replaced with modified order"
    );

    // The replacement keeps the linking and applies the changes.
    assert_ne!(replacement.id(), original.id());
    assert_eq!(replacement.oco_group_id(), Some(&group));
    assert_eq!(replacement.quantity(), Quantity::from_i64(20));
    assert_eq!(replacement.status(), OrderStatus::Pending);
}
