// Allow unwrap/expect and test-specific patterns in test code
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::too_many_lines,
        clippy::needless_pass_by_value,
        clippy::items_after_statements
    )
)]

//! Order Lifecycle & Execution Engine - Rust Core Library
//!
//! Owns an order from creation through triggering, execution, cancellation,
//! or expiration, including composite strategies (bracket, one-cancels-other,
//! trailing stop, multi-condition conditional orders).
//!
//! # Architecture (Clean Architecture + DDD + Hexagonal)
//!
//! ## Layers (inside → outside)
//!
//! - **Domain**: Core business logic (aggregates, value objects, events)
//!   - `orders`: Order aggregate, status lifecycle, pure trigger evaluation,
//!     the compare-and-set persistence port
//!   - `shared`: Money, Quantity, Symbol, Timestamp, typed ids
//!
//! - **Application**: Use cases and orchestration
//!   - `ports`: Interfaces for collaborators (`MarketDataFeed`,
//!     `RiskValidator`, `TradeExecutor`, `EventNotifier`)
//!   - `services`: `ExecutionCoordinator`, `LinkedOrderCoordinator`,
//!     `LifecycleScheduler`
//!   - `use_cases`: submit / cancel / modify / queries
//!
//! - **Infrastructure**: Adapters (implementations)
//!   - `persistence`: in-memory order store with CAS semantics
//!   - `market_data`, `risk`, `executor`, `notifier`: default adapters
//!
//! # Concurrency
//!
//! The check-trigger-then-execute sequence for a single order is a
//! serialized critical section: a keyed async lock (OCO group or order id)
//! plus an optimistic compare-and-set on status at the store. No order is
//! ever executed, cancelled, or expired twice.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

// =============================================================================
// Clean Architecture Layers
// =============================================================================

/// Domain layer - core business logic with no external dependencies.
pub mod domain;

/// Application layer - use cases and port definitions.
pub mod application;

/// Infrastructure layer - adapters and default implementations.
pub mod infrastructure;

/// Engine configuration.
pub mod config;

/// Engine-level error taxonomy.
pub mod error;

// =============================================================================
// Re-exports
// =============================================================================

// Domain re-exports
pub use domain::orders::{
    Order, OrderDraft, OrderError, OrderEvent, OrderStore, StoreError,
    services::{TriggerDecision, evaluate, fold_triggers},
    value_objects::{
        CancelReason, ConditionalTrigger, LogicalOperator, OrderSide, OrderStatus, OrderTerms,
        OrderType, Quote, TimeInForce, Trail, TriggerCondition, TriggerField,
    },
};
pub use domain::shared::{
    Money, OcoGroupId, OrderId, PortfolioId, Quantity, Symbol, Timestamp,
};

// Application re-exports
pub use application::ports::{
    EventNotifier, MarketDataFeed, NoOpEventNotifier, PortfolioProvider, PortfolioSnapshot,
    RiskReport, RiskValidator, TradeExecutor,
};
pub use application::services::{
    ExecutionCoordinator, ExecutionResult, LifecycleScheduler, LinkedOrderCoordinator,
};
pub use application::use_cases::{
    CancelOrderUseCase, ModifyOrderUseCase, OrderQueries, OrderUpdate, SubmitOrderUseCase,
};
pub use config::EngineConfig;
pub use error::EngineError;

// Infrastructure re-exports
pub use infrastructure::executor::SimTradeExecutor;
pub use infrastructure::market_data::MockMarketDataFeed;
pub use infrastructure::notifier::{BroadcastEventNotifier, TracingEventNotifier};
pub use infrastructure::persistence::InMemoryOrderStore;
pub use infrastructure::risk::{CashPositionRiskValidator, InMemoryPortfolios};
