//! Lifecycle Engine Binary
//!
//! Starts the order lifecycle engine with in-memory adapters (paper mode):
//! the scheduler runs its monitoring and expiration passes against the
//! simulated trade executor until interrupted.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin lifecycle-engine
//! ```
//!
//! # Environment Variables
//!
//! - `ENGINE_MONITORING_INTERVAL_SECS`: monitoring pass cadence (default: 30)
//! - `ENGINE_EXPIRATION_INTERVAL_SECS`: expiration pass cadence (default: 86400)
//! - `ENGINE_COMMISSION_RATE`: commission rate on notional (default: 0.001)
//! - `ENGINE_PORTFOLIO_CASH`: seeded cash for the default portfolio (default: 100000)
//! - `RUST_LOG`: log level (default: info)

use std::collections::HashMap;
use std::sync::Arc;

use rust_decimal::Decimal;
use tokio::signal;
use tokio_util::sync::CancellationToken;

use lifecycle_engine::application::ports::PortfolioSnapshot;
use lifecycle_engine::{
    CashPositionRiskValidator, EngineConfig, ExecutionCoordinator, InMemoryOrderStore,
    InMemoryPortfolios, LifecycleScheduler, MockMarketDataFeed, Money, PortfolioId,
    SimTradeExecutor, TracingEventNotifier,
};

/// Default portfolio id seeded at startup.
const DEFAULT_PORTFOLIO: &str = "default";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    init_tracing();

    tracing::info!("Starting lifecycle engine");

    let config = EngineConfig::from_env();
    tracing::info!(
        monitoring_interval_secs = config.monitoring_interval.as_secs(),
        expiration_interval_secs = config.expiration_interval.as_secs(),
        commission_rate = %config.commission_rate,
        "Configuration loaded"
    );

    let store = Arc::new(InMemoryOrderStore::new());
    let feed = Arc::new(MockMarketDataFeed::new());
    let risk = Arc::new(CashPositionRiskValidator::new(Arc::clone(&feed)));
    let portfolios = Arc::new(seed_portfolios());
    let executor = Arc::new(SimTradeExecutor::new());
    let notifier = Arc::new(TracingEventNotifier);

    let coordinator = Arc::new(ExecutionCoordinator::new(
        Arc::clone(&store),
        Arc::clone(&feed),
        risk,
        portfolios,
        executor,
        Arc::clone(&notifier),
        config.commission_rate,
    ));

    let shutdown = CancellationToken::new();
    let scheduler = Arc::new(LifecycleScheduler::new(
        store,
        feed,
        coordinator,
        notifier,
        config,
        shutdown.clone(),
    ));
    scheduler.start();

    tracing::info!("Lifecycle engine ready");

    wait_for_shutdown().await;
    shutdown.cancel();

    tracing::info!("Lifecycle engine stopped");
    Ok(())
}

/// Initialize the tracing subscriber with environment filter.
#[allow(clippy::expect_used)]
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(
                "lifecycle_engine=info"
                    .parse()
                    .expect("static directive 'lifecycle_engine=info' is valid"),
            ),
        )
        .init();
}

/// Seed the default portfolio from environment overrides.
fn seed_portfolios() -> InMemoryPortfolios {
    let cash = std::env::var("ENGINE_PORTFOLIO_CASH")
        .ok()
        .and_then(|v| v.parse::<Decimal>().ok())
        .unwrap_or_else(|| Decimal::new(100_000, 0));

    let portfolios = InMemoryPortfolios::new();
    portfolios.upsert(PortfolioSnapshot {
        portfolio_id: PortfolioId::new(DEFAULT_PORTFOLIO),
        cash: Money::new(cash),
        positions: HashMap::new(),
    });

    tracing::info!(portfolio_id = DEFAULT_PORTFOLIO, cash = %cash, "Portfolio seeded");
    portfolios
}

/// Wait for shutdown signal (SIGTERM or SIGINT).
///
/// # Panics
///
/// Panics if signal handlers cannot be installed; the process could not
/// respond to termination signals otherwise.
#[allow(clippy::expect_used)]
async fn wait_for_shutdown() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("signal handler installation is critical for graceful shutdown");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("SIGTERM handler installation is critical for graceful shutdown")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, initiating shutdown");
        }
    }
}
