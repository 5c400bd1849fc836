//! Engine configuration.
//!
//! Typed configuration with defaults; the binary overrides from
//! `ENGINE_*` environment variables.

use std::time::Duration;

use rust_decimal::Decimal;

/// Configuration for the lifecycle engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Interval between monitoring passes.
    pub monitoring_interval: Duration,
    /// Interval between expiration passes.
    pub expiration_interval: Duration,
    /// Commission rate applied to executed notional (0.001 = 10 bps).
    pub commission_rate: Decimal,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            monitoring_interval: Duration::from_secs(30),
            expiration_interval: Duration::from_secs(24 * 60 * 60),
            commission_rate: Decimal::new(1, 3),
        }
    }
}

impl EngineConfig {
    /// Build configuration from `ENGINE_*` environment variables, falling
    /// back to defaults for unset or unparsable values.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let secs = |key: &str, fallback: Duration| {
            std::env::var(key)
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .map_or(fallback, Duration::from_secs)
        };

        let commission_rate = std::env::var("ENGINE_COMMISSION_RATE")
            .ok()
            .and_then(|v| v.parse::<Decimal>().ok())
            .unwrap_or(defaults.commission_rate);

        Self {
            monitoring_interval: secs(
                "ENGINE_MONITORING_INTERVAL_SECS",
                defaults.monitoring_interval,
            ),
            expiration_interval: secs(
                "ENGINE_EXPIRATION_INTERVAL_SECS",
                defaults.expiration_interval,
            ),
            commission_rate,
        }
    }
}
