//! In-memory portfolio provider.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::application::ports::{PortfolioProvider, PortfolioSnapshot};
use crate::domain::shared::PortfolioId;

/// In-memory portfolio snapshots, keyed by portfolio id.
#[derive(Debug, Default)]
pub struct InMemoryPortfolios {
    snapshots: RwLock<HashMap<String, PortfolioSnapshot>>,
}

impl InMemoryPortfolios {
    /// Create an empty provider.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a portfolio snapshot.
    pub fn upsert(&self, snapshot: PortfolioSnapshot) {
        self.snapshots
            .write()
            .insert(snapshot.portfolio_id.as_str().to_string(), snapshot);
    }
}

#[async_trait]
impl PortfolioProvider for InMemoryPortfolios {
    async fn fetch(&self, portfolio_id: &PortfolioId) -> Option<PortfolioSnapshot> {
        self.snapshots.read().get(portfolio_id.as_str()).cloned()
    }
}
