//! Persisted deployment descriptor (`deployment.json`)

use chrono::{DateTime, Utc};
use fundme_core::Address;
use fundme_ledger::LedgerConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::context::ContextError;

/// Mock aggregator parameters, restored on every open
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MockFeed {
    pub decimals: u8,
    pub answer: i128,
}

/// Binding of owner, network and feed for one ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deployment {
    pub network: String,
    pub chain_id: u64,
    pub owner: Address,
    pub price_feed: Address,
    pub mock_feed: MockFeed,
    #[serde(default)]
    pub ledger: LedgerConfig,
    pub deployed_at: DateTime<Utc>,
}

impl Deployment {
    pub fn load(path: &Path) -> Result<Self, ContextError> {
        let bytes = std::fs::read(path)?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    pub fn save(&self, path: &Path) -> Result<(), ContextError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}
