//! Ledger configuration
//!
//! Loaded from the deployment file; every field has a default so an empty
//! object is a valid configuration.

use serde::{Deserialize, Serialize};

use crate::conversion::{Usd, MINIMUM_USD};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Contributions worth less than this (in USD) are rejected
    #[serde(default = "default_minimum_usd")]
    pub minimum_usd: Usd,
}

fn default_minimum_usd() -> Usd {
    MINIMUM_USD
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            minimum_usd: default_minimum_usd(),
        }
    }
}

impl LedgerConfig {
    pub fn with_minimum_usd(mut self, minimum_usd: Usd) -> Self {
        self.minimum_usd = minimum_usd;
        self
    }
}
