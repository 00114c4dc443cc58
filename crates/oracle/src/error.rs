//! Oracle error types

use chrono::{DateTime, Utc};
use fundme_core::Address;
use thiserror::Error;

/// Oracle-related errors
///
/// Every variant means the feed cannot currently be trusted; callers treat
/// them all as "oracle unavailable".
#[derive(Debug, Error)]
pub enum OracleError {
    /// The feed has no completed round yet
    #[error("No price data available from feed {feed}")]
    NoData { feed: Address },

    /// Requested historical round does not exist
    #[error("Round {round_id} not found on feed {feed}")]
    RoundNotFound { feed: Address, round_id: u64 },

    /// Latest answer was carried over from an earlier round
    #[error("Stale round on feed {feed}: round {round_id} answered in round {answered_in_round}")]
    StaleRound {
        feed: Address,
        round_id: u64,
        answered_in_round: u64,
    },

    /// Price data is older than the configured threshold
    #[error("Stale price from {feed}: last update was {last_update}, threshold is {threshold_secs}s")]
    StalePrice {
        feed: Address,
        last_update: DateTime<Utc>,
        threshold_secs: u64,
    },

    /// Price data is invalid
    #[error("Invalid price from {feed}: {reason}")]
    InvalidPrice { feed: Address, reason: String },

    /// External oracle connection failed
    #[error("Oracle connection failed: {source}")]
    ConnectionFailed {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}
