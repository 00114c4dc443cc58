//! Price feed adapter
//!
//! Passthrough from a raw aggregator round to a typed `PriceQuote`. Nothing
//! is cached: every call reads the feed's latest round.

use chrono::{Duration, Utc};
use fundme_core::Address;
use tracing::debug;

use crate::error::OracleError;
use crate::types::{AggregatorV3, PriceFeed, PriceQuote};

/// Largest precision whose scale `10^decimals` still fits in u128
pub const MAX_FEED_DECIMALS: u8 = 38;

/// Bounds-checking adapter over an aggregator
#[derive(Debug, Clone)]
pub struct FeedAdapter<A> {
    aggregator: A,
    max_age: Option<Duration>,
}

impl<A: AggregatorV3> FeedAdapter<A> {
    /// Adapter without an age limit
    pub fn new(aggregator: A) -> Self {
        Self {
            aggregator,
            max_age: None,
        }
    }

    /// Reject answers last updated longer ago than `max_age`
    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age = Some(max_age);
        self
    }

    pub fn aggregator(&self) -> &A {
        &self.aggregator
    }

    pub fn max_age(&self) -> Option<Duration> {
        self.max_age
    }
}

impl<A: AggregatorV3> PriceFeed for FeedAdapter<A> {
    fn address(&self) -> Address {
        self.aggregator.address()
    }

    fn latest_price(&self) -> Result<PriceQuote, OracleError> {
        let feed = self.aggregator.address();
        let decimals = self.aggregator.decimals();
        if decimals > MAX_FEED_DECIMALS {
            return Err(OracleError::InvalidPrice {
                feed,
                reason: format!("{} decimals exceeds {}", decimals, MAX_FEED_DECIMALS),
            });
        }

        let round = self.aggregator.latest_round_data()?;

        let updated_at = round.updated_at.ok_or(OracleError::NoData { feed })?;

        if round.answered_in_round < round.round_id {
            return Err(OracleError::StaleRound {
                feed,
                round_id: round.round_id,
                answered_in_round: round.answered_in_round,
            });
        }

        if let Some(max_age) = self.max_age {
            if Utc::now().signed_duration_since(updated_at) > max_age {
                return Err(OracleError::StalePrice {
                    feed,
                    last_update: updated_at,
                    threshold_secs: max_age.num_seconds().max(0) as u64,
                });
            }
        }

        if round.answer <= 0 {
            return Err(OracleError::InvalidPrice {
                feed,
                reason: format!("non-positive answer {}", round.answer),
            });
        }

        // answer > 0, so the conversion cannot fail
        let price = round.answer as u128;

        debug!(%feed, round_id = round.round_id, price, decimals, "Read latest price");

        Ok(PriceQuote { price, decimals })
    }
}
