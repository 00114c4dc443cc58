//! FundMe Price Oracle
//!
//! Provides the ETH/USD price consumed by the funding ledger.
//! `AggregatorV3` is the round-based external feed, `FeedAdapter` turns its
//! raw rounds into a bounds-checked `PriceQuote`. `MockAggregator` stands in
//! for the live feed on development networks and in tests.

mod adapter;
mod error;
mod mock;
mod types;

pub use adapter::{FeedAdapter, MAX_FEED_DECIMALS};
pub use error::OracleError;
pub use mock::MockAggregator;
pub use types::{AggregatorV3, PriceFeed, PriceQuote, RoundData};
