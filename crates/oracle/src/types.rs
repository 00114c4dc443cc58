//! Core oracle types

use chrono::{DateTime, Utc};
use fundme_core::Address;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::OracleError;

/// One round reported by an aggregator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundData {
    pub round_id: u64,
    /// Raw answer scaled by `10^decimals`; signed because feeds may report garbage
    pub answer: i128,
    pub started_at: DateTime<Utc>,
    /// `None` while the round is still open
    pub updated_at: Option<DateTime<Utc>>,
    pub answered_in_round: u64,
}

/// A validated price: `price / 10^decimals` USD per unit of the native asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceQuote {
    pub price: u128,
    pub decimals: u8,
}

impl PriceQuote {
    pub fn new(price: u128, decimals: u8) -> Self {
        Self { price, decimals }
    }

    /// `10^decimals`, `None` if it does not fit u128
    pub fn scale(&self) -> Option<u128> {
        10u128.checked_pow(self.decimals as u32)
    }
}

impl fmt::Display for PriceQuote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.scale() {
            Some(scale) if self.decimals > 0 => write!(
                f,
                "{}.{:0width$}",
                self.price / scale,
                self.price % scale,
                width = self.decimals as usize
            ),
            _ => write!(f, "{}", self.price),
        }
    }
}

/// Round-based external price feed (Chainlink `AggregatorV3Interface` shape)
///
/// Implementations can be:
/// - MockAggregator: fixed, updatable answers for dev networks and tests
/// - an RPC-backed client reading a deployed aggregator contract
pub trait AggregatorV3: Send + Sync {
    /// Address the feed is deployed at
    fn address(&self) -> Address;

    /// Decimal places of `answer`
    fn decimals(&self) -> u8;

    fn description(&self) -> String;

    fn version(&self) -> u64;

    /// Most recent round known to the feed
    fn latest_round_data(&self) -> Result<RoundData, OracleError>;
}

impl<A: AggregatorV3 + ?Sized> AggregatorV3 for Arc<A> {
    fn address(&self) -> Address {
        (**self).address()
    }

    fn decimals(&self) -> u8 {
        (**self).decimals()
    }

    fn description(&self) -> String {
        (**self).description()
    }

    fn version(&self) -> u64 {
        (**self).version()
    }

    fn latest_round_data(&self) -> Result<RoundData, OracleError> {
        (**self).latest_round_data()
    }
}

/// Price source consumed by the funding ledger
pub trait PriceFeed: Send + Sync {
    /// Reference the ledger records as its bound feed
    fn address(&self) -> Address;

    /// Latest ETH/USD price with its precision
    fn latest_price(&self) -> Result<PriceQuote, OracleError>;
}

impl<P: PriceFeed + ?Sized> PriceFeed for Arc<P> {
    fn address(&self) -> Address {
        (**self).address()
    }

    fn latest_price(&self) -> Result<PriceQuote, OracleError> {
        (**self).latest_price()
    }
}
