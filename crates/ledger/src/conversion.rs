//! ETH -> USD conversion in fixed point
//!
//! Wei carries 18 decimals and the feed answer carries `decimals`, so
//! `amount * price / 10^decimals` is a dollar value with 18 decimals no
//! matter what precision the feed reports.

use fundme_core::{AmountError, Wei};
use fundme_oracle::PriceQuote;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::LedgerError;

/// Decimal places of `Usd`
pub const USD_DECIMALS: u32 = 18;

const USD_SCALE: u128 = 1_000_000_000_000_000_000;

/// Smallest accepted contribution: 50 USD
pub const MINIMUM_USD: Usd = Usd(50 * USD_SCALE);

/// Dollar value scaled by 10^18
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Usd(u128);

impl Usd {
    pub const ZERO: Self = Self(0);

    #[inline]
    pub const fn new(scaled: u128) -> Self {
        Self(scaled)
    }

    /// Whole dollars, `None` on overflow
    pub fn dollars(whole: u64) -> Option<Self> {
        (whole as u128).checked_mul(USD_SCALE).map(Self)
    }

    /// Exact decimal dollars (e.g. `49.99`)
    pub fn from_dollars(dollars: Decimal) -> Result<Self, AmountError> {
        // Same 18-decimal fixed point as ether
        Wei::from_ether(dollars).map(|w| Self(w.value()))
    }

    #[inline]
    pub const fn value(&self) -> u128 {
        self.0
    }
}

impl fmt::Display for Usd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Wei::new(self.0).to_ether_string())
    }
}

impl FromStr for Usd {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let dollars = Decimal::from_str_exact(s.trim())
            .map_err(|_| AmountError::InvalidFormat(s.to_string()))?;
        Self::from_dollars(dollars)
    }
}

impl TryFrom<String> for Usd {
    type Error = AmountError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Usd> for String {
    fn from(usd: Usd) -> Self {
        usd.to_string()
    }
}

/// USD value of `amount` at `quote`
pub fn usd_value(amount: Wei, quote: &PriceQuote) -> Result<Usd, LedgerError> {
    let scale = quote.scale().ok_or(LedgerError::Overflow {
        operation: "price scale",
    })?;

    amount
        .value()
        .checked_mul(quote.price)
        .map(|product| Usd(product / scale))
        .ok_or(LedgerError::Overflow {
            operation: "usd conversion",
        })
}
