//! Wei - Non-negative native-asset amount
//!
//! Amounts are integers counted in the smallest native unit (1 ether = 10^18 wei).
//! An unsigned inner value makes negative amounts unrepresentable.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Decimal places of the native asset
pub const ETHER_DECIMALS: u32 = 18;

/// Wei in one ether
pub const WEI_PER_ETHER: u128 = 1_000_000_000_000_000_000;

/// Errors that can occur when working with amounts
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AmountError {
    #[error("Amount cannot be negative: {0}")]
    NegativeAmount(Decimal),

    #[error("Amount has more than 18 decimal places: {0}")]
    TooPrecise(Decimal),

    #[error("Amount out of range: {0}")]
    OutOfRange(String),

    #[error("Invalid amount: {0}")]
    InvalidFormat(String),
}

/// Native-asset amount in wei.
///
/// # Example
/// ```
/// use fundme_core::Wei;
/// use rust_decimal::Decimal;
///
/// let amount = Wei::from_ether(Decimal::new(25, 3)).unwrap(); // 0.025 ether
/// assert_eq!(amount.value(), 25_000_000_000_000_000);
///
/// // Negative amounts are rejected
/// assert!(Wei::from_ether(Decimal::new(-1, 0)).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Wei(u128);

impl Wei {
    /// Zero amount constant
    pub const ZERO: Self = Self(0);

    /// Largest representable amount
    pub const MAX: Self = Self(u128::MAX);

    #[inline]
    pub const fn new(wei: u128) -> Self {
        Self(wei)
    }

    /// Whole ether to wei, `None` on overflow
    pub fn ether(whole: u64) -> Option<Self> {
        (whole as u128).checked_mul(WEI_PER_ETHER).map(Self)
    }

    /// Convert a decimal ether quantity (e.g. `0.025`) to wei.
    ///
    /// The quantity must be non-negative and exact to 18 decimal places.
    pub fn from_ether(ether: Decimal) -> Result<Self, AmountError> {
        if ether < Decimal::ZERO {
            return Err(AmountError::NegativeAmount(ether));
        }
        if ether.normalize().scale() > ETHER_DECIMALS {
            return Err(AmountError::TooPrecise(ether));
        }

        let whole = ether.trunc();
        let fraction = ether - whole;

        let whole_wei = whole
            .to_u128()
            .and_then(|w| w.checked_mul(WEI_PER_ETHER))
            .ok_or_else(|| AmountError::OutOfRange(ether.to_string()))?;

        // fraction < 1, so fraction * 10^18 < 10^18 fits a Decimal mantissa
        let fraction_wei = (fraction * Decimal::from(WEI_PER_ETHER as u64))
            .to_u128()
            .ok_or_else(|| AmountError::OutOfRange(ether.to_string()))?;

        whole_wei
            .checked_add(fraction_wei)
            .map(Self)
            .ok_or_else(|| AmountError::OutOfRange(ether.to_string()))
    }

    /// Render as a decimal ether string without trailing zeros
    pub fn to_ether_string(&self) -> String {
        let whole = self.0 / WEI_PER_ETHER;
        let fraction = self.0 % WEI_PER_ETHER;
        if fraction == 0 {
            return whole.to_string();
        }
        let digits = format!("{:018}", fraction);
        format!("{}.{}", whole, digits.trim_end_matches('0'))
    }

    /// Get the inner wei value
    #[inline]
    pub const fn value(&self) -> u128 {
        self.0
    }

    pub fn checked_add(&self, other: Wei) -> Option<Wei> {
        self.0.checked_add(other.0).map(Wei)
    }
}

impl fmt::Display for Wei {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Wei {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u128>()
            .map(Self)
            .map_err(|_| AmountError::InvalidFormat(s.to_string()))
    }
}

impl TryFrom<String> for Wei {
    type Error = AmountError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Wei> for String {
    fn from(amount: Wei) -> Self {
        amount.0.to_string()
    }
}

impl From<u128> for Wei {
    fn from(wei: u128) -> Self {
        Self(wei)
    }
}

impl From<Wei> for u128 {
    fn from(amount: Wei) -> Self {
        amount.0
    }
}
