//! Address - 20-byte account identity
//!
//! Owners, contributors and price feeds are all identified by an address.
//! The canonical text form is `0x` followed by 40 lowercase hex digits.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur when parsing addresses
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    #[error("Address must start with 0x: {0}")]
    MissingPrefix(String),

    #[error("Address must have 40 hex digits, got {0}")]
    InvalidLength(usize),

    #[error("Invalid hex in address: {0}")]
    InvalidHex(String),
}

/// Account identity
///
/// # Examples
/// ```
/// use fundme_core::Address;
///
/// let feed: Address = "0x8A753747A1Fa494EC906cE90E9f37563A8AF630e".parse().unwrap();
/// assert_eq!(feed.to_string(), "0x8a753747a1fa494ec906ce90e9f37563a8af630e");
///
/// // Missing prefix is rejected
/// assert!("8a753747a1fa494ec906ce90e9f37563a8af630e".parse::<Address>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address([u8; 20]);

impl Address {
    /// The zero address
    pub const ZERO: Self = Self([0u8; 20]);

    /// Number of bytes in an address
    pub const LEN: usize = 20;

    pub const fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Address made of one repeated byte (handy for fixtures)
    pub const fn repeat_byte(byte: u8) -> Self {
        Self([byte; 20])
    }

    #[inline]
    pub const fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .ok_or_else(|| AddressError::MissingPrefix(s.to_string()))?;

        if digits.len() != Self::LEN * 2 {
            return Err(AddressError::InvalidLength(digits.len()));
        }

        let mut bytes = [0u8; 20];
        hex::decode_to_slice(digits, &mut bytes)
            .map_err(|_| AddressError::InvalidHex(s.to_string()))?;

        Ok(Self(bytes))
    }
}

impl TryFrom<String> for Address {
    type Error = AddressError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.to_string()
    }
}
