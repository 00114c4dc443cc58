//! FundMe Core - Domain types
//!
//! This crate contains the fundamental types shared by every FundMe crate:
//! - `Address`: 20-byte account identity (owner, contributors, price feeds)
//! - `Wei`: Non-negative native-asset amount in its smallest unit

pub mod address;
pub mod amount;

pub use address::{Address, AddressError};
pub use amount::{AmountError, Wei, ETHER_DECIMALS, WEI_PER_ETHER};
