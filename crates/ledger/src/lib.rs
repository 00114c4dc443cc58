//! FundMe Ledger - Pooled contributions behind a USD minimum
//!
//! All state changes of a deployment go through `FundingLedger`.
//!
//! # Key Types
//! - `FundingLedger`: accepts contributions, enforces owner-only withdrawal
//! - `LedgerState`: owner, feed reference, per-contributor totals, pooled balance
//! - `LedgerEvent`: `Funded` / `Withdrawn` notifications, also the replay unit
//! - `Payout`: how the pooled balance reaches the owner
//! - `Usd`: 18-decimal fixed-point dollar value

pub mod config;
pub mod conversion;
pub mod error;
pub mod event;
pub mod funding;
pub mod payout;
pub mod state;

pub use config::LedgerConfig;
pub use conversion::{usd_value, Usd, MINIMUM_USD, USD_DECIMALS};
pub use error::LedgerError;
pub use event::{EventKind, LedgerEvent};
pub use funding::FundingLedger;
pub use payout::{InMemoryPayout, Payout, PayoutError};
pub use state::LedgerState;
