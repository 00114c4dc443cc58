//! Ledger errors

use fundme_core::{Address, Wei};
use fundme_oracle::OracleError;
use thiserror::Error;

use crate::conversion::Usd;
use crate::payout::PayoutError;

/// Errors that can occur in ledger operations
///
/// Every variant aborts the whole operation; state is left exactly as it
/// was before the call.
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Insufficient contribution: worth {usd_value} USD, minimum is {minimum_usd} USD")]
    InsufficientContribution { usd_value: Usd, minimum_usd: Usd },

    #[error("Caller {caller} is not the owner")]
    NotOwner { caller: Address },

    #[error("Oracle unavailable: {0}")]
    OracleUnavailable(#[from] OracleError),

    #[error("Transfer of {amount} wei to {recipient} failed: {source}")]
    TransferFailed {
        recipient: Address,
        amount: Wei,
        #[source]
        source: PayoutError,
    },

    #[error("Contributor index {index} out of range (len {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Arithmetic overflow in {operation}")]
    Overflow { operation: &'static str },

    #[error("Replayed withdrawal of {actual} wei does not match balance {expected} wei")]
    InconsistentReplay { expected: Wei, actual: Wei },
}
