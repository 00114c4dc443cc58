//! Value transfer to the withdrawing owner

use fundme_core::{Address, Wei};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

/// Errors raised by a payout
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PayoutError {
    #[error("Recipient {0} does not accept funds")]
    Rejected(Address),

    #[error("Recipient {0} balance would overflow")]
    Overflow(Address),
}

/// Moves value out of the ledger.
///
/// A payout either transfers the full amount or fails without effect.
pub trait Payout {
    fn pay(&mut self, to: Address, amount: Wei) -> Result<(), PayoutError>;
}

impl<P: Payout + ?Sized> Payout for Box<P> {
    fn pay(&mut self, to: Address, amount: Wei) -> Result<(), PayoutError> {
        (**self).pay(to, amount)
    }
}

/// Payout book kept in memory
///
/// Credits recipients and can be told to refuse specific recipients.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPayout {
    credited: HashMap<Address, Wei>,
    rejecting: HashSet<Address>,
}

impl InMemoryPayout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `recipient` refuse incoming value
    pub fn reject(&mut self, recipient: Address) {
        self.rejecting.insert(recipient);
    }

    pub fn accept(&mut self, recipient: Address) {
        self.rejecting.remove(&recipient);
    }

    /// Total received by `recipient`
    pub fn credited(&self, recipient: &Address) -> Wei {
        self.credited.get(recipient).copied().unwrap_or(Wei::ZERO)
    }
}

impl Payout for InMemoryPayout {
    fn pay(&mut self, to: Address, amount: Wei) -> Result<(), PayoutError> {
        if self.rejecting.contains(&to) {
            return Err(PayoutError::Rejected(to));
        }

        let current = self.credited(&to);
        let updated = current
            .checked_add(amount)
            .ok_or(PayoutError::Overflow(to))?;
        self.credited.insert(to, updated);
        Ok(())
    }
}
