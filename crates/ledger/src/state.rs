//! Ledger state and its transitions

use fundme_core::{Address, Wei};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::LedgerError;
use crate::event::LedgerEvent;

/// State of one deployed ledger
///
/// # Invariant
/// `balance == sum(contributions)` after every committed operation, and every
/// entry of `contributors` is a key of `contributions`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerState {
    /// Set at construction, never changes
    pub owner: Address,
    /// Bound feed reference, never changes
    pub price_feed: Address,
    /// Cumulative amount per contributor (zeroed, not removed, on withdrawal)
    pub contributions: HashMap<Address, Wei>,
    /// One entry per accepted contribution, in call order
    pub contributors: Vec<Address>,
    pub balance: Wei,
}

impl LedgerState {
    pub fn new(owner: Address, price_feed: Address) -> Self {
        Self {
            owner,
            price_feed,
            contributions: HashMap::new(),
            contributors: Vec::new(),
            balance: Wei::ZERO,
        }
    }

    /// Amount recorded for `contributor` (zero if unknown)
    pub fn contribution(&self, contributor: &Address) -> Wei {
        self.contributions
            .get(contributor)
            .copied()
            .unwrap_or(Wei::ZERO)
    }

    /// Sum of all recorded contributions
    pub fn total_contributions(&self) -> Option<Wei> {
        self.contributions
            .values()
            .try_fold(Wei::ZERO, |acc, amount| acc.checked_add(*amount))
    }

    /// Check the balance and membership invariants
    pub fn is_consistent(&self) -> bool {
        self.total_contributions() == Some(self.balance)
            && self
                .contributors
                .iter()
                .all(|c| self.contributions.contains_key(c))
    }

    /// Apply an already-validated event.
    ///
    /// On error `self` may be partially modified; callers run this on a
    /// staged copy.
    pub(crate) fn apply(&mut self, event: &LedgerEvent) -> Result<(), LedgerError> {
        match event {
            LedgerEvent::Funded {
                contributor,
                amount,
            } => {
                let recorded = self.contribution(contributor);
                let recorded = recorded.checked_add(*amount).ok_or(LedgerError::Overflow {
                    operation: "contribution total",
                })?;
                self.balance = self.balance.checked_add(*amount).ok_or(LedgerError::Overflow {
                    operation: "ledger balance",
                })?;
                self.contributions.insert(*contributor, recorded);
                self.contributors.push(*contributor);
            }
            LedgerEvent::Withdrawn { owner, amount } => {
                if *owner != self.owner {
                    return Err(LedgerError::NotOwner { caller: *owner });
                }
                if *amount != self.balance {
                    return Err(LedgerError::InconsistentReplay {
                        expected: self.balance,
                        actual: *amount,
                    });
                }
                for contributor in &self.contributors {
                    self.contributions.insert(*contributor, Wei::ZERO);
                }
                self.contributors.clear();
                self.balance = Wei::ZERO;
            }
        }
        Ok(())
    }
}
