//! Ledger events
//!
//! Emitted after a successful `fund` or `withdraw`. The same events rebuild
//! a ledger when replayed from the journal.

use fundme_core::{Address, Wei};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LedgerEvent {
    /// A contribution was accepted
    Funded { contributor: Address, amount: Wei },

    /// The owner swept the pooled balance
    Withdrawn { owner: Address, amount: Wei },
}

/// Event discriminant, used in logs and record hashes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum EventKind {
    Funded,
    Withdrawn,
}

impl LedgerEvent {
    pub fn funded(contributor: Address, amount: Wei) -> Self {
        Self::Funded {
            contributor,
            amount,
        }
    }

    pub fn withdrawn(owner: Address, amount: Wei) -> Self {
        Self::Withdrawn { owner, amount }
    }

    pub fn kind(&self) -> EventKind {
        match self {
            Self::Funded { .. } => EventKind::Funded,
            Self::Withdrawn { .. } => EventKind::Withdrawn,
        }
    }

    /// Account the event is about
    pub fn account(&self) -> Address {
        match self {
            Self::Funded { contributor, .. } => *contributor,
            Self::Withdrawn { owner, .. } => *owner,
        }
    }

    pub fn amount(&self) -> Wei {
        match self {
            Self::Funded { amount, .. } | Self::Withdrawn { amount, .. } => *amount,
        }
    }
}
