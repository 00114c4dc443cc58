//! Journal records

use chrono::{DateTime, Utc};
use fundme_ledger::LedgerEvent;
use serde::{Deserialize, Serialize};

use crate::hash::{calculate_record_hash, GENESIS_HASH};

/// One committed ledger event with its position in the hash chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalRecord {
    /// 1-based, strictly increasing
    pub sequence: u64,
    /// Hash of the previous record, `GENESIS` for the first
    pub prev_hash: String,
    /// SHA-256 (hex) over every other field
    pub hash: String,
    pub timestamp: DateTime<Utc>,
    pub correlation_id: String,
    pub event: LedgerEvent,
}

impl JournalRecord {
    /// Seal `event` as the record following `prev` (or the first record)
    pub fn next(
        prev: Option<&JournalRecord>,
        correlation_id: impl Into<String>,
        event: LedgerEvent,
    ) -> Self {
        let (sequence, prev_hash) = match prev {
            Some(p) => (p.sequence + 1, p.hash.clone()),
            None => (1, GENESIS_HASH.to_string()),
        };
        Self::seal(sequence, prev_hash, correlation_id, event, Utc::now())
    }

    pub fn seal(
        sequence: u64,
        prev_hash: impl Into<String>,
        correlation_id: impl Into<String>,
        event: LedgerEvent,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let mut record = Self {
            sequence,
            prev_hash: prev_hash.into(),
            hash: String::new(),
            timestamp,
            correlation_id: correlation_id.into(),
            event,
        };
        record.hash = calculate_record_hash(&record);
        record
    }
}
