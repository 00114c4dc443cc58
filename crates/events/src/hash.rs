//! Hash chain utilities for journal integrity

use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::record::JournalRecord;

/// `prev_hash` of the first record
pub const GENESIS_HASH: &str = "GENESIS";

/// Calculate SHA256 hash of record content (excluding the hash field itself)
pub fn calculate_record_hash(record: &JournalRecord) -> String {
    let mut hasher = Sha256::new();

    hasher.update(record.sequence.to_le_bytes());
    hasher.update(record.prev_hash.as_bytes());
    hasher.update(record.timestamp.to_rfc3339().as_bytes());
    hasher.update(record.correlation_id.as_bytes());

    hasher.update(record.event.kind().to_string().as_bytes());
    hasher.update(record.event.account().as_bytes());
    hasher.update(record.event.amount().value().to_le_bytes());

    hex::encode(hasher.finalize())
}

/// Verify hash chain integrity
pub fn verify_chain(records: &[JournalRecord]) -> Result<(), ChainError> {
    let mut prev_hash = GENESIS_HASH.to_string();

    for (i, record) in records.iter().enumerate() {
        let expected_sequence = i as u64 + 1;
        if record.sequence != expected_sequence {
            return Err(ChainError::InvalidSequence {
                expected: expected_sequence,
                actual: record.sequence,
            });
        }

        if record.prev_hash != prev_hash {
            return Err(ChainError::BrokenLink {
                sequence: record.sequence,
                expected: prev_hash,
                actual: record.prev_hash.clone(),
            });
        }

        let calculated = calculate_record_hash(record);
        if record.hash != calculated {
            return Err(ChainError::InvalidHash {
                sequence: record.sequence,
                expected: calculated,
                actual: record.hash.clone(),
            });
        }

        prev_hash = record.hash.clone();
    }

    Ok(())
}

/// Errors in hash chain verification
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChainError {
    #[error("Broken link at seq {sequence}: expected prev_hash '{expected}', got '{actual}'")]
    BrokenLink {
        sequence: u64,
        expected: String,
        actual: String,
    },

    #[error("Invalid hash at seq {sequence}: expected '{expected}', got '{actual}'")]
    InvalidHash {
        sequence: u64,
        expected: String,
        actual: String,
    },

    #[error("Invalid sequence: expected {expected}, got {actual}")]
    InvalidSequence { expected: u64, actual: u64 },
}

#[cfg(test)]
mod tests {
    use super::*;
    use fundme_core::{Address, Wei};
    use fundme_ledger::LedgerEvent;

    fn chain(len: u64) -> Vec<JournalRecord> {
        let mut records: Vec<JournalRecord> = Vec::new();
        for i in 0..len {
            let event = LedgerEvent::funded(Address::repeat_byte(1), Wei::new(100 + i as u128));
            let record = JournalRecord::next(records.last(), format!("test-{}", i), event);
            records.push(record);
        }
        records
    }

    #[test]
    fn test_hash_deterministic() {
        let record = &chain(1)[0];
        assert_eq!(calculate_record_hash(record), calculate_record_hash(record));
    }

    #[test]
    fn test_verify_valid_chain() {
        assert!(verify_chain(&chain(3)).is_ok());
        assert!(verify_chain(&[]).is_ok());
    }

    #[test]
    fn test_verify_broken_chain() {
        let mut records = chain(2);
        records[1].prev_hash = "wrong_hash".to_string();

        let result = verify_chain(&records);
        assert!(matches!(result, Err(ChainError::BrokenLink { sequence: 2, .. })));
    }

    #[test]
    fn test_tampered_amount_detected() {
        let mut records = chain(2);
        records[0].event = LedgerEvent::funded(Address::repeat_byte(1), Wei::new(1));

        let result = verify_chain(&records);
        assert!(matches!(result, Err(ChainError::InvalidHash { sequence: 1, .. })));
    }

    #[test]
    fn test_gap_in_sequence() {
        let mut records = chain(3);
        records.remove(1);

        let result = verify_chain(&records);
        assert!(matches!(
            result,
            Err(ChainError::InvalidSequence { expected: 2, actual: 3 })
        ));
    }
}
