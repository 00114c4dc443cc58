//! Journal errors

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EventError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid record in {file} line {line}: {reason}")]
    InvalidRecord {
        file: String,
        line: usize,
        reason: String,
    },

    /// A sealed record that does not extend the journal head
    #[error("Record {sequence} does not follow the journal head (expected {expected_sequence})")]
    OutOfOrder { expected_sequence: u64, sequence: u64 },
}
