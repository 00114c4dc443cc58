//! FundMe Events - JSONL journal
//!
//! Every committed ledger event is sealed into a hash-chained record and
//! appended to a daily JSONL file. The journal is the source of truth: a
//! ledger is rebuilt by replaying it.

pub mod error;
pub mod hash;
pub mod reader;
pub mod record;
pub mod store;

pub use error::EventError;
pub use hash::{calculate_record_hash, verify_chain, ChainError, GENESIS_HASH};
pub use reader::EventReader;
pub use record::JournalRecord;
pub use store::EventStore;
