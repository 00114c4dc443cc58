//! Mock aggregator for dev networks and tests
//!
//! Mirrors the shape of Chainlink's `MockV3Aggregator`: constructed with a
//! precision and an initial answer, every `update_answer` opens and closes a
//! new round.

use chrono::{DateTime, Utc};
use fundme_core::Address;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use crate::error::OracleError;
use crate::types::{AggregatorV3, RoundData};

/// Mock ETH/USD aggregator
///
/// Rounds live behind a `RwLock` so a shared handle (`Arc<MockAggregator>`)
/// can be updated while a ledger is reading from it.
pub struct MockAggregator {
    address: Address,
    decimals: u8,
    rounds: RwLock<Rounds>,
}

#[derive(Default)]
struct Rounds {
    latest_round: u64,
    history: HashMap<u64, RoundData>,
    offline: bool,
}

impl MockAggregator {
    pub const VERSION: u64 = 0;

    /// Create a mock feed with one completed round holding `initial_answer`
    pub fn new(address: Address, decimals: u8, initial_answer: i128) -> Self {
        let mock = Self {
            address,
            decimals,
            rounds: RwLock::new(Rounds::default()),
        };
        mock.update_answer(initial_answer);
        mock
    }

    /// Publish a new answer as the next round, stamped now
    pub fn update_answer(&self, answer: i128) {
        let mut rounds = self.rounds.write().unwrap_or_else(PoisonError::into_inner);
        let round_id = rounds.latest_round + 1;
        let now = Utc::now();
        rounds.latest_round = round_id;
        rounds.history.insert(
            round_id,
            RoundData {
                round_id,
                answer,
                started_at: now,
                updated_at: Some(now),
                answered_in_round: round_id,
            },
        );
    }

    /// Overwrite a round verbatim and make it the latest
    pub fn update_round_data(&self, round: RoundData) {
        let mut rounds = self.rounds.write().unwrap_or_else(PoisonError::into_inner);
        rounds.latest_round = round.round_id;
        rounds.history.insert(round.round_id, round);
    }

    /// Publish an answer with an explicit update time (for staleness tests)
    pub fn update_answer_at(&self, answer: i128, updated_at: DateTime<Utc>) {
        let round_id = self.latest_round() + 1;
        self.update_round_data(RoundData {
            round_id,
            answer,
            started_at: updated_at,
            updated_at: Some(updated_at),
            answered_in_round: round_id,
        });
    }

    /// Simulate the feed going offline (`false`) or recovering (`true`)
    pub fn set_available(&self, available: bool) {
        let mut rounds = self.rounds.write().unwrap_or_else(PoisonError::into_inner);
        rounds.offline = !available;
    }

    pub fn latest_round(&self) -> u64 {
        self.rounds
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .latest_round
    }

    /// Answer of the latest round, if any
    pub fn latest_answer(&self) -> Option<i128> {
        let rounds = self.rounds.read().unwrap_or_else(PoisonError::into_inner);
        rounds.history.get(&rounds.latest_round).map(|r| r.answer)
    }

    /// Historical round lookup
    pub fn get_round_data(&self, round_id: u64) -> Result<RoundData, OracleError> {
        let rounds = self.rounds.read().unwrap_or_else(PoisonError::into_inner);
        rounds
            .history
            .get(&round_id)
            .cloned()
            .ok_or(OracleError::RoundNotFound {
                feed: self.address,
                round_id,
            })
    }
}

impl AggregatorV3 for MockAggregator {
    fn address(&self) -> Address {
        self.address
    }

    fn decimals(&self) -> u8 {
        self.decimals
    }

    fn description(&self) -> String {
        "ETH / USD (mock)".to_string()
    }

    fn version(&self) -> u64 {
        Self::VERSION
    }

    fn latest_round_data(&self) -> Result<RoundData, OracleError> {
        let rounds = self.rounds.read().unwrap_or_else(PoisonError::into_inner);
        if rounds.offline {
            return Err(OracleError::ConnectionFailed {
                source: Box::new(std::io::Error::new(
                    std::io::ErrorKind::NotConnected,
                    format!("mock aggregator {} is offline", self.address),
                )),
            });
        }

        rounds
            .history
            .get(&rounds.latest_round)
            .cloned()
            .ok_or(OracleError::NoData { feed: self.address })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed() -> Address {
        Address::repeat_byte(0xfe)
    }

    #[test]
    fn test_initial_round() {
        let mock = MockAggregator::new(feed(), 8, 200_000_000);
        let round = mock.latest_round_data().unwrap();

        assert_eq!(round.round_id, 1);
        assert_eq!(round.answer, 200_000_000);
        assert_eq!(round.answered_in_round, 1);
        assert!(round.updated_at.is_some());
        assert_eq!(mock.decimals(), 8);
        assert_eq!(mock.version(), 0);
    }

    #[test]
    fn test_update_answer_opens_new_round() {
        let mock = MockAggregator::new(feed(), 8, 200_000_000);
        mock.update_answer(300_000_000);

        assert_eq!(mock.latest_round(), 2);
        assert_eq!(mock.latest_answer(), Some(300_000_000));
        assert_eq!(mock.get_round_data(1).unwrap().answer, 200_000_000);
    }

    #[test]
    fn test_round_not_found() {
        let mock = MockAggregator::new(feed(), 8, 1);
        let result = mock.get_round_data(42);
        assert!(matches!(
            result,
            Err(OracleError::RoundNotFound { round_id: 42, .. })
        ));
    }

    #[test]
    fn test_offline_and_recovery() {
        let mock = MockAggregator::new(feed(), 8, 1);

        mock.set_available(false);
        assert!(matches!(
            mock.latest_round_data(),
            Err(OracleError::ConnectionFailed { .. })
        ));

        mock.set_available(true);
        assert!(mock.latest_round_data().is_ok());
    }

    #[test]
    fn test_update_round_data_verbatim() {
        let mock = MockAggregator::new(feed(), 8, 1);
        let now = Utc::now();
        mock.update_round_data(RoundData {
            round_id: 10,
            answer: 5,
            started_at: now,
            updated_at: None,
            answered_in_round: 9,
        });

        let round = mock.latest_round_data().unwrap();
        assert_eq!(round.round_id, 10);
        assert_eq!(round.updated_at, None);
        assert_eq!(round.answered_in_round, 9);
    }
}
