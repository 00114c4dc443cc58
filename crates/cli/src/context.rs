//! Application context - wires everything together

use chrono::Utc;
use fundme_core::{Address, Wei};
use fundme_events::{verify_chain, ChainError, EventError, EventReader, EventStore, JournalRecord};
use fundme_ledger::{FundingLedger, InMemoryPayout, LedgerConfig, LedgerError};
use fundme_oracle::{FeedAdapter, MockAggregator};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

use crate::deployment::{Deployment, MockFeed};
use crate::network::{self, FeedSource, NetworkError};

/// Ledger type driven by the CLI
pub type DeployedLedger = FundingLedger<FeedAdapter<Arc<MockAggregator>>, InMemoryPayout>;

const DEPLOYMENT_FILE: &str = "deployment.json";
const JOURNAL_DIR: &str = "journal";

/// Application context - one deployed ledger and its journal
pub struct AppContext {
    pub ledger: DeployedLedger,
    aggregator: Arc<MockAggregator>,
    deployment: Deployment,
    journal: EventStore,
    deployment_path: PathBuf,
}

impl AppContext {
    /// Deploy a new ledger into `data_path`
    pub fn deploy(
        data_path: impl AsRef<Path>,
        network_name: &str,
        owner: Address,
        answer: Option<i128>,
        config: LedgerConfig,
    ) -> Result<Self, ContextError> {
        let data_path = data_path.as_ref();
        let deployment_path = data_path.join(DEPLOYMENT_FILE);
        if deployment_path.exists() {
            return Err(ContextError::AlreadyDeployed(deployment_path));
        }

        let network = network::lookup(network_name)?;
        let (price_feed, mock_feed) = match network.feed_source(answer)? {
            FeedSource::Mock {
                address,
                decimals,
                answer,
            } => (address, MockFeed { decimals, answer }),
            FeedSource::Live { address } => {
                return Err(ContextError::LiveNetwork {
                    network: network.name.to_string(),
                    feed: address,
                })
            }
        };

        std::fs::create_dir_all(data_path)?;
        let deployment = Deployment {
            network: network.name.to_string(),
            chain_id: network.chain_id,
            owner,
            price_feed,
            mock_feed,
            ledger: config,
            deployed_at: Utc::now(),
        };
        deployment.save(&deployment_path)?;
        info!(network = network.name, %owner, %price_feed, "Deployment written");

        Self::open(data_path)
    }

    /// Open an existing deployment and replay its journal
    pub fn open(data_path: impl AsRef<Path>) -> Result<Self, ContextError> {
        let data_path = data_path.as_ref();
        let deployment_path = data_path.join(DEPLOYMENT_FILE);
        if !deployment_path.exists() {
            return Err(ContextError::NotDeployed(data_path.to_path_buf()));
        }
        let deployment = Deployment::load(&deployment_path)?;

        let journal_path = data_path.join(JOURNAL_DIR);
        std::fs::create_dir_all(&journal_path)?;

        let aggregator = Arc::new(MockAggregator::new(
            deployment.price_feed,
            deployment.mock_feed.decimals,
            deployment.mock_feed.answer,
        ));

        // Replay events to rebuild state
        let records = EventReader::from_directory(&journal_path)?.read_all()?;
        let ledger = FundingLedger::replay(
            deployment.owner,
            FeedAdapter::new(aggregator.clone()),
            InMemoryPayout::new(),
            deployment.ledger.clone(),
            records.iter().map(|record| &record.event),
        )?;
        info!(records = records.len(), balance = %ledger.balance(), "Journal replayed");

        Ok(Self {
            ledger,
            aggregator,
            deployment,
            journal: EventStore::resume(&journal_path, records.into_iter().last()),
            deployment_path,
        })
    }

    /// Contribute `amount` from `contributor`
    pub fn fund(
        &mut self,
        contributor: Address,
        amount: Wei,
        correlation_id: &str,
    ) -> Result<Vec<JournalRecord>, ContextError> {
        self.ledger.fund(contributor, amount)?;
        self.commit_events(correlation_id)
    }

    /// Withdraw everything as `caller`; returns the amount paid out
    pub fn withdraw(
        &mut self,
        caller: Address,
        correlation_id: &str,
    ) -> Result<(Wei, Vec<JournalRecord>), ContextError> {
        let amount = self.ledger.withdraw(caller)?;
        let records = self.commit_events(correlation_id)?;
        Ok((amount, records))
    }

    /// Publish a new mock answer and persist it
    pub fn set_price(&mut self, answer: i128) -> Result<(), ContextError> {
        self.aggregator.update_answer(answer);
        self.deployment.mock_feed.answer = answer;
        self.deployment.save(&self.deployment_path)?;
        info!(answer, "Mock price updated");
        Ok(())
    }

    /// Verify the journal hash chain; returns the number of records
    pub fn audit(&self) -> Result<usize, ContextError> {
        let records = EventReader::from_directory(self.journal.dir())?.read_all()?;
        verify_chain(&records)?;
        Ok(records.len())
    }

    /// Journal every event the ledger emitted
    fn commit_events(&mut self, correlation_id: &str) -> Result<Vec<JournalRecord>, ContextError> {
        let mut committed = Vec::new();
        for event in self.ledger.take_events() {
            committed.push(self.journal.commit(correlation_id, event)?);
        }
        Ok(committed)
    }

    pub fn deployment(&self) -> &Deployment {
        &self.deployment
    }

    pub fn aggregator(&self) -> &MockAggregator {
        &self.aggregator
    }

    pub fn journal_path(&self) -> &Path {
        self.journal.dir()
    }

    /// Sequence of the last journaled record (0 when empty)
    pub fn last_sequence(&self) -> u64 {
        self.journal.last_sequence()
    }
}

/// Errors from the application layer
#[derive(Debug, thiserror::Error)]
pub enum ContextError {
    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("Event store error: {0}")]
    Event(#[from] EventError),

    #[error("Journal integrity error: {0}")]
    Chain(#[from] ChainError),

    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Deployment file error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Nothing deployed in {}", .0.display())]
    NotDeployed(PathBuf),

    #[error("Already deployed: {}", .0.display())]
    AlreadyDeployed(PathBuf),

    #[error("Network {network} is live; bind feed {feed} through an RPC transport")]
    LiveNetwork { network: String, feed: Address },
}
