//! Network configuration
//!
//! Dev chains get a mock aggregator, live chains bind the known ETH/USD feed.

use fundme_core::{Address, AddressError};
use thiserror::Error;

/// Networks that run against a mock aggregator
pub const DEV_CHAINS: &[&str] = &["hardhat", "localhost"];

/// Precision of the mock ETH/USD answer
pub const DECIMALS: u8 = 8;

/// Mock ETH/USD answer: $2000.00000000
pub const INITIAL_ANSWER: i128 = 200_000_000_000;

/// Where the mock aggregator lands on a fresh dev chain
pub const MOCK_FEED_ADDRESS: &str = "0x5FbDB2315678afecb367f032d93F642f64180aa3";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkConfig {
    pub name: &'static str,
    pub chain_id: u64,
    /// Deployed ETH/USD aggregator, `None` on dev chains
    pub eth_usd_price_feed: Option<&'static str>,
}

pub const NETWORKS: &[NetworkConfig] = &[
    NetworkConfig {
        name: "hardhat",
        chain_id: 31337,
        eth_usd_price_feed: None,
    },
    NetworkConfig {
        name: "localhost",
        chain_id: 31337,
        eth_usd_price_feed: None,
    },
    NetworkConfig {
        name: "rinkeby",
        chain_id: 4,
        eth_usd_price_feed: Some("0x8A753747A1Fa494EC906cE90E9f37563A8AF630e"),
    },
    NetworkConfig {
        name: "polygon",
        chain_id: 138,
        eth_usd_price_feed: Some("0xF9680D99D6C9589e2a93a78A04A279e509205945"),
    },
];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NetworkError {
    #[error("Unknown network: {0}")]
    Unknown(String),

    #[error("Network {name} has no ETH/USD feed configured")]
    MissingFeed { name: String },

    #[error("Invalid feed address for {name}: {source}")]
    InvalidFeed {
        name: String,
        #[source]
        source: AddressError,
    },
}

/// How a deployment obtains its price
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedSource {
    Mock {
        address: Address,
        decimals: u8,
        answer: i128,
    },
    Live {
        address: Address,
    },
}

impl NetworkConfig {
    pub fn is_dev(&self) -> bool {
        DEV_CHAINS.contains(&self.name)
    }

    /// Feed to bind on this network; `answer` overrides the mock's initial answer
    pub fn feed_source(&self, answer: Option<i128>) -> Result<FeedSource, NetworkError> {
        if self.is_dev() {
            let address = MOCK_FEED_ADDRESS
                .parse()
                .map_err(|source| NetworkError::InvalidFeed {
                    name: self.name.to_string(),
                    source,
                })?;
            return Ok(FeedSource::Mock {
                address,
                decimals: DECIMALS,
                answer: answer.unwrap_or(INITIAL_ANSWER),
            });
        }

        let feed = self.eth_usd_price_feed.ok_or_else(|| NetworkError::MissingFeed {
            name: self.name.to_string(),
        })?;
        let address = feed.parse().map_err(|source| NetworkError::InvalidFeed {
            name: self.name.to_string(),
            source,
        })?;
        Ok(FeedSource::Live { address })
    }
}

/// Look a network up by name (case-insensitive)
pub fn lookup(name: &str) -> Result<&'static NetworkConfig, NetworkError> {
    NETWORKS
        .iter()
        .find(|n| n.name.eq_ignore_ascii_case(name.trim()))
        .ok_or_else(|| NetworkError::Unknown(name.to_string()))
}
