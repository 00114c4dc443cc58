//! FundMe CLI - deployment and command orchestration
//!
//! This crate provides the `fundme` binary: network selection, the persisted
//! deployment, journal replay and the commands that drive a ledger.

pub mod commands;
pub mod context;
pub mod deployment;
pub mod network;

pub use context::{AppContext, ContextError, DeployedLedger};
pub use deployment::{Deployment, MockFeed};
