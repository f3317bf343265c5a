//! Shared test utilities for claimledger crates.
//!
//! - [`TestDir`] - Managed temporary directory with ledger path helpers
//! - [`fixtures`] - JSON request arguments for workflow operations
//! - [`strategies`] - Proptest generators for keys and records

#![deny(unsafe_code)]

pub mod fixtures;
pub mod strategies;

mod test_dir;
pub use test_dir::TestDir;
