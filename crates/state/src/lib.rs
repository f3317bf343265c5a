//! Key indexing and typed entity storage for claimledger.
//!
//! This crate sits between the transactional key-value substrate
//! (`claimledger-store`) and the workflow handlers (`claimledger-chaincode`),
//! providing:
//!
//! - Composite keys that make a flat key space answer "all X for Y" queries
//! - Entity families with unique prefixes and fixed key arity
//! - Typed get/put/list over any [`claimledger_store::Ledger`]

#![deny(unsafe_code)]

pub mod entity;
pub mod keys;

pub use entity::{EntityError, EntityIter, EntityStore, Listed, Record};
pub use keys::{CompositeKey, EntityKind, KeyError, build_key, parse_key, scan};
