//! claimledger-store: the transactional key-value substrate.
//!
//! The workflow engine treats its ledger as an opaque store with snapshot
//! reads and atomic write-per-invocation semantics. This crate provides that
//! store:
//!
//! - **Snapshot reads**: a [`ReadTransaction`] sees one committed snapshot
//! - **Single writer**: [`WriteTransaction`]s are serialized by a writer lock
//! - **Atomic commit**: buffered writes are persisted, then published together
//! - **Pluggable persistence**: [`FileBackend`] / [`InMemoryBackend`]
//!
//! ## Quick Start
//!
//! ```
//! use claimledger_store::{Database, Ledger, LedgerRead};
//!
//! let db = Database::open_in_memory()?;
//!
//! let mut txn = db.write();
//! txn.put_state("key", b"value".to_vec())?;
//! txn.commit()?;
//!
//! let value = db.read().get_state("key")?;
//! assert_eq!(value, Some(b"value".to_vec()));
//! # Ok::<(), claimledger_store::Error>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod backend;
pub mod db;
pub mod error;
pub mod ledger;

pub use backend::{FileBackend, InMemoryBackend, KeySpace, StorageBackend};
pub use db::{Database, DatabaseStats, ReadTransaction, WriteTransaction};
pub use error::{Error, Result};
pub use ledger::{KvPair, Ledger, LedgerRead, PrefixIter};
