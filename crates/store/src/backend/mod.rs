//! Storage backend abstraction for the store.
//!
//! A backend loads the committed key space when a [`Database`](crate::Database)
//! opens and persists the full key space on every commit. Both file-based
//! (production) and in-memory (testing) implementations are provided.
//!
//! Persistence happens before the new state is published to readers, so a
//! failed `persist` leaves the previously committed state in place.

mod file;
mod memory;

use std::collections::BTreeMap;

pub use file::FileBackend;
pub use memory::InMemoryBackend;

use crate::error::Result;

/// Committed key space, ordered lexicographically by key.
pub type KeySpace = BTreeMap<String, Vec<u8>>;

/// Magic number for claimledger state files.
pub const MAGIC: &[u8; 8] = b"CLMLEDGR";

/// Current on-disk format version.
pub const FORMAT_VERSION: u16 = 1;

/// Storage backend trait for abstracting persistence.
pub trait StorageBackend: Send + Sync {
    /// Loads the committed key space.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if the read fails.
    /// Returns `Error::Corrupted` or `Error::Decode` if the persisted state is invalid.
    fn load(&self) -> Result<KeySpace>;

    /// Persists the full committed key space.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if the write fails.
    /// Returns `Error::Encode` if the key space cannot be encoded.
    fn persist(&self, state: &KeySpace) -> Result<()>;
}
