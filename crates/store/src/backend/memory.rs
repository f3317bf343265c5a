//! In-memory storage backend for testing.

use super::{KeySpace, StorageBackend};
use crate::error::Result;

/// In-memory storage backend.
///
/// Nothing is persisted; all data lives in the [`Database`](crate::Database)
/// snapshot and is lost when it is dropped.
#[derive(Debug, Default, Clone, Copy)]
pub struct InMemoryBackend;

impl InMemoryBackend {
    /// Create a new in-memory backend.
    pub fn new() -> Self {
        Self
    }
}

impl StorageBackend for InMemoryBackend {
    fn load(&self) -> Result<KeySpace> {
        Ok(KeySpace::new())
    }

    fn persist(&self, _state: &KeySpace) -> Result<()> {
        Ok(())
    }
}
