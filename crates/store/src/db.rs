//! Database handle and transactions.
//!
//! The committed key space is an immutable snapshot behind an `Arc`. Readers
//! clone the `Arc` and never block writers. Writers are serialized by a
//! writer lock held for the lifetime of the [`WriteTransaction`]; their writes
//! are buffered and published atomically by [`WriteTransaction::commit`].
//! Dropping a write transaction without committing discards its writes.

use std::{
    cmp::Ordering,
    iter::Peekable,
    ops::Bound,
    path::Path,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering as AtomicOrdering},
    },
};

use parking_lot::{Mutex, MutexGuard, RwLock};

use crate::{
    backend::{FileBackend, InMemoryBackend, KeySpace, StorageBackend},
    error::{Error, Result},
    ledger::{KvPair, Ledger, LedgerRead, PrefixIter},
};

/// Database statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DatabaseStats {
    /// Number of keys in the committed state.
    pub key_count: usize,
    /// Number of successful commits since open.
    pub commits: u64,
    /// Number of write transactions dropped without committing.
    pub aborts: u64,
}

/// Transactional key-value database.
pub struct Database<B: StorageBackend> {
    backend: B,
    committed: RwLock<Arc<KeySpace>>,
    writer: Mutex<()>,
    commits: AtomicU64,
    aborts: AtomicU64,
}

impl Database<FileBackend> {
    /// Opens (or creates) a database persisted at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing state file cannot be read or decoded.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::with_backend(FileBackend::new(path))
    }
}

impl Database<InMemoryBackend> {
    /// Creates an empty in-memory database.
    ///
    /// # Errors
    ///
    /// Infallible in practice; the signature matches [`Database::open`].
    pub fn open_in_memory() -> Result<Self> {
        Self::with_backend(InMemoryBackend::new())
    }
}

impl<B: StorageBackend> Database<B> {
    /// Opens a database over an arbitrary backend, loading its committed state.
    ///
    /// # Errors
    ///
    /// Returns the backend's load error.
    pub fn with_backend(backend: B) -> Result<Self> {
        let state = backend.load()?;
        tracing::debug!(keys = state.len(), "Opened ledger database");
        Ok(Self {
            backend,
            committed: RwLock::new(Arc::new(state)),
            writer: Mutex::new(()),
            commits: AtomicU64::new(0),
            aborts: AtomicU64::new(0),
        })
    }

    /// Begins a read transaction over the current committed snapshot.
    pub fn read(&self) -> ReadTransaction {
        ReadTransaction { snapshot: self.snapshot() }
    }

    /// Begins a write transaction.
    ///
    /// Blocks until any other write transaction has committed or been dropped.
    pub fn write(&self) -> WriteTransaction<'_, B> {
        let guard = self.writer.lock();
        WriteTransaction {
            db: self,
            _guard: guard,
            snapshot: self.snapshot(),
            pending: KeySpace::new(),
            committed: false,
        }
    }

    /// Returns database statistics.
    pub fn stats(&self) -> DatabaseStats {
        DatabaseStats {
            key_count: self.committed.read().len(),
            commits: self.commits.load(AtomicOrdering::Relaxed),
            aborts: self.aborts.load(AtomicOrdering::Relaxed),
        }
    }

    fn snapshot(&self) -> Arc<KeySpace> {
        Arc::clone(&self.committed.read())
    }
}

/// A read-only view of one committed snapshot.
pub struct ReadTransaction {
    snapshot: Arc<KeySpace>,
}

impl ReadTransaction {
    /// Number of keys visible to this transaction.
    pub fn len(&self) -> usize {
        self.snapshot.len()
    }

    /// Whether the snapshot is empty.
    pub fn is_empty(&self) -> bool {
        self.snapshot.is_empty()
    }
}

impl LedgerRead for ReadTransaction {
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.snapshot.get(key).cloned())
    }

    fn scan_prefix(&self, prefix: &str) -> Result<PrefixIter<'_>> {
        let iter = prefix_range(&self.snapshot, prefix)
            .map(|(key, value)| Ok((key.clone(), value.clone())));
        Ok(Box::new(iter))
    }
}

/// A read-write transaction covering exactly one invocation.
///
/// Reads see the snapshot taken at begin overlaid with this transaction's own
/// writes.
pub struct WriteTransaction<'db, B: StorageBackend> {
    db: &'db Database<B>,
    _guard: MutexGuard<'db, ()>,
    snapshot: Arc<KeySpace>,
    pending: KeySpace,
    committed: bool,
}

impl<B: StorageBackend> WriteTransaction<'_, B> {
    /// Number of buffered writes.
    pub fn pending_writes(&self) -> usize {
        self.pending.len()
    }

    /// Persists and publishes all buffered writes as one atomic change.
    ///
    /// # Errors
    ///
    /// Returns the backend's persist error; in that case nothing is published.
    pub fn commit(mut self) -> Result<()> {
        let writes = std::mem::take(&mut self.pending);
        let write_count = writes.len();

        if write_count > 0 {
            let mut next = Arc::clone(&self.snapshot);
            Arc::make_mut(&mut next).extend(writes);
            self.db.backend.persist(&next)?;
            *self.db.committed.write() = next;
        }

        self.committed = true;
        self.db.commits.fetch_add(1, AtomicOrdering::Relaxed);
        tracing::trace!(writes = write_count, "Committed write transaction");
        Ok(())
    }

    /// Discards all buffered writes.
    pub fn abort(self) {
        // Drop records the abort.
    }
}

impl<B: StorageBackend> Drop for WriteTransaction<'_, B> {
    fn drop(&mut self) {
        if !self.committed {
            self.db.aborts.fetch_add(1, AtomicOrdering::Relaxed);
            if !self.pending.is_empty() {
                tracing::trace!(writes = self.pending.len(), "Discarded write transaction");
            }
        }
    }
}

impl<B: StorageBackend> LedgerRead for WriteTransaction<'_, B> {
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.pending.get(key).or_else(|| self.snapshot.get(key)).cloned())
    }

    fn scan_prefix(&self, prefix: &str) -> Result<PrefixIter<'_>> {
        Ok(Box::new(Overlay {
            base: prefix_range(&self.snapshot, prefix).peekable(),
            pending: prefix_range(&self.pending, prefix).peekable(),
        }))
    }
}

impl<B: StorageBackend> Ledger for WriteTransaction<'_, B> {
    fn put_state(&mut self, key: &str, value: Vec<u8>) -> Result<()> {
        if key.is_empty() {
            return Err(Error::EmptyKey);
        }
        self.pending.insert(key.to_owned(), value);
        Ok(())
    }
}

/// Entries of `space` whose key starts with `prefix`, in key order.
fn prefix_range<'a>(
    space: &'a KeySpace,
    prefix: &str,
) -> impl Iterator<Item = (&'a String, &'a Vec<u8>)> + use<'a> {
    let owned = prefix.to_owned();
    space
        .range::<str, _>((Bound::Included(prefix), Bound::Unbounded))
        .take_while(move |(key, _)| key.starts_with(owned.as_str()))
}

/// Merges the committed snapshot with pending writes; pending entries shadow
/// committed entries with the same key.
struct Overlay<I: Iterator, J: Iterator> {
    base: Peekable<I>,
    pending: Peekable<J>,
}

impl<'a, I, J> Iterator for Overlay<I, J>
where
    I: Iterator<Item = (&'a String, &'a Vec<u8>)>,
    J: Iterator<Item = (&'a String, &'a Vec<u8>)>,
{
    type Item = Result<KvPair>;

    fn next(&mut self) -> Option<Self::Item> {
        let order = match (self.base.peek(), self.pending.peek()) {
            (None, None) => return None,
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (Some((base_key, _)), Some((pending_key, _))) => base_key.cmp(pending_key),
        };

        let entry = match order {
            Ordering::Less => self.base.next(),
            Ordering::Greater => self.pending.next(),
            Ordering::Equal => {
                self.base.next();
                self.pending.next()
            },
        };
        entry.map(|(key, value)| Ok((key.clone(), value.clone())))
    }
}
