//! Temporary directory management for tests.
//!
//! [`TestDir`] wraps [`tempfile::TempDir`] with the paths the file-backed
//! ledger tests need.

// Test utilities are expected to panic on failure - that's their purpose
#![allow(clippy::expect_used)]

use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// A managed temporary directory for tests, removed on drop.
///
/// # Example
///
/// ```
/// use claimledger_test_utils::TestDir;
///
/// let dir = TestDir::new();
/// let ledger = dir.ledger_path();
/// assert!(ledger.starts_with(dir.path()));
/// ```
pub struct TestDir {
    inner: TempDir,
}

impl TestDir {
    /// Creates a new temporary directory.
    ///
    /// # Panics
    ///
    /// Panics if the temporary directory cannot be created.
    #[must_use]
    pub fn new() -> Self {
        let inner = TempDir::new().expect("failed to create temp directory");
        Self { inner }
    }

    /// Returns the path to the temporary directory.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.inner.path()
    }

    /// Joins a relative path onto the temporary directory.
    #[must_use]
    pub fn join<P: AsRef<Path>>(&self, path: P) -> PathBuf {
        self.inner.path().join(path)
    }

    /// Path for a ledger state file inside the directory. The file is not
    /// created.
    #[must_use]
    pub fn ledger_path(&self) -> PathBuf {
        self.join("ledger.db")
    }

    /// Writes `contents` to `name` inside the directory and returns its path.
    ///
    /// # Panics
    ///
    /// Panics if the file cannot be written.
    pub fn write_file(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.join(name);
        std::fs::write(&path, contents).expect("failed to write test file");
        path
    }
}

impl Default for TestDir {
    fn default() -> Self {
        Self::new()
    }
}
