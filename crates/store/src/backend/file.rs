//! File-based storage backend.
//!
//! The full key space is written as a single postcard-encoded snapshot:
//!
//! ```text
//! {magic:8}{version:2LE}{postcard(KeySpace)}
//! ```
//!
//! Commits write to a sibling `.tmp` file, `fsync` it, and rename it over the
//! live file, so a crash mid-commit leaves the previous snapshot intact.

use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use parking_lot::Mutex;
use snafu::ResultExt;

use super::{FORMAT_VERSION, KeySpace, MAGIC, StorageBackend};
use crate::error::{CorruptedSnafu, DecodeSnafu, EncodeSnafu, IoSnafu, Result};

const HEADER_LEN: usize = MAGIC.len() + 2;

/// File-based storage backend.
pub struct FileBackend {
    path: PathBuf,
    /// Serializes snapshot writes so two commits never race on the temp file.
    write_lock: Mutex<()>,
}

impl FileBackend {
    /// Creates a backend for the state file at `path`.
    ///
    /// The file does not need to exist; a missing file loads as an empty key space.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self { path: path.as_ref().to_path_buf(), write_lock: Mutex::new(()) }
    }

    /// Path of the live state file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        self.path.with_extension("tmp")
    }
}

impl StorageBackend for FileBackend {
    fn load(&self) -> Result<KeySpace> {
        if !self.path.exists() {
            return Ok(KeySpace::new());
        }

        let bytes = fs::read(&self.path).context(IoSnafu)?;
        if bytes.len() < HEADER_LEN {
            return CorruptedSnafu {
                reason: format!("state file is {} bytes, shorter than header", bytes.len()),
            }
            .fail();
        }
        if &bytes[..MAGIC.len()] != MAGIC {
            return CorruptedSnafu { reason: "invalid magic number".to_string() }.fail();
        }

        let version = u16::from_le_bytes([bytes[MAGIC.len()], bytes[MAGIC.len() + 1]]);
        if version != FORMAT_VERSION {
            return CorruptedSnafu { reason: format!("unsupported format version {version}") }
                .fail();
        }

        postcard::from_bytes(&bytes[HEADER_LEN..]).context(DecodeSnafu)
    }

    fn persist(&self, state: &KeySpace) -> Result<()> {
        let _guard = self.write_lock.lock();

        let body = postcard::to_allocvec(state).context(EncodeSnafu)?;
        let temp = self.temp_path();
        {
            let mut file = File::create(&temp).context(IoSnafu)?;
            file.write_all(MAGIC).context(IoSnafu)?;
            file.write_all(&FORMAT_VERSION.to_le_bytes()).context(IoSnafu)?;
            file.write_all(&body).context(IoSnafu)?;
            file.sync_all().context(IoSnafu)?;
        }
        fs::rename(&temp, &self.path).context(IoSnafu)?;

        tracing::trace!(path = %self.path.display(), keys = state.len(), "Persisted ledger state");
        Ok(())
    }
}
