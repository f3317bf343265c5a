//! Error types for the claimledger store.

use std::io;

use snafu::Snafu;

/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading, writing, or persisting ledger state.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    /// I/O error from the underlying storage backend.
    #[snafu(display("I/O error: {source}"))]
    Io {
        /// The underlying I/O error.
        source: io::Error,
    },

    /// Persisted state is corrupted or has an invalid format.
    #[snafu(display("Corrupted ledger state: {reason}"))]
    Corrupted {
        /// Description of what was corrupted.
        reason: String,
    },

    /// Committed state could not be encoded for persistence.
    #[snafu(display("Failed to encode ledger state: {source}"))]
    Encode {
        /// The underlying postcard error.
        source: postcard::Error,
    },

    /// Persisted state could not be decoded.
    #[snafu(display("Failed to decode ledger state: {source}"))]
    Decode {
        /// The underlying postcard error.
        source: postcard::Error,
    },

    /// Keys must be non-empty.
    #[snafu(display("Empty key"))]
    EmptyKey,
}

impl From<io::Error> for Error {
    fn from(source: io::Error) -> Self {
        Error::Io { source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_io() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err = Error::from(io_err);
        let display = format!("{err}");
        assert!(display.starts_with("I/O error:"), "got: {display}");
    }

    #[test]
    fn test_error_display_corrupted() {
        let err = Error::Corrupted { reason: "bad magic".to_string() };
        assert_eq!(format!("{err}"), "Corrupted ledger state: bad magic");
    }

    #[test]
    fn test_error_display_empty_key() {
        assert_eq!(format!("{}", Error::EmptyKey), "Empty key");
    }
}
