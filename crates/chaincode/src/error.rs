//! Invocation errors.
//!
//! Every failure surfaces to the caller as a message string; the text of the
//! workflow messages ("Could not find the repair order", "Invalid argument
//! count.", ...) is part of the contract with existing clients and must not
//! change. [`ChaincodeError::code`] adds a structured kind on top.

use claimledger_state::EntityError;
use claimledger_types::{CodecError, ErrorCode};
use snafu::Snafu;

/// Errors returned by [`crate::Chaincode::invoke`].
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ChaincodeError {
    /// The request argument is not valid JSON for the operation.
    #[snafu(display("{source}"))]
    Decoding { source: CodecError },

    /// The request is well-formed but not acceptable in the current state.
    #[snafu(display("{message}"))]
    Validation { message: String },

    /// A required entity is absent.
    #[snafu(display("{message}"))]
    NotFound { message: String },

    /// An entity with the same identity already exists.
    #[snafu(display("{message}"))]
    DuplicateKey { message: String },

    /// Reading ledger state failed, including stored records that no longer
    /// decode.
    #[snafu(display("{source}"))]
    Read { source: EntityError },

    /// Writing a record failed.
    #[snafu(display("{source}"))]
    Write { source: EntityError },

    /// Committing the invocation's writes failed.
    #[snafu(display("{source}"))]
    Commit { source: claimledger_store::Error },

    /// A key or record could not be encoded.
    #[snafu(display("{source}"))]
    Encoding { source: EntityError },

    /// The response payload could not be encoded.
    #[snafu(display("{source}"))]
    Payload { source: CodecError },

    /// No handler is registered under the requested name.
    #[snafu(display("Invalid invoke function."))]
    UnknownFunction { function: String },

    /// Seeding the contract type catalog failed.
    #[snafu(display("{message}"))]
    Bootstrap { message: String },
}

impl ChaincodeError {
    /// Machine-readable kind of this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Decoding { .. } => ErrorCode::DecodingError,
            Self::Validation { .. } => ErrorCode::ValidationError,
            Self::NotFound { .. } => ErrorCode::NotFound,
            Self::DuplicateKey { .. } => ErrorCode::DuplicateKey,
            Self::Read { .. } => ErrorCode::ReadError,
            Self::Write { .. } | Self::Commit { .. } => ErrorCode::WriteError,
            Self::Encoding { .. } | Self::Payload { .. } => ErrorCode::EncodingError,
            Self::UnknownFunction { .. } => ErrorCode::UnknownFunction,
            Self::Bootstrap { .. } => ErrorCode::Bootstrap,
        }
    }

    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation { message: message.into() }
    }

    pub(crate) fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound { message: message.into() }
    }

    pub(crate) fn duplicate(message: impl Into<String>) -> Self {
        Self::DuplicateKey { message: message.into() }
    }
}

impl From<EntityError> for ChaincodeError {
    fn from(source: EntityError) -> Self {
        match source {
            EntityError::NotFound { message } => Self::NotFound { message },
            EntityError::Write { .. } => Self::Write { source },
            EntityError::Key { .. }
            | EntityError::Codec { source: CodecError::Encode { .. }, .. } => {
                Self::Encoding { source }
            },
            EntityError::Read { .. } | EntityError::Codec { .. } => Self::Read { source },
        }
    }
}

/// Result type for invocations.
pub type Result<T> = std::result::Result<T, ChaincodeError>;
