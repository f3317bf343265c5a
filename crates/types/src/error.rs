//! Machine-readable error codes shared by every claimledger layer.
//!
//! Invocation failures are reported to callers as a message string. The
//! message text is kept stable for callers that match on it; [`ErrorCode`]
//! gives everyone else a structured kind to branch on.

use core::fmt;

/// Machine-readable error codes for programmatic error handling.
///
/// | Range       | Domain     | Examples                                  |
/// |-------------|------------|-------------------------------------------|
/// | 1000–1099   | Substrate  | Ledger read, ledger write                 |
/// | 2000–2099   | Encoding   | Request decoding, record codec, key index |
/// | 3000–3099   | Workflow   | Validation, not-found, duplicate key      |
/// | 3100–3199   | Dispatch   | Unknown function, bootstrap               |
///
/// # Wire Format
///
/// Codes are transmitted as their numeric value. Use [`ErrorCode::as_u16`]
/// for serialization and [`ErrorCode::from_u16`] for deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum ErrorCode {
    /// Reading ledger state failed.
    ReadError = 1000,
    /// Writing or committing ledger state failed.
    WriteError = 1001,
    /// The request argument was not valid JSON for the operation.
    DecodingError = 2000,
    /// A record or composite key could not be encoded.
    EncodingError = 2001,
    /// Wrong argument count, or a referenced entity is missing where required.
    ValidationError = 3000,
    /// An entity is absent where its presence was required.
    NotFound = 3001,
    /// An entity with the same key already exists.
    DuplicateKey = 3002,
    /// No handler is registered under the requested operation name.
    UnknownFunction = 3100,
    /// Catalog bootstrap failed.
    Bootstrap = 3101,
}

impl ErrorCode {
    /// Returns the numeric code value.
    #[must_use]
    pub const fn as_u16(self) -> u16 {
        self as u16
    }

    /// Converts a numeric code to an `ErrorCode`, returning `None` for unknown values.
    #[must_use]
    pub fn from_u16(code: u16) -> Option<Self> {
        match code {
            1000 => Some(Self::ReadError),
            1001 => Some(Self::WriteError),
            2000 => Some(Self::DecodingError),
            2001 => Some(Self::EncodingError),
            3000 => Some(Self::ValidationError),
            3001 => Some(Self::NotFound),
            3002 => Some(Self::DuplicateKey),
            3100 => Some(Self::UnknownFunction),
            3101 => Some(Self::Bootstrap),
            _ => None,
        }
    }

    /// Stable name of the error kind.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::ReadError => "ReadError",
            Self::WriteError => "WriteError",
            Self::DecodingError => "DecodingError",
            Self::EncodingError => "EncodingError",
            Self::ValidationError => "ValidationError",
            Self::NotFound => "NotFound",
            Self::DuplicateKey => "DuplicateKey",
            Self::UnknownFunction => "UnknownFunction",
            Self::Bootstrap => "Bootstrap",
        }
    }

    /// Whether the failure came from the substrate rather than the request.
    ///
    /// Nothing inside claimledger retries; this only tells callers whether
    /// resubmitting the same request could succeed.
    #[must_use]
    pub const fn is_substrate_failure(self) -> bool {
        matches!(self, Self::ReadError | Self::WriteError)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u16())
    }
}
