//! Core types, codecs, and error codes for claimledger.
//!
//! This crate provides the foundational types used throughout the workspace:
//! - Entity records (contract types, users, contracts, claims, repair orders)
//! - The JSON codec used for both stored records and request arguments
//! - Machine-readable error codes
//! - Workflow configuration

pub mod codec;
pub mod config;
pub mod error;
pub mod types;

// Re-export commonly used types at crate root
pub use codec::{CodecError, decode, encode};
pub use error::ErrorCode;
pub use types::*;
