//! Workflow handlers, one module per entity family.
//!
//! Each handler decodes its argument, loads what it needs through the
//! [`claimledger_state::EntityStore`], applies one transition, and writes the
//! results back. All of it happens inside the caller's transaction.

pub(crate) mod claim;
pub(crate) mod contract;
pub(crate) mod contract_type;
pub(crate) mod repair_order;
pub(crate) mod theft;
pub(crate) mod user;

use claimledger_types::encode;
use serde::Serialize;
use snafu::ResultExt;

use crate::error::{ChaincodeError, PayloadSnafu, Result};

/// Encodes a JSON response payload.
fn respond<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    encode(value).context(PayloadSnafu)
}

/// The empty success payload.
fn done() -> Result<Vec<u8>> {
    Ok(Vec::new())
}

/// Borrows owned key attributes for an entity store call.
fn attrs(attributes: &[String]) -> Vec<&str> {
    attributes.iter().map(String::as_str).collect()
}

/// Fails once a list operation holds more results than the configured bound.
fn within_scan_bound(collected: usize, limit: Option<usize>) -> Result<()> {
    match limit {
        Some(limit) if collected > limit => Err(ChaincodeError::validation(format!(
            "List result exceeds the configured limit of {limit} entries"
        ))),
        _ => Ok(()),
    }
}
