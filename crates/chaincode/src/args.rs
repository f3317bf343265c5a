//! Request argument decoding.
//!
//! Every operation takes its input as a list of strings, each a JSON
//! document. Workflow operations take exactly one; listings take an optional
//! filter.

use claimledger_types::decode;
use serde::de::DeserializeOwned;
use snafu::ResultExt;

use crate::error::{ChaincodeError, DecodingSnafu, Result};

/// Message returned when an operation receives the wrong number of arguments.
pub const INVALID_ARGUMENT_COUNT: &str = "Invalid argument count.";

/// Decodes the single JSON argument of a workflow operation.
pub(crate) fn single<T: DeserializeOwned>(args: &[String]) -> Result<T> {
    match args {
        [arg] => decode(arg.as_bytes()).context(DecodingSnafu),
        _ => Err(ChaincodeError::validation(INVALID_ARGUMENT_COUNT)),
    }
}

/// Decodes an optional JSON filter, falling back to `T::default()` when no
/// argument is given.
pub(crate) fn optional<T: DeserializeOwned + Default>(args: &[String]) -> Result<T> {
    match args {
        [] => Ok(T::default()),
        [_] => single(args),
        _ => Err(ChaincodeError::validation(INVALID_ARGUMENT_COUNT)),
    }
}
