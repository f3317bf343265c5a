//! JSON-lines invocation loop.
//!
//! Each input line is one request `{"function": "...", "args": ["..."]}`;
//! each produces exactly one response line on the output, in order.

use std::io::{self, BufRead, Write};

use claimledger_chaincode::{Chaincode, ChaincodeError};
use claimledger_store::StorageBackend;
use claimledger_types::ErrorCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;

const STATUS_OK: u16 = 200;
const STATUS_ERROR: u16 = 500;

/// One invocation request.
#[derive(Debug, Deserialize)]
pub struct Request {
    pub function: String,
    #[serde(default)]
    pub args: Vec<String>,
}

/// One invocation response.
#[derive(Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Response {
    Success { status: u16, payload: Value },
    Failure { status: u16, code: u16, message: String },
}

impl Response {
    fn success(payload: &[u8]) -> Self {
        Self::Success { status: STATUS_OK, payload: payload_value(payload) }
    }

    fn failure(code: ErrorCode, message: String) -> Self {
        Self::Failure { status: STATUS_ERROR, code: code.as_u16(), message }
    }

    fn from_result(result: Result<Vec<u8>, ChaincodeError>) -> Self {
        match result {
            Ok(payload) => Self::success(&payload),
            Err(e) => Self::failure(e.code(), e.to_string()),
        }
    }
}

/// Counters for one session.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SessionStats {
    pub succeeded: u64,
    pub failed: u64,
}

/// Interprets a handler payload as JSON; empty means no payload.
pub fn payload_value(payload: &[u8]) -> Value {
    if payload.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(payload)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(payload).into_owned()))
}

/// Serves requests from `input` until end of input.
///
/// Blank lines are skipped. A line that is not a valid request yields a
/// decoding failure response and the loop continues.
///
/// # Errors
///
/// Returns an I/O error if reading the input or writing a response fails.
pub fn serve<B, R, W>(chaincode: &Chaincode<B>, input: R, mut output: W) -> io::Result<SessionStats>
where
    B: StorageBackend + 'static,
    R: BufRead,
    W: Write,
{
    let mut stats = SessionStats::default();
    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<Request>(&line) {
            Ok(request) => Response::from_result(chaincode.invoke(&request.function, &request.args)),
            Err(e) => {
                tracing::warn!(error = %e, "Malformed request line");
                Response::failure(ErrorCode::DecodingError, e.to_string())
            },
        };
        match response {
            Response::Success { .. } => stats.succeeded += 1,
            Response::Failure { .. } => stats.failed += 1,
        }

        serde_json::to_writer(&mut output, &response).map_err(io::Error::other)?;
        output.write_all(b"\n")?;
        output.flush()?;
    }
    Ok(stats)
}
