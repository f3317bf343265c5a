//! Shared harness for chaincode integration tests.

#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use claimledger_chaincode::{Chaincode, ChaincodeError};
use claimledger_state::{EntityStore, Record};
use claimledger_store::{Database, InMemoryBackend, Ledger};
use claimledger_test_utils::fixtures;
use claimledger_types::config::WorkflowConfig;
use serde_json::Value;

pub type TestChaincode = Chaincode<InMemoryBackend>;

pub fn chaincode() -> TestChaincode {
    chaincode_with(WorkflowConfig::default())
}

pub fn chaincode_with(config: WorkflowConfig) -> TestChaincode {
    let db = Arc::new(Database::open_in_memory().expect("open database"));
    Chaincode::new(db, config)
}

/// Invokes `function` with one JSON argument and parses the payload.
///
/// An empty payload parses as `Value::Null`.
pub fn call(cc: &TestChaincode, function: &str, arg: &Value) -> Value {
    parse(cc.invoke(function, &fixtures::args(arg)).expect(function))
}

/// Invokes `function` without arguments and parses the payload.
pub fn call_bare(cc: &TestChaincode, function: &str) -> Value {
    parse(cc.invoke(function, &[]).expect(function))
}

/// Invokes `function` with one JSON argument, expecting failure.
pub fn fail(cc: &TestChaincode, function: &str, arg: &Value) -> ChaincodeError {
    match cc.invoke(function, &fixtures::args(arg)) {
        Ok(payload) => panic!("{function} succeeded: {}", String::from_utf8_lossy(&payload)),
        Err(err) => err,
    }
}

pub fn parse(payload: Vec<u8>) -> Value {
    if payload.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&payload).expect("payload is JSON")
    }
}

/// Reads a record from the committed state.
pub fn load<T: Record>(cc: &TestChaincode, attrs: &[&str]) -> Option<T> {
    EntityStore::get(&cc.database().read(), attrs).expect("load record")
}

/// Writes a record directly, outside any workflow operation.
pub fn seed<T: Record>(cc: &TestChaincode, attrs: &[&str], record: &T) {
    let mut txn = cc.database().write();
    EntityStore::put(&mut txn, attrs, record).expect("seed record");
    txn.commit().expect("commit seed");
}

/// Writes raw bytes under a key, for corrupt-state tests.
pub fn seed_raw(cc: &TestChaincode, key: &str, value: &[u8]) {
    let mut txn = cc.database().write();
    txn.put_state(key, value.to_vec()).expect("seed raw");
    txn.commit().expect("commit seed");
}

/// Issues contract `uuid` for `username`, onboarding the user.
pub fn issue_contract(cc: &TestChaincode, uuid: &str, username: &str) {
    call(cc, "contract_create", &fixtures::contract(uuid, "ct1", username, "secret"));
}
