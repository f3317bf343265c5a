//! Claim filing, processing, and theft investigation flows.

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use claimledger_test_utils::fixtures;
use claimledger_types::{Claim, ClaimStatus, Contract, ErrorCode, RepairOrder};
use common::*;
use serde_json::json;

fn file_claim(cc: &TestChaincode, uuid: &str, contract_uuid: &str, is_theft: bool) {
    call(cc, "claim_file", &fixtures::claim(uuid, contract_uuid, is_theft));
}

#[test]
fn test_filing_records_the_claim_on_the_contract() {
    let cc = chaincode();
    issue_contract(&cc, "k1", "alice");
    file_claim(&cc, "c1", "k1", false);
    file_claim(&cc, "c2", "k1", false);

    let contract: Contract = load(&cc, &["alice", "k1"]).expect("contract");
    assert_eq!(contract.claim_index, vec!["c1", "c2"]);

    let claim: Claim = load(&cc, &["k1", "c1"]).expect("claim");
    assert_eq!(claim.status, ClaimStatus::New);
    assert_eq!(claim.contract_uuid, "k1");
    assert_eq!(claim.description, "Broken chain");
    assert!(!claim.repaired);
}

#[test]
fn test_filing_against_a_missing_contract_fails() {
    let cc = chaincode();
    let err = fail(&cc, "claim_file", &fixtures::claim("c1", "k9", false));
    assert_eq!(err.to_string(), "Contract could not be found");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[test]
fn test_filing_the_same_claim_twice_fails() {
    let cc = chaincode();
    issue_contract(&cc, "k1", "alice");
    file_claim(&cc, "c1", "k1", false);

    let err = fail(&cc, "claim_file", &fixtures::claim("c1", "k1", false));
    assert_eq!(err.code(), ErrorCode::DuplicateKey);
    let contract: Contract = load(&cc, &["alice", "k1"]).expect("contract");
    assert_eq!(contract.claim_index, vec!["c1"]);
}

#[test]
fn test_void_contracts_accept_no_claims() {
    let cc = chaincode();
    seed(&cc, &["alice", "k1"], &Contract { void: true, ..Contract::default() });

    let err = fail(&cc, "claim_file", &fixtures::claim("c1", "k1", false));
    assert_eq!(err.to_string(), "Contract has been voided");
    assert!(load::<Claim>(&cc, &["k1", "c1"]).is_none());
}

#[test]
fn test_claim_listing_filters_by_status() {
    let cc = chaincode();
    issue_contract(&cc, "k1", "alice");
    file_claim(&cc, "c1", "k1", false);
    file_claim(&cc, "c2", "k1", false);
    call(&cc, "claim_process", &fixtures::claim_decision("c2", "k1", "J", 0.0));

    let all = call_bare(&cc, "claim_ls");
    assert_eq!(all.as_array().expect("array").len(), 2);

    let new = call(&cc, "claim_ls", &json!({"status": "n"}));
    let new = new.as_array().expect("array");
    assert_eq!(new.len(), 1);
    assert_eq!(new[0]["uuid"], "c1");
    assert_eq!(new[0]["contract_uuid"], "k1");

    let unfiltered = call(&cc, "claim_ls", &json!({"status": ""}));
    assert_eq!(unfiltered.as_array().expect("array").len(), 2);
}

#[test]
fn test_approving_a_repair_opens_a_repair_order() {
    let cc = chaincode();
    issue_contract(&cc, "k1", "alice");
    file_claim(&cc, "c1", "k1", false);

    call(&cc, "claim_process", &fixtures::claim_decision("c1", "k1", "R", 250.0));

    let claim: Claim = load(&cc, &["k1", "c1"]).expect("claim");
    assert_eq!(claim.status, ClaimStatus::Repair);
    assert_eq!(claim.reimbursable, 0.0);

    let order: RepairOrder = load(&cc, &["c1"]).expect("repair order");
    assert_eq!(order.claim_uuid, "c1");
    assert_eq!(order.contract_uuid, "k1");
    assert_eq!(order.item.serial_no, "CNY123456");
    assert!(!order.ready);

    let pending = call_bare(&cc, "repair_order_ls");
    assert_eq!(pending[0]["uuid"], "c1");

    call(&cc, "repair_order_complete", &json!({"uuid": "c1"}));
    assert!(load::<Claim>(&cc, &["k1", "c1"]).expect("claim").repaired);
}

#[test]
fn test_reimbursement_sets_the_amount() {
    let cc = chaincode();
    issue_contract(&cc, "k1", "alice");
    file_claim(&cc, "c1", "k1", false);

    call(&cc, "claim_process", &fixtures::claim_decision("c1", "k1", "F", 120.5));

    let claim: Claim = load(&cc, &["k1", "c1"]).expect("claim");
    assert_eq!(claim.status, ClaimStatus::Reimbursement);
    assert_eq!(claim.reimbursable, 120.5);
    assert!(!load::<Contract>(&cc, &["alice", "k1"]).expect("contract").void);
}

#[test]
fn test_processed_claims_cannot_be_processed_again() {
    let cc = chaincode();
    issue_contract(&cc, "k1", "alice");
    file_claim(&cc, "c1", "k1", false);
    call(&cc, "claim_process", &fixtures::claim_decision("c1", "k1", "J", 0.0));

    let err = fail(&cc, "claim_process", &fixtures::claim_decision("c1", "k1", "F", 10.0));
    assert_eq!(err.to_string(), "Cannot change the status of a non-new claim");
}

#[test]
fn test_unknown_status_changes_are_rejected() {
    let cc = chaincode();
    issue_contract(&cc, "k1", "alice");
    file_claim(&cc, "c1", "k1", false);

    for status in ["N", "P", "X", ""] {
        let err = fail(&cc, "claim_process", &fixtures::claim_decision("c1", "k1", status, 0.0));
        assert_eq!(err.to_string(), "Unknown status change", "status {status:?}");
    }
    assert_eq!(load::<Claim>(&cc, &["k1", "c1"]).expect("claim").status, ClaimStatus::New);
}

#[test]
fn test_processing_a_missing_claim_fails() {
    let cc = chaincode();
    let err = fail(&cc, "claim_process", &fixtures::claim_decision("c1", "k1", "R", 0.0));
    assert_eq!(err.to_string(), "Claim cannot be found");
}

#[test]
fn test_theft_claims_wait_for_the_police() {
    let cc = chaincode();
    issue_contract(&cc, "k1", "alice");
    file_claim(&cc, "c1", "k1", true);

    let err = fail(&cc, "claim_process", &fixtures::claim_decision("c1", "k1", "F", 999.0));
    assert_eq!(err.to_string(), "Theft must first be confirmed by authorities");

    let reports = call_bare(&cc, "theft_claim_ls");
    assert_eq!(reports, json!([{
        "uuid": "c1",
        "contract_uuid": "k1",
        "item": fixtures::item(),
        "description": "Stolen from the station",
        "name": "Alice Smith",
    }]));
}

#[test]
fn test_confirmed_theft_reimbursement_voids_the_contract() {
    let cc = chaincode();
    issue_contract(&cc, "k1", "alice");
    file_claim(&cc, "c1", "k1", true);

    call(&cc, "theft_claim_process", &fixtures::theft_decision("c1", "k1", true, "POL-2024-17"));
    let claim: Claim = load(&cc, &["k1", "c1"]).expect("claim");
    assert_eq!(claim.status, ClaimStatus::TheftConfirmed);
    assert_eq!(claim.file_reference, "POL-2024-17");
    assert_eq!(call_bare(&cc, "theft_claim_ls"), json!([]));

    let err = fail(&cc, "claim_process", &fixtures::claim_decision("c1", "k1", "R", 0.0));
    assert_eq!(err.to_string(), "Cannot repair stolen items");

    call(&cc, "claim_process", &fixtures::claim_decision("c1", "k1", "F", 1499.0));
    let claim: Claim = load(&cc, &["k1", "c1"]).expect("claim");
    assert_eq!(claim.status, ClaimStatus::Reimbursement);
    assert_eq!(claim.reimbursable, 1499.0);
    assert!(load::<Contract>(&cc, &["alice", "k1"]).expect("contract").void);

    let err = fail(&cc, "claim_file", &fixtures::claim("c2", "k1", false));
    assert_eq!(err.to_string(), "Contract has been voided");
}

#[test]
fn test_police_can_reject_a_theft_report() {
    let cc = chaincode();
    issue_contract(&cc, "k1", "alice");
    file_claim(&cc, "c1", "k1", true);

    call(&cc, "theft_claim_process", &fixtures::theft_decision("c1", "k1", false, "POL-1"));
    assert_eq!(load::<Claim>(&cc, &["k1", "c1"]).expect("claim").status, ClaimStatus::Rejected);

    let decision = fixtures::theft_decision("c1", "k1", true, "POL-2");
    let err = fail(&cc, "theft_claim_process", &decision);
    assert_eq!(err.to_string(), "Claim is either not related to theft, or has invalid status");
}

#[test]
fn test_police_rejected_theft_cannot_be_reimbursed() {
    let cc = chaincode();
    issue_contract(&cc, "k1", "alice");
    file_claim(&cc, "c1", "k1", true);
    call(&cc, "theft_claim_process", &fixtures::theft_decision("c1", "k1", false, "POL-1"));

    let err = fail(&cc, "claim_process", &fixtures::claim_decision("c1", "k1", "F", 1499.0));
    assert_eq!(err.to_string(), "Cannot change the status of a non-new claim");
    assert_eq!(err.code(), ErrorCode::ValidationError);

    let claim: Claim = load(&cc, &["k1", "c1"]).expect("claim");
    assert_eq!(claim.status, ClaimStatus::Rejected);
    assert_eq!(claim.reimbursable, 0.0);
    assert!(!load::<Contract>(&cc, &["alice", "k1"]).expect("contract").void);
}

#[test]
fn test_decided_theft_claims_cannot_be_processed_again() {
    let cc = chaincode();
    issue_contract(&cc, "k1", "alice");
    file_claim(&cc, "c1", "k1", true);
    call(&cc, "theft_claim_process", &fixtures::theft_decision("c1", "k1", true, "POL-1"));
    call(&cc, "claim_process", &fixtures::claim_decision("c1", "k1", "J", 0.0));

    let err = fail(&cc, "claim_process", &fixtures::claim_decision("c1", "k1", "F", 1499.0));
    assert_eq!(err.to_string(), "Cannot change the status of a non-new claim");
    assert!(!load::<Contract>(&cc, &["alice", "k1"]).expect("contract").void);
}

#[test]
fn test_police_cannot_process_ordinary_claims() {
    let cc = chaincode();
    issue_contract(&cc, "k1", "alice");
    file_claim(&cc, "c1", "k1", false);

    let decision = fixtures::theft_decision("c1", "k1", true, "POL-1");
    let err = fail(&cc, "theft_claim_process", &decision);
    assert_eq!(err.code(), ErrorCode::ValidationError);
    let decision = fixtures::theft_decision("c9", "k1", true, "POL-1");
    let err = fail(&cc, "theft_claim_process", &decision);
    assert_eq!(err.to_string(), "Claim cannot be found");
}

#[test]
fn test_theft_listing_tolerates_a_missing_contract() {
    let cc = chaincode();
    seed(&cc, &["k404", "c1"], &Claim {
        contract_uuid: "k404".into(),
        is_theft: true,
        status: ClaimStatus::New,
        ..Claim::default()
    });

    let reports = call_bare(&cc, "theft_claim_ls");
    assert_eq!(reports[0]["uuid"], "c1");
    assert_eq!(reports[0]["name"], "");
    assert_eq!(reports[0]["item"]["brand"], "");
}
