//! Repair shop flows.

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use claimledger_state::EntityStore;
use claimledger_types::{Claim, ClaimStatus, ErrorCode, Item, RepairOrder};
use common::*;
use serde_json::json;

fn seed_order(cc: &TestChaincode, uuid: &str, claim_uuid: &str, contract_uuid: &str) {
    let item = Item { id: 7, brand: "Trek".into(), model: "FX 3".into(), ..Item::default() };
    seed(cc, &[uuid], &RepairOrder::pending(claim_uuid, contract_uuid, item));
}

#[test]
fn test_completing_an_order_marks_the_claim_repaired() {
    let cc = chaincode();
    seed_order(&cc, "r1", "c1", "k1");
    seed(&cc, &["k1", "c1"], &Claim { status: ClaimStatus::Repair, ..Claim::default() });

    let payload = cc
        .invoke("repair_order_complete", &[json!({"uuid": "r1"}).to_string()])
        .expect("complete");
    assert!(payload.is_empty());

    assert_eq!(call_bare(&cc, "repair_order_ls"), json!([]));
    let order: RepairOrder = load(&cc, &["r1"]).expect("order");
    assert!(order.ready);
    let claim: Claim = load(&cc, &["k1", "c1"]).expect("claim");
    assert!(claim.repaired);
}

#[test]
fn test_completing_a_missing_order_fails() {
    let cc = chaincode();
    let err = fail(&cc, "repair_order_complete", &json!({"uuid": "missing"}));
    assert_eq!(err.to_string(), "Could not find the repair order");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[test]
fn test_completing_an_unlinked_order_succeeds_without_creating_a_claim() {
    let cc = chaincode();
    seed_order(&cc, "r2", "c404", "k404");

    call(&cc, "repair_order_complete", &json!({"uuid": "r2"}));

    assert!(load::<RepairOrder>(&cc, &["r2"]).expect("order").ready);
    assert!(load::<Claim>(&cc, &["k404", "c404"]).is_none());
}

#[test]
fn test_completing_twice_succeeds() {
    let cc = chaincode();
    seed_order(&cc, "r1", "c1", "k1");
    call(&cc, "repair_order_complete", &json!({"uuid": "r1"}));
    call(&cc, "repair_order_complete", &json!({"uuid": "r1"}));
    assert!(load::<RepairOrder>(&cc, &["r1"]).expect("order").ready);
}

#[test]
fn test_listing_projects_pending_orders_in_key_order() {
    let cc = chaincode();
    seed_order(&cc, "r2", "c2", "k1");
    seed_order(&cc, "r1", "c1", "k1");
    seed_order(&cc, "r3", "c3", "k2");
    call(&cc, "repair_order_complete", &json!({"uuid": "r3"}));

    let listed = call_bare(&cc, "repair_order_ls");
    let orders = listed.as_array().expect("array");
    assert_eq!(orders.len(), 2);
    assert_eq!(orders[0]["uuid"], "r1");
    assert_eq!(orders[1]["uuid"], "r2");
    assert_eq!(orders[0]["claim_uuid"], "c1");
    assert_eq!(orders[0]["contract_uuid"], "k1");
    assert_eq!(orders[0]["item"]["brand"], "Trek");
    assert!(orders[0].get("ready").is_none());
}

#[test]
fn test_default_config_lists_every_pending_order() {
    let cc = chaincode();
    let mut txn = cc.database().write();
    for n in 0..10_001 {
        let claim_uuid = format!("c{n:05}");
        let order = RepairOrder::pending(claim_uuid.as_str(), "k1", Item::default());
        EntityStore::put(&mut txn, &[claim_uuid.as_str()], &order).expect("seed order");
    }
    txn.commit().expect("commit orders");

    let listed = call_bare(&cc, "repair_order_ls");
    let listed = listed.as_array().expect("array");
    assert_eq!(listed.len(), 10_001);
    assert_eq!(listed[10_000]["uuid"], "c10000");
}

#[test]
fn test_completion_requires_exactly_one_argument() {
    let cc = chaincode();
    let err = cc.invoke("repair_order_complete", &[]).unwrap_err();
    assert_eq!(err.to_string(), "Invalid argument count.");
}

#[test]
fn test_corrupt_order_fails_the_listing() {
    let cc = chaincode();
    let key = claimledger_state::EntityKind::RepairOrder.key(&["r1"]).expect("key");
    seed_raw(&cc, &key, b"not json");

    let err = cc.invoke("repair_order_ls", &[]).unwrap_err();
    assert_eq!(err.code(), ErrorCode::ReadError);
}
