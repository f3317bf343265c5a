//! Property tests for the claim index kept on each contract.

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use claimledger_test_utils::{fixtures, strategies::arb_username};
use claimledger_types::{Contract, ErrorCode};
use common::*;
use proptest::prelude::*;

fn arb_filings() -> impl Strategy<Value = Vec<&'static str>> {
    proptest::collection::vec(prop::sample::select(vec!["c1", "c2", "c3", "c4"]), 1..12)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn test_claim_index_keeps_first_filing_order(
        username in arb_username(),
        filings in arb_filings(),
    ) {
        let cc = chaincode();
        issue_contract(&cc, "k1", &username);

        let mut expected: Vec<&str> = Vec::new();
        for uuid in &filings {
            let claim = fixtures::claim(uuid, "k1", false);
            let result = cc.invoke("claim_file", &fixtures::args(&claim));
            if expected.contains(uuid) {
                let err = result.expect_err("duplicate filing");
                prop_assert_eq!(err.code(), ErrorCode::DuplicateKey);
            } else {
                prop_assert!(result.is_ok());
                expected.push(uuid);
            }
        }

        let contract: Contract = load(&cc, &[username.as_str(), "k1"]).expect("contract");
        prop_assert_eq!(contract.claim_index, expected);
    }
}
