//! Proptest strategies for claimledger records and keys.
//!
//! Reusable generators for property-based testing across crates.
//!
//! # Usage
//!
//! ```no_run
//! use claimledger_test_utils::strategies;
//! use proptest::prelude::*;
//!
//! proptest! {
//!     #[test]
//!     fn my_property(attrs in strategies::arb_key_attributes(3)) {
//!         // test invariant with random key attributes
//!     }
//! }
//! ```

use chrono::{DateTime, TimeZone, Utc};
use claimledger_types::{Claim, ClaimStatus, Contract, ContractType, Item, User};
use proptest::prelude::*;

/// Generates a key segment of 0-16 printable characters.
///
/// Printable excludes control and unassigned code points, so the segment never
/// contains the composite key separator `U+0000` or the reserved `U+10FFFF`.
pub fn arb_key_segment() -> impl Strategy<Value = String> {
    "\\PC{0,16}"
}

/// Generates 0 to `max` key segments.
pub fn arb_key_attributes(max: usize) -> impl Strategy<Value = Vec<String>> {
    proptest::collection::vec(arb_key_segment(), 0..=max)
}

/// Generates a username matching `[a-z][a-z0-9]{0,11}`.
pub fn arb_username() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9]{0,11}"
}

/// Generates a uuid-shaped identifier.
pub fn arb_uuid() -> impl Strategy<Value = String> {
    "[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}"
}

/// Generates a [`DateTime<Utc>`] between 2020-01-01 and 2030-01-01.
pub fn arb_timestamp() -> impl Strategy<Value = DateTime<Utc>> {
    (1_577_836_800i64..1_893_456_000i64).prop_map(|secs| {
        Utc.timestamp_opt(secs, 0)
            .single()
            .unwrap_or_else(|| DateTime::<Utc>::from(std::time::UNIX_EPOCH))
    })
}

/// Generates a bike shop [`Item`].
pub fn arb_item() -> impl Strategy<Value = Item> {
    (
        1i32..10_000,
        prop::sample::select(vec!["Canyon", "Trek", "Cube", "Gazelle"]),
        "[A-Z][a-z]{2,8} [0-9]{1,2}",
        0u32..1_000_000,
        "[A-Z0-9]{6,12}",
    )
        .prop_map(|(id, brand, model, cents, serial_no)| Item {
            id,
            brand: brand.to_string(),
            model,
            price: f64::from(cents) / 100.0,
            description: String::new(),
            serial_no,
        })
}

/// Generates any [`ClaimStatus`], including `Unknown`.
pub fn arb_claim_status() -> impl Strategy<Value = ClaimStatus> {
    prop::sample::select(vec![
        ClaimStatus::Unknown,
        ClaimStatus::New,
        ClaimStatus::Rejected,
        ClaimStatus::Repair,
        ClaimStatus::Reimbursement,
        ClaimStatus::TheftConfirmed,
    ])
}

/// Generates a [`ContractType`] for one of the shop types `B`, `E`, `S`.
pub fn arb_contract_type() -> impl Strategy<Value = ContractType> {
    (prop::sample::select(vec!["B", "E", "S"]), any::<bool>(), any::<bool>(), 1i32..30)
        .prop_map(|(shop_type, theft_insured, active, min_duration_days)| ContractType {
            shop_type: shop_type.to_string(),
            formula_per_day: "price * 0.01".to_string(),
            max_sum_insured: 5_000.0,
            theft_insured,
            description: format!("{shop_type} insurance"),
            conditions: String::new(),
            active,
            min_duration_days,
            max_duration_days: min_duration_days + 365,
        })
}

/// Generates a [`User`] with non-empty credentials.
pub fn arb_user() -> impl Strategy<Value = User> {
    (arb_username(), "[a-zA-Z0-9]{4,12}", "[A-Z][a-z]{1,8}", "[A-Z][a-z]{1,10}").prop_map(
        |(username, password, first_name, last_name)| User {
            username,
            password,
            first_name,
            last_name,
        },
    )
}

/// Generates a live [`Contract`] with an empty claim index.
pub fn arb_contract() -> impl Strategy<Value = Contract> {
    (arb_username(), arb_uuid(), arb_item(), arb_timestamp(), 1i64..730).prop_map(
        |(username, contract_type_uuid, item, start_date, days)| Contract {
            username,
            contract_type_uuid,
            item,
            start_date,
            end_date: start_date + chrono::Duration::days(days),
            void: false,
            claim_index: Vec::new(),
        },
    )
}

/// Generates a freshly filed [`Claim`] against `contract_uuid`.
pub fn arb_filed_claim(contract_uuid: String) -> impl Strategy<Value = Claim> {
    (arb_timestamp(), "[a-z ]{0,40}", any::<bool>()).prop_map(
        move |(date, description, is_theft)| {
            Claim::filed(contract_uuid.clone(), date, description, is_theft)
        },
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    proptest! {
        #[test]
        fn key_segments_avoid_reserved_characters(segment in arb_key_segment()) {
            prop_assert!(!segment.contains('\u{0}'), "segment contains NUL");
            prop_assert!(!segment.contains('\u{10FFFF}'), "segment contains U+10FFFF");
        }

        #[test]
        fn contracts_end_after_they_start(contract in arb_contract()) {
            prop_assert!(contract.start_date < contract.end_date);
            prop_assert!(!contract.void);
        }

        #[test]
        fn filed_claims_are_new(claim in arb_filed_claim("k1".to_string())) {
            prop_assert_eq!(claim.status, ClaimStatus::New);
            prop_assert_eq!(claim.contract_uuid, "k1");
        }
    }
}
