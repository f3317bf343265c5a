//! Entity records stored on the ledger.
//!
//! Every record is a self-contained JSON document. Identifiers that form the
//! record's composite key (contract uuid, claim uuid, ...) are not repeated in
//! the record unless the workflow needs them to follow a link.
//!
//! All records decode leniently: absent fields take their zero value, the same
//! way the external clients have always sent partial documents.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// The insured item, copied onto contracts and repair orders.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Item {
    /// Shop-local item number.
    pub id: i32,
    /// Manufacturer.
    pub brand: String,
    /// Model name.
    pub model: String,
    /// Purchase price.
    pub price: f64,
    /// Free-form description.
    pub description: String,
    /// Serial number.
    pub serial_no: String,
}

/// A product in the insurer's catalog.
///
/// The catalog uuid is the composite key attribute and is not stored here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContractType {
    /// Kind of shop allowed to sell this contract (e.g. `"B"` for bikes).
    pub shop_type: String,
    /// Premium formula evaluated per insured day.
    pub formula_per_day: String,
    /// Upper bound for a single reimbursement.
    pub max_sum_insured: f64,
    /// Whether theft is covered.
    pub theft_insured: bool,
    /// Human-readable description.
    pub description: String,
    /// Terms and conditions.
    pub conditions: String,
    /// Whether shops may currently sell this contract type.
    pub active: bool,
    /// Shortest allowed contract duration.
    pub min_duration_days: i32,
    /// Longest allowed contract duration.
    pub max_duration_days: i32,
}

/// A policyholder account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    /// Unique login name; also the composite key attribute.
    pub username: String,
    /// Login password.
    pub password: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
}

impl User {
    /// The username/password pair returned to shops after onboarding.
    pub fn credentials(&self) -> Credentials {
        Credentials { username: self.username.clone(), password: self.password.clone() }
    }

    /// `"first last"`, trimmed when either part is missing.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }
}

/// Username/password pair.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Credentials {
    /// Login name.
    pub username: String,
    /// Login password.
    pub password: String,
}

/// An insurance contract sold by a shop.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Contract {
    /// Owning user.
    pub username: String,
    /// Catalog entry this contract instantiates.
    pub contract_type_uuid: String,
    /// Insured item.
    pub item: Item,
    /// Coverage start.
    pub start_date: DateTime<Utc>,
    /// Coverage end.
    pub end_date: DateTime<Utc>,
    /// Terminal flag; a void contract accepts no further claims.
    pub void: bool,
    /// Claim uuids filed against this contract, in filing order.
    pub claim_index: Vec<String>,
}

impl Contract {
    /// Whether `claim_uuid` has already been filed against this contract.
    pub fn holds_claim(&self, claim_uuid: &str) -> bool {
        self.claim_index.iter().any(|uuid| uuid == claim_uuid)
    }

    /// Appends `claim_uuid` to the claim index.
    ///
    /// Returns `false` and leaves the index untouched if it is already present.
    pub fn record_claim(&mut self, claim_uuid: &str) -> bool {
        if self.holds_claim(claim_uuid) {
            return false;
        }
        self.claim_index.push(claim_uuid.to_string());
        true
    }
}

/// Processing state of a claim.
///
/// Serialized as a one-letter code; decoding is case-insensitive and maps any
/// unrecognized code to [`ClaimStatus::Unknown`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ClaimStatus {
    /// No status, or an unrecognized code.
    #[default]
    Unknown,
    /// Filed and awaiting a decision.
    New,
    /// Rejected by the insurer or the police.
    Rejected,
    /// Approved for repair; a repair order exists.
    Repair,
    /// Approved for reimbursement.
    Reimbursement,
    /// Theft confirmed by the police; awaiting the insurer.
    TheftConfirmed,
}

impl ClaimStatus {
    /// Wire code for this status.
    pub const fn code(self) -> &'static str {
        match self {
            Self::Unknown => "",
            Self::New => "N",
            Self::Rejected => "J",
            Self::Repair => "R",
            Self::Reimbursement => "F",
            Self::TheftConfirmed => "P",
        }
    }

    /// Parses a wire code, ignoring case.
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_ascii_uppercase().as_str() {
            "N" => Self::New,
            "J" => Self::Rejected,
            "R" => Self::Repair,
            "F" => Self::Reimbursement,
            "P" => Self::TheftConfirmed,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl Serialize for ClaimStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

impl<'de> Deserialize<'de> for ClaimStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = String::deserialize(deserializer)?;
        Ok(Self::from_code(&code))
    }
}

/// A claim filed against a contract.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Claim {
    /// Contract the claim was filed against.
    pub contract_uuid: String,
    /// When the incident happened.
    pub date: DateTime<Utc>,
    /// Incident description.
    pub description: String,
    /// Whether the claim reports a theft.
    pub is_theft: bool,
    /// Processing state.
    pub status: ClaimStatus,
    /// Amount approved for reimbursement.
    pub reimbursable: f64,
    /// Set once the linked repair order completes.
    pub repaired: bool,
    /// Police file reference for theft claims.
    pub file_reference: String,
}

impl Claim {
    /// A freshly filed claim in [`ClaimStatus::New`].
    pub fn filed(
        contract_uuid: impl Into<String>,
        date: DateTime<Utc>,
        description: impl Into<String>,
        is_theft: bool,
    ) -> Self {
        Self {
            contract_uuid: contract_uuid.into(),
            date,
            description: description.into(),
            is_theft,
            status: ClaimStatus::New,
            ..Self::default()
        }
    }

    /// Whether the claim is waiting for a police decision.
    pub fn awaits_investigation(&self) -> bool {
        self.is_theft && self.status == ClaimStatus::New
    }
}

/// Work order for a repair shop, keyed by the claim uuid it fulfils.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepairOrder {
    /// Claim this order fulfils.
    pub claim_uuid: String,
    /// Contract the claim belongs to.
    pub contract_uuid: String,
    /// Item to repair.
    pub item: Item,
    /// Set by the repair shop when the work is done.
    pub ready: bool,
}

impl RepairOrder {
    /// A pending order for the given claim.
    pub fn pending(
        claim_uuid: impl Into<String>,
        contract_uuid: impl Into<String>,
        item: Item,
    ) -> Self {
        Self {
            claim_uuid: claim_uuid.into(),
            contract_uuid: contract_uuid.into(),
            item,
            ready: false,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::codec::{decode, encode};

    #[test]
    fn test_claim_status_codes() {
        let all = [
            ClaimStatus::Unknown,
            ClaimStatus::New,
            ClaimStatus::Rejected,
            ClaimStatus::Repair,
            ClaimStatus::Reimbursement,
            ClaimStatus::TheftConfirmed,
        ];
        for status in all {
            assert_eq!(ClaimStatus::from_code(status.code()), status);
        }
    }

    #[test]
    fn test_claim_status_decoding_is_lenient() {
        assert_eq!(decode::<ClaimStatus>(br#""r""#).expect("decode"), ClaimStatus::Repair);
        assert_eq!(decode::<ClaimStatus>(br#""X""#).expect("decode"), ClaimStatus::Unknown);
        assert_eq!(encode(&ClaimStatus::TheftConfirmed).expect("encode"), br#""P""#.to_vec());
    }

    #[test]
    fn test_partial_claim_document_decodes() {
        let claim: Claim =
            decode(br#"{"contract_uuid":"k1","status":"N","is_theft":true}"#).expect("decode");
        assert_eq!(claim.contract_uuid, "k1");
        assert_eq!(claim.status, ClaimStatus::New);
        assert!(claim.awaits_investigation());
        assert!(!claim.repaired);
        assert_eq!(claim.date, DateTime::<Utc>::default());
    }

    #[test]
    fn test_record_claim_rejects_duplicates() {
        let mut contract = Contract::default();
        assert!(contract.record_claim("c1"));
        assert!(contract.record_claim("c2"));
        assert!(!contract.record_claim("c1"));
        assert_eq!(contract.claim_index, vec!["c1", "c2"]);
    }

    #[test]
    fn test_contract_dates_use_rfc3339() {
        let contract: Contract = decode(
            br#"{"username":"alice","start_date":"2024-01-01T00:00:00Z","end_date":"2025-01-01T00:00:00Z"}"#,
        )
        .expect("decode");
        assert!(contract.start_date < contract.end_date);
        let json = String::from_utf8(encode(&contract).expect("encode")).expect("utf8");
        assert!(json.contains(r#""start_date":"2024-01-01T00:00:00Z""#), "got: {json}");
    }

    #[test]
    fn test_full_name_trims_missing_parts() {
        let user = User { first_name: "Ada".into(), ..User::default() };
        assert_eq!(user.full_name(), "Ada");
        let user = User { first_name: "Ada".into(), last_name: "Lovelace".into(), ..User::default() };
        assert_eq!(user.full_name(), "Ada Lovelace");
    }
}
