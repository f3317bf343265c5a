//! Claim filing and the insurer's decisions.

use chrono::{DateTime, Utc};
use claimledger_state::{EntityStore, Listed};
use claimledger_types::{Claim, ClaimStatus, Contract, RepairOrder};
use serde::{Deserialize, Serialize};

use super::{attrs, done, respond, within_scan_bound};
use crate::{
    args,
    dispatch::Invocation,
    error::{ChaincodeError, Result},
};

pub(crate) const CLAIM_NOT_FOUND: &str = "Claim cannot be found";
const CONTRACT_NOT_FOUND: &str = "Contract could not be found";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FilingRequest {
    uuid: String,
    contract_uuid: String,
    date: DateTime<Utc>,
    description: String,
    is_theft: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ClaimFilter {
    status: ClaimStatus,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Decision {
    uuid: String,
    contract_uuid: String,
    status: ClaimStatus,
    reimbursable: f64,
}

#[derive(Debug, Serialize)]
struct ClaimView {
    uuid: String,
    #[serde(flatten)]
    claim: Claim,
}

/// Files a new claim against a live contract and records it in the
/// contract's claim index.
pub(crate) fn file(inv: &mut Invocation<'_>, args: &[String]) -> Result<Vec<u8>> {
    let request: FilingRequest = args::single(args)?;

    let Listed { attributes, record: mut contract, .. } =
        EntityStore::find_by_id::<Contract, _>(inv.ledger(), &request.contract_uuid)?
            .ok_or_else(|| ChaincodeError::not_found(CONTRACT_NOT_FOUND))?;
    if contract.void {
        return Err(ChaincodeError::validation("Contract has been voided"));
    }
    if !contract.record_claim(&request.uuid) {
        return Err(ChaincodeError::duplicate("Claim has already been filed"));
    }

    let claim = Claim::filed(
        request.contract_uuid.as_str(),
        request.date,
        request.description,
        request.is_theft,
    );
    EntityStore::put(
        inv.ledger_mut(),
        &[request.contract_uuid.as_str(), request.uuid.as_str()],
        &claim,
    )?;
    EntityStore::put(inv.ledger_mut(), &attrs(&attributes), &contract)?;

    tracing::debug!(
        contract_uuid = %request.contract_uuid,
        uuid = %request.uuid,
        is_theft = claim.is_theft,
        "Filed claim"
    );
    done()
}

/// Lists claims, optionally only those in one status.
pub(crate) fn list(inv: &mut Invocation<'_>, args: &[String]) -> Result<Vec<u8>> {
    let filter: ClaimFilter = args::optional(args)?;
    let limit = inv.config().max_scan_results;

    let mut claims = Vec::new();
    for listed in EntityStore::list::<Claim, _>(inv.ledger(), &[])? {
        let Listed { id, record, .. } = listed?;
        if filter.status != ClaimStatus::Unknown && record.status != filter.status {
            continue;
        }
        claims.push(ClaimView { uuid: id, claim: record });
        within_scan_bound(claims.len(), limit)?;
    }
    respond(&claims)
}

/// Applies the insurer's decision to a claim.
///
/// A plain claim must still be new. A theft claim must have been confirmed by
/// the police and not yet decided, and can never be repaired. Approving a repair opens a repair
/// order for the contract's item; reimbursing a theft voids the contract.
pub(crate) fn process(inv: &mut Invocation<'_>, args: &[String]) -> Result<Vec<u8>> {
    let decision: Decision = args::single(args)?;
    let claim_attrs = [decision.contract_uuid.as_str(), decision.uuid.as_str()];

    let mut claim: Claim = EntityStore::require(inv.ledger(), &claim_attrs, CLAIM_NOT_FOUND)?;
    if claim.awaits_investigation() {
        return Err(ChaincodeError::validation("Theft must first be confirmed by authorities"));
    }
    let open = if claim.is_theft { ClaimStatus::TheftConfirmed } else { ClaimStatus::New };
    if claim.status != open {
        return Err(ChaincodeError::validation("Cannot change the status of a non-new claim"));
    }

    match decision.status {
        ClaimStatus::Repair => {
            if claim.is_theft {
                return Err(ChaincodeError::validation("Cannot repair stolen items"));
            }
            let contract = find_contract(inv, &decision.contract_uuid)?;
            claim.reimbursable = 0.0;
            let order = RepairOrder::pending(
                decision.uuid.as_str(),
                decision.contract_uuid.as_str(),
                contract.record.item,
            );
            EntityStore::put(inv.ledger_mut(), &[decision.uuid.as_str()], &order)?;
        },
        ClaimStatus::Reimbursement => {
            claim.reimbursable = decision.reimbursable;
            if claim.is_theft {
                let Listed { attributes, record: mut contract, .. } =
                    find_contract(inv, &decision.contract_uuid)?;
                contract.void = true;
                EntityStore::put(inv.ledger_mut(), &attrs(&attributes), &contract)?;
                tracing::debug!(contract_uuid = %decision.contract_uuid, "Voided contract");
            }
        },
        ClaimStatus::Rejected => claim.reimbursable = 0.0,
        ClaimStatus::Unknown | ClaimStatus::New | ClaimStatus::TheftConfirmed => {
            return Err(ChaincodeError::validation("Unknown status change"));
        },
    }

    claim.status = decision.status;
    EntityStore::put(inv.ledger_mut(), &claim_attrs, &claim)?;
    tracing::debug!(uuid = %decision.uuid, status = %claim.status, "Processed claim");
    done()
}

fn find_contract(inv: &Invocation<'_>, contract_uuid: &str) -> Result<Listed<Contract>> {
    EntityStore::find_by_id::<Contract, _>(inv.ledger(), contract_uuid)?
        .ok_or_else(|| ChaincodeError::not_found(CONTRACT_NOT_FOUND))
}
