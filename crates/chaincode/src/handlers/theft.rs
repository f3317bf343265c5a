//! Police investigation of theft claims.

use claimledger_state::{EntityStore, Listed};
use claimledger_types::{Claim, ClaimStatus, Contract, Item, User};
use serde::{Deserialize, Serialize};

use super::{claim::CLAIM_NOT_FOUND, done, respond, within_scan_bound};
use crate::{
    args,
    dispatch::Invocation,
    error::{ChaincodeError, Result},
};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Investigation {
    uuid: String,
    contract_uuid: String,
    is_theft: bool,
    file_reference: String,
}

#[derive(Debug, Serialize)]
struct TheftReport {
    uuid: String,
    contract_uuid: String,
    item: Item,
    description: String,
    name: String,
}

/// Lists theft claims awaiting a police decision, with the stolen item and
/// the policyholder's name.
pub(crate) fn list(inv: &mut Invocation<'_>, _args: &[String]) -> Result<Vec<u8>> {
    let limit = inv.config().max_scan_results;
    let ledger = inv.ledger();

    let mut reports = Vec::new();
    for listed in EntityStore::list::<Claim, _>(ledger, &[])? {
        let Listed { id, record: claim, .. } = listed?;
        if !claim.awaits_investigation() {
            continue;
        }

        let mut report = TheftReport {
            uuid: id,
            contract_uuid: claim.contract_uuid,
            item: Item::default(),
            description: claim.description,
            name: String::new(),
        };
        if let Some(contract) =
            EntityStore::find_by_id::<Contract, _>(ledger, &report.contract_uuid)?
        {
            if let Some(user) =
                EntityStore::get::<User, _>(ledger, &[contract.record.username.as_str()])?
            {
                report.name = user.full_name();
            }
            report.item = contract.record.item;
        }

        reports.push(report);
        within_scan_bound(reports.len(), limit)?;
    }
    respond(&reports)
}

/// Records the police decision on a theft claim.
pub(crate) fn process(inv: &mut Invocation<'_>, args: &[String]) -> Result<Vec<u8>> {
    let investigation: Investigation = args::single(args)?;
    let claim_attrs = [investigation.contract_uuid.as_str(), investigation.uuid.as_str()];

    let mut claim: Claim = EntityStore::require(inv.ledger(), &claim_attrs, CLAIM_NOT_FOUND)?;
    if !claim.awaits_investigation() {
        return Err(ChaincodeError::validation(
            "Claim is either not related to theft, or has invalid status",
        ));
    }

    claim.status =
        if investigation.is_theft { ClaimStatus::TheftConfirmed } else { ClaimStatus::Rejected };
    claim.file_reference = investigation.file_reference;
    EntityStore::put(inv.ledger_mut(), &claim_attrs, &claim)?;

    tracing::debug!(uuid = %investigation.uuid, status = %claim.status, "Investigated theft claim");
    done()
}
