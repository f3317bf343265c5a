//! Contract issuance and listing.

use chrono::{DateTime, Utc};
use claimledger_state::{EntityStore, Listed};
use claimledger_types::{Claim, Contract, Item, User};
use serde::{Deserialize, Serialize};

use super::{done, respond, user, within_scan_bound};
use crate::{
    args,
    dispatch::Invocation,
    error::{ChaincodeError, Result},
};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ContractRequest {
    uuid: String,
    contract_type_uuid: String,
    username: String,
    password: String,
    first_name: String,
    last_name: String,
    item: Item,
    start_date: DateTime<Utc>,
    end_date: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize)]
struct ContractFilter {
    #[serde(default)]
    username: String,
}

#[derive(Debug, Serialize)]
struct ClaimView {
    uuid: String,
    #[serde(flatten)]
    claim: Claim,
}

#[derive(Debug, Serialize)]
struct ContractView {
    uuid: String,
    #[serde(flatten)]
    contract: Contract,
    claims: Vec<ClaimView>,
}

/// Issues a contract, onboarding the user when credentials are supplied.
///
/// With a username and password the user is created if absent and the
/// resulting credentials are returned. Otherwise the username must already
/// exist and the payload is empty.
pub(crate) fn create(inv: &mut Invocation<'_>, args: &[String]) -> Result<Vec<u8>> {
    let request: ContractRequest = args::single(args)?;

    let onboard = !request.username.is_empty() && !request.password.is_empty();
    let onboarded = if onboard {
        let user = User {
            username: request.username.clone(),
            password: request.password.clone(),
            first_name: request.first_name.clone(),
            last_name: request.last_name.clone(),
        };
        Some(user::get_or_create(inv, user)?)
    } else {
        if !EntityStore::exists::<User, _>(inv.ledger(), &[request.username.as_str()])? {
            return Err(ChaincodeError::validation("User with this username does not exist."));
        }
        None
    };

    let contract = Contract {
        username: request.username.clone(),
        contract_type_uuid: request.contract_type_uuid,
        item: request.item,
        start_date: request.start_date,
        end_date: request.end_date,
        void: false,
        claim_index: Vec::new(),
    };
    EntityStore::put(
        inv.ledger_mut(),
        &[request.username.as_str(), request.uuid.as_str()],
        &contract,
    )?;
    tracing::debug!(username = %request.username, uuid = %request.uuid, "Issued contract");

    match onboarded {
        Some(user) => respond(&user.credentials()),
        None => done(),
    }
}

/// Lists contracts with their claims, optionally for one user only.
pub(crate) fn list(inv: &mut Invocation<'_>, args: &[String]) -> Result<Vec<u8>> {
    let filter: ContractFilter = args::optional(args)?;
    let limit = inv.config().max_scan_results;
    let ledger = inv.ledger();

    let scope: Vec<&str> =
        if filter.username.is_empty() { Vec::new() } else { vec![filter.username.as_str()] };

    let mut contracts = Vec::new();
    for listed in EntityStore::list::<Contract, _>(ledger, &scope)? {
        let Listed { id, record, .. } = listed?;

        let mut claims = Vec::with_capacity(record.claim_index.len());
        for claim_uuid in &record.claim_index {
            if let Some(claim) =
                EntityStore::get::<Claim, _>(ledger, &[id.as_str(), claim_uuid.as_str()])?
            {
                claims.push(ClaimView { uuid: claim_uuid.clone(), claim });
            }
        }

        contracts.push(ContractView { uuid: id, contract: record, claims });
        within_scan_bound(contracts.len(), limit)?;
    }
    respond(&contracts)
}
