//! Contract-type catalog: bootstrap seeding, listing, creation, activation.

use claimledger_state::{EntityStore, Listed};
use claimledger_types::{ContractType, decode};
use serde::{Deserialize, Serialize};

use super::{done, respond, within_scan_bound};
use crate::{
    args::{self, INVALID_ARGUMENT_COUNT},
    dispatch::Invocation,
    error::{ChaincodeError, Result},
};

/// A catalog entry as exchanged with clients: `{uuid, ...ContractType}`.
#[derive(Debug, Default, Serialize, Deserialize)]
struct CatalogEntry {
    #[serde(default)]
    uuid: String,
    #[serde(flatten)]
    contract_type: ContractType,
}

#[derive(Debug, Default, Deserialize)]
struct CatalogFilter {
    #[serde(default)]
    shop_type: String,
}

#[derive(Debug, Deserialize)]
struct ActivationRequest {
    #[serde(default)]
    uuid: String,
    #[serde(default)]
    active: bool,
}

/// Seeds the catalog from a JSON array of entries, overwriting existing ones.
///
/// Without an argument this is a successful no-op.
pub(crate) fn bootstrap(inv: &mut Invocation<'_>, args: &[String]) -> Result<Vec<u8>> {
    let seed = match args {
        [] => return done(),
        [seed] => seed,
        _ => return Err(ChaincodeError::validation(INVALID_ARGUMENT_COUNT)),
    };

    let entries: Vec<CatalogEntry> = decode(seed.as_bytes())
        .map_err(|source| ChaincodeError::Bootstrap { message: source.to_string() })?;
    for entry in &entries {
        EntityStore::put(inv.ledger_mut(), &[entry.uuid.as_str()], &entry.contract_type)?;
    }

    tracing::info!(contract_types = entries.len(), "Seeded contract type catalog");
    done()
}

/// Lists catalog entries, optionally only those for one shop type.
pub(crate) fn list(inv: &mut Invocation<'_>, args: &[String]) -> Result<Vec<u8>> {
    let filter: CatalogFilter = args::optional(args)?;
    let limit = inv.config().max_scan_results;

    let mut entries = Vec::new();
    for listed in EntityStore::list::<ContractType, _>(inv.ledger(), &[])? {
        let Listed { id, record, .. } = listed?;
        if !filter.shop_type.is_empty() && !record.shop_type.eq_ignore_ascii_case(&filter.shop_type)
        {
            continue;
        }
        entries.push(CatalogEntry { uuid: id, contract_type: record });
        within_scan_bound(entries.len(), limit)?;
    }
    respond(&entries)
}

/// Adds a catalog entry.
///
/// Overwrites an existing entry unless the workflow runs with strict contract
/// types.
pub(crate) fn create(inv: &mut Invocation<'_>, args: &[String]) -> Result<Vec<u8>> {
    let entry: CatalogEntry = args::single(args)?;
    let attrs = [entry.uuid.as_str()];

    if inv.config().strict_contract_types
        && EntityStore::exists::<ContractType, _>(inv.ledger(), &attrs)?
    {
        return Err(ChaincodeError::duplicate("Contract type already exists"));
    }

    EntityStore::put(inv.ledger_mut(), &attrs, &entry.contract_type)?;
    tracing::debug!(uuid = %entry.uuid, "Created contract type");
    done()
}

/// Toggles whether shops may sell a contract type.
pub(crate) fn set_active(inv: &mut Invocation<'_>, args: &[String]) -> Result<Vec<u8>> {
    let request: ActivationRequest = args::single(args)?;
    let attrs = [request.uuid.as_str()];

    let mut contract_type: ContractType =
        EntityStore::require(inv.ledger(), &attrs, "Could not find the contract type")?;
    contract_type.active = request.active;
    EntityStore::put(inv.ledger_mut(), &attrs, &contract_type)?;

    tracing::debug!(uuid = %request.uuid, active = request.active, "Updated contract type");
    done()
}
