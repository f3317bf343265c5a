//! Repair order fulfillment.

use claimledger_state::{EntityStore, Listed};
use claimledger_types::{Claim, Item, RepairOrder};
use serde::{Deserialize, Serialize};

use super::{done, respond, within_scan_bound};
use crate::{args, dispatch::Invocation, error::Result};

#[derive(Debug, Default, Deserialize)]
struct Completion {
    #[serde(default)]
    uuid: String,
}

#[derive(Debug, Serialize)]
struct PendingOrder {
    uuid: String,
    claim_uuid: String,
    contract_uuid: String,
    item: Item,
}

/// Lists repair orders that are not yet ready, in key order.
pub(crate) fn list(inv: &mut Invocation<'_>, _args: &[String]) -> Result<Vec<u8>> {
    let limit = inv.config().max_scan_results;

    let mut pending = Vec::new();
    for listed in EntityStore::list::<RepairOrder, _>(inv.ledger(), &[])? {
        let Listed { id, record, .. } = listed?;
        if record.ready {
            continue;
        }
        pending.push(PendingOrder {
            uuid: id,
            claim_uuid: record.claim_uuid,
            contract_uuid: record.contract_uuid,
            item: record.item,
        });
        within_scan_bound(pending.len(), limit)?;
    }
    respond(&pending)
}

/// Marks a repair order ready and flags the linked claim as repaired.
///
/// The claim update is best-effort: an order whose claim cannot be found
/// still completes, and no claim is created. Completing an order twice
/// succeeds.
pub(crate) fn complete(inv: &mut Invocation<'_>, args: &[String]) -> Result<Vec<u8>> {
    let completion: Completion = args::single(args)?;
    let order_attrs = [completion.uuid.as_str()];

    let mut order: RepairOrder =
        EntityStore::require(inv.ledger(), &order_attrs, "Could not find the repair order")?;
    order.ready = true;
    EntityStore::put(inv.ledger_mut(), &order_attrs, &order)?;

    let claim_attrs = [order.contract_uuid.as_str(), order.claim_uuid.as_str()];
    match EntityStore::get::<Claim, _>(inv.ledger(), &claim_attrs)? {
        Some(mut claim) => {
            claim.repaired = true;
            EntityStore::put(inv.ledger_mut(), &claim_attrs, &claim)?;
        },
        None => {
            tracing::debug!(
                uuid = %completion.uuid,
                claim_uuid = %order.claim_uuid,
                "Repair order has no linked claim"
            );
        },
    }

    tracing::debug!(uuid = %completion.uuid, "Completed repair order");
    done()
}
