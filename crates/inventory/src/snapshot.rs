//! Serializable ledger state.
//!
//! The persistence collaborator stores and returns this value as-is; it is
//! the only thing needed to reconstruct a ledger. Restoring re-checks every
//! catalog and journal invariant instead of trusting the stored bytes.

use std::collections::{HashMap, HashSet};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use stockroom_core::{DomainError, DomainResult, Entity, ItemId, RecordId};

use crate::catalog::ItemCatalog;
use crate::item::{Item, ItemKey};
use crate::journal::{Destination, ItemRef, Journal, StockInRecord, StockOutRecord, UsageRecord};

/// Plain serialization of the three entity collections.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    /// Number of committed mutations; newer snapshots have larger revisions.
    pub revision: u64,
    /// Items in creation order.
    pub items: Vec<Item>,
    #[serde(default)]
    pub stock_in_records: Vec<StockInRecord>,
    #[serde(default)]
    pub stock_out_records: Vec<StockOutRecord>,
    #[serde(default)]
    pub usage_records: Vec<UsageRecord>,
}

impl LedgerSnapshot {
    pub(crate) fn capture(catalog: &ItemCatalog, journal: &Journal, revision: u64) -> Self {
        Self {
            revision,
            items: catalog.list().to_vec(),
            stock_in_records: journal.stock_ins().to_vec(),
            stock_out_records: journal.stock_outs().to_vec(),
            usage_records: journal.usages().to_vec(),
        }
    }

    /// Validate and split into live state.
    pub(crate) fn into_state(self) -> DomainResult<(ItemCatalog, Journal, u64)> {
        let mut catalog = ItemCatalog::new();
        let mut keys: HashSet<ItemKey> = HashSet::new();
        let mut ids: HashMap<ItemId, ItemKey> = HashMap::new();

        for item in self.items {
            check_item(&item)?;
            let key = item.key();
            if !keys.insert(key.clone()) {
                return Err(DomainError::invariant(format!("duplicate item key {key}")));
            }
            if ids.insert(item.id_typed(), key).is_some() {
                return Err(DomainError::invariant(format!(
                    "duplicate item id {}",
                    item.id_typed()
                )));
            }
            catalog.upsert(item);
        }

        let mut record_ids: HashSet<RecordId> = HashSet::new();
        let mut sequences: HashSet<u64> = HashSet::new();
        let mut check_common = |id: RecordId, sequence: u64, item: &ItemRef| -> DomainResult<()> {
            if !record_ids.insert(id) {
                return Err(DomainError::invariant(format!("duplicate record id {id}")));
            }
            if sequence == 0 || !sequences.insert(sequence) {
                return Err(DomainError::invariant(format!(
                    "record {id} has an invalid or duplicate sequence {sequence}"
                )));
            }
            if !ids.contains_key(&item.item_id) {
                return Err(DomainError::invariant(format!(
                    "record {id} references unknown item {}",
                    item.item_id
                )));
            }
            Ok(())
        };

        for r in &self.stock_in_records {
            check_common(*r.id(), r.sequence, &r.item)?;
            if r.quantity <= 0 || r.total_cost < Decimal::ZERO {
                return Err(DomainError::invariant(format!(
                    "stock-in record {} has non-positive quantity or negative cost",
                    r.id
                )));
            }
        }
        for r in &self.stock_out_records {
            check_common(*r.id(), r.sequence, &r.item)?;
            if r.quantity <= 0 {
                return Err(DomainError::invariant(format!(
                    "stock-out record {} has non-positive quantity",
                    r.id
                )));
            }
            if let Destination::Other(label) = &r.destination {
                if label.trim().is_empty() {
                    return Err(DomainError::invariant(format!(
                        "stock-out record {} has an empty destination",
                        r.id
                    )));
                }
            }
        }
        for r in &self.usage_records {
            check_common(*r.id(), r.sequence, &r.item)?;
            if r.quantity_taken <= 0
                || r.quantity_used <= 0
                || r.quantity_remaining != r.quantity_taken - r.quantity_used
                || r.quantity_remaining < 0
            {
                return Err(DomainError::invariant(format!(
                    "usage record {} does not reconcile",
                    r.id
                )));
            }
        }

        let journal = Journal::from_parts(
            self.stock_in_records,
            self.stock_out_records,
            self.usage_records,
        );
        Ok((catalog, journal, self.revision))
    }
}

fn check_item(item: &Item) -> DomainResult<()> {
    let id = item.id_typed();
    if item.name().trim().is_empty() || item.size().trim().is_empty() {
        return Err(DomainError::invariant(format!("item {id} has an empty name or size")));
    }
    if item.quantity() < 0 {
        return Err(DomainError::invariant(format!(
            "item {id} has negative quantity {}",
            item.quantity()
        )));
    }
    if item.unit_cost() < Decimal::ZERO {
        return Err(DomainError::invariant(format!(
            "item {id} has negative unit cost {}",
            item.unit_cost()
        )));
    }
    if item.min_stock_level() < 0 {
        return Err(DomainError::invariant(format!(
            "item {id} has negative minimum stock level"
        )));
    }
    Ok(())
}
