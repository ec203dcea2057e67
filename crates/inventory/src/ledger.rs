//! Stock ledger: the single entry point for every mutation.
//!
//! ```text
//! request
//!   ↓
//! 1. authorize actor role for the operation
//!   ↓
//! 2. validate the request value object
//!   ↓
//! 3. (write lock) check business rules against current item state
//!   ↓
//! 4. mutate catalog + append journal record, bump revision
//! ```
//!
//! Steps 1–3 can fail; step 4 cannot, so a failed call leaves the ledger
//! untouched. One `RwLock` guards catalog and journal together: writers are
//! serialized, readers see a consistent snapshot.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use stockroom_auth::{Actor, Permission, authorize};
use stockroom_core::{DomainError, DomainResult, ItemId, RecordId};

use crate::catalog::ItemCatalog;
use crate::costing::{StockPosition, check_merge_bounds, initial_unit_cost, merge_lot};
use crate::item::Item;
use crate::journal::{
    ItemRef, Journal, JournalEntry, StockInRecord, StockOutRecord, UsageRecord,
};
use crate::request::{StockInRequest, StockOutRequest, UsageRequest};
use crate::snapshot::LedgerSnapshot;
use crate::usage::reconcile_claim;

/// What a repeat stock-in does to an existing item's descriptive fields.
///
/// Quantity and cost always merge; supplier and minimum level are
/// last-write-wins unless switched off here.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestockPolicy {
    pub overwrite_supplier: bool,
    pub overwrite_min_stock: bool,
}

impl Default for RestockPolicy {
    fn default() -> Self {
        Self {
            overwrite_supplier: true,
            overwrite_min_stock: true,
        }
    }
}

/// Result of a successful stock-out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StockOutOutcome {
    pub item: Item,
    pub record: StockOutRecord,
    /// The item is at or below its minimum after this withdrawal.
    pub low_stock: bool,
}

/// Catalog-wide totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InventorySummary {
    pub total_items: usize,
    pub low_stock_items: usize,
    pub out_of_stock_items: usize,
    pub total_quantity: i64,
    /// Σ quantity × unit cost.
    pub total_value: Decimal,
}

#[derive(Debug, Default)]
struct LedgerState {
    catalog: ItemCatalog,
    journal: Journal,
    revision: u64,
}

/// Owns the item catalog and transaction journal.
#[derive(Debug, Default)]
pub struct StockLedger {
    state: RwLock<LedgerState>,
    policy: RestockPolicy,
}

impl StockLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: RestockPolicy) -> Self {
        Self {
            state: RwLock::new(LedgerState::default()),
            policy,
        }
    }

    /// Rebuild a ledger from a persisted snapshot, re-checking every invariant.
    pub fn restore(snapshot: LedgerSnapshot, policy: RestockPolicy) -> DomainResult<Self> {
        let (catalog, journal, revision) = snapshot.into_state()?;
        info!(
            items = catalog.len(),
            records = journal.len(),
            revision,
            "ledger restored from snapshot"
        );
        Ok(Self {
            state: RwLock::new(LedgerState {
                catalog,
                journal,
                revision,
            }),
            policy,
        })
    }

    pub fn policy(&self) -> RestockPolicy {
        self.policy
    }

    // Mutations never panic between check and commit, so a poisoned guard
    // still holds consistent state.
    fn read(&self) -> RwLockReadGuard<'_, LedgerState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, LedgerState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Receive a lot. Creates the item on first sight of its `(name, size)`,
    /// otherwise merges quantity and re-averages unit cost.
    #[tracing::instrument(skip_all, fields(actor = actor.identity(), role = %actor.role()))]
    pub fn stock_in(&self, actor: &Actor, request: StockInRequest) -> DomainResult<Item> {
        log_rejection("stock_in", self.apply_stock_in(actor, request))
    }

    fn apply_stock_in(&self, actor: &Actor, request: StockInRequest) -> DomainResult<Item> {
        require(actor, &Permission::STOCK_IN, "stock in")?;
        let req = request.validate()?;

        let mut guard = self.write();
        let state = &mut *guard;

        let (next, created) = match state.catalog.find_by_key(&req.key.name, &req.key.size) {
            Some(existing) => {
                let position = StockPosition {
                    quantity: existing.quantity(),
                    unit_cost: existing.unit_cost(),
                };
                check_merge_bounds(position, req.quantity, req.total_cost)?;

                let mut next = existing.clone();
                next.restock(
                    position.quantity + req.quantity,
                    merge_lot(position, req.quantity, req.total_cost),
                    self.policy.overwrite_supplier.then(|| req.supplier.clone()),
                    self.policy.overwrite_min_stock.then_some(req.min_stock_level),
                    req.occurred_at,
                );
                (next, false)
            }
            None => {
                let item = Item::new(
                    ItemId::new(),
                    req.key.clone(),
                    req.quantity,
                    initial_unit_cost(req.quantity, req.total_cost),
                    req.supplier.clone(),
                    req.min_stock_level,
                    req.occurred_at,
                );
                (item, true)
            }
        };

        let item = state.catalog.upsert(next).clone();
        let record = StockInRecord {
            id: RecordId::new(),
            sequence: state.journal.next_sequence(),
            item: ItemRef::capture(&item),
            quantity: req.quantity,
            total_cost: req.total_cost,
            supplier: req.supplier,
            received_by: actor.identity().to_string(),
            created_item: created,
            recorded_at: req.occurred_at,
        };
        state.journal.append_stock_in(record);
        state.revision += 1;

        info!(
            item_id = %item.id_typed(),
            item = %item.key(),
            received = req.quantity,
            quantity = item.quantity(),
            unit_cost = %item.unit_cost(),
            created,
            "stock received"
        );
        Ok(item)
    }

    /// Withdraw stock. On-hand may reach zero but never go below it.
    #[tracing::instrument(skip_all, fields(actor = actor.identity(), role = %actor.role()))]
    pub fn stock_out(&self, actor: &Actor, request: StockOutRequest) -> DomainResult<StockOutOutcome> {
        log_rejection("stock_out", self.apply_stock_out(actor, request))
    }

    fn apply_stock_out(
        &self,
        actor: &Actor,
        request: StockOutRequest,
    ) -> DomainResult<StockOutOutcome> {
        require(actor, &Permission::STOCK_OUT, "stock out")?;
        let req = request.validate()?;

        let mut guard = self.write();
        let state = &mut *guard;

        let item = state
            .catalog
            .get_mut(req.item_id)
            .ok_or_else(|| DomainError::not_found(req.item_id))?;
        if item.quantity() < req.quantity {
            return Err(DomainError::InsufficientStock {
                item_id: req.item_id,
                requested: req.quantity,
                on_hand: item.quantity(),
            });
        }

        let was_low = item.is_low_stock();
        item.set_quantity(item.quantity() - req.quantity, req.occurred_at);
        let item = item.clone();

        let record = StockOutRecord {
            id: RecordId::new(),
            sequence: state.journal.next_sequence(),
            item: ItemRef::capture(&item),
            quantity: req.quantity,
            taker: req.taker,
            destination: req.destination,
            recorded_by: actor.identity().to_string(),
            recorded_at: req.occurred_at,
        };
        let record = state.journal.append_stock_out(record).clone();
        state.revision += 1;

        info!(
            item_id = %item.id_typed(),
            item = %item.key(),
            removed = record.quantity,
            quantity = item.quantity(),
            destination = %record.destination,
            taker = %record.taker,
            "stock withdrawn"
        );

        let low_stock = item.is_low_stock();
        if low_stock && !was_low {
            warn!(
                item_id = %item.id_typed(),
                item = %item.key(),
                quantity = item.quantity(),
                min_stock_level = item.min_stock_level(),
                "item fell to low stock"
            );
        }

        Ok(StockOutOutcome {
            item,
            record,
            low_stock,
        })
    }

    /// Record a usage reconciliation. Informational only: on-hand quantity is
    /// not changed (a separate stock-out does that).
    #[tracing::instrument(skip_all, fields(actor = actor.identity(), role = %actor.role()))]
    pub fn log_usage(&self, actor: &Actor, request: UsageRequest) -> DomainResult<UsageRecord> {
        log_rejection("log_usage", self.apply_usage(actor, request))
    }

    fn apply_usage(&self, actor: &Actor, request: UsageRequest) -> DomainResult<UsageRecord> {
        require(actor, &Permission::LOG_USAGE, "log usage")?;

        let mut guard = self.write();
        let state = &mut *guard;

        let item = state
            .catalog
            .find_by_id(request.item_id)
            .ok_or_else(|| DomainError::not_found(request.item_id))?;
        let remaining = reconcile_claim(
            request.quantity_taken,
            request.quantity_used,
            request.claimed_remaining,
        )?;

        let record = UsageRecord {
            id: RecordId::new(),
            sequence: state.journal.next_sequence(),
            item: ItemRef::capture(item),
            quantity_taken: request.quantity_taken,
            quantity_used: request.quantity_used,
            quantity_remaining: remaining,
            logged_by: actor.identity().to_string(),
            recorded_at: request.occurred_at,
        };
        let record = state.journal.append_usage(record).clone();
        state.revision += 1;

        info!(
            item_id = %record.item.item_id,
            taken = record.quantity_taken,
            used = record.quantity_used,
            remaining = record.quantity_remaining,
            "usage logged"
        );
        Ok(record)
    }

    /// Every item in creation order.
    pub fn list(&self) -> Vec<Item> {
        self.read().catalog.list().to_vec()
    }

    pub fn find_by_id(&self, id: ItemId) -> Option<Item> {
        self.read().catalog.find_by_id(id).cloned()
    }

    pub fn find_by_key(&self, name: &str, size: &str) -> Option<Item> {
        self.read().catalog.find_by_key(name, size).cloned()
    }

    /// Items at or below their minimum, most severe first
    /// (`quantity - min_stock_level` ascending, then name, then size).
    pub fn low_stock_alerts(&self) -> Vec<Item> {
        let mut low: Vec<Item> = self
            .read()
            .catalog
            .list()
            .iter()
            .filter(|item| item.is_low_stock())
            .cloned()
            .collect();
        low.sort_by(|a, b| {
            a.headroom()
                .cmp(&b.headroom())
                .then_with(|| a.name().cmp(b.name()))
                .then_with(|| a.size().cmp(b.size()))
        });
        low
    }

    pub fn summary(&self) -> InventorySummary {
        let state = self.read();
        let items = state.catalog.list();
        InventorySummary {
            total_items: items.len(),
            low_stock_items: items.iter().filter(|i| i.is_low_stock()).count(),
            out_of_stock_items: items.iter().filter(|i| i.quantity() == 0).count(),
            total_quantity: items
                .iter()
                .fold(0i64, |acc, i| acc.saturating_add(i.quantity())),
            total_value: items
                .iter()
                .fold(Decimal::ZERO, |acc, i| acc.saturating_add(i.total_value())),
        }
    }

    /// Stock-in history, newest first.
    pub fn stock_in_records(&self) -> Vec<StockInRecord> {
        self.read().journal.stock_ins().iter().rev().cloned().collect()
    }

    /// Stock-out history, newest first.
    pub fn stock_out_records(&self) -> Vec<StockOutRecord> {
        self.read().journal.stock_outs().iter().rev().cloned().collect()
    }

    /// Usage history, newest first.
    pub fn usage_records(&self) -> Vec<UsageRecord> {
        self.read().journal.usages().iter().rev().cloned().collect()
    }

    /// Every journal entry for one item, oldest first.
    pub fn history_for(&self, item_id: ItemId) -> Vec<JournalEntry> {
        self.read().journal.history_for(item_id)
    }

    /// Number of committed mutations.
    pub fn revision(&self) -> u64 {
        self.read().revision
    }

    /// Consistent copy of the full state for the persistence collaborator.
    pub fn snapshot(&self) -> LedgerSnapshot {
        let state = self.read();
        LedgerSnapshot::capture(&state.catalog, &state.journal, state.revision)
    }
}

fn require(actor: &Actor, permission: &Permission, operation: &str) -> DomainResult<()> {
    authorize(actor, permission)
        .map_err(|_| DomainError::authorization(actor.role().as_str(), operation))
}

fn log_rejection<T>(operation: &'static str, result: DomainResult<T>) -> DomainResult<T> {
    if let Err(err) = &result {
        warn!(operation, kind = err.kind(), error = %err, "ledger operation rejected");
    }
    result
}
