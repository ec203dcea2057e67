//! Inventory ledger engine.
//!
//! Owns stock items, applies stock-in / stock-out / usage transactions, keeps
//! the weighted-average unit cost and an append-only journal. Pure domain
//! logic: no IO, no HTTP, no storage.

pub mod catalog;
pub mod costing;
pub mod item;
pub mod journal;
pub mod ledger;
pub mod request;
pub mod snapshot;
pub mod usage;

pub use catalog::ItemCatalog;
pub use costing::{StockPosition, initial_unit_cost, merge_lot};
pub use item::{Item, ItemKey};
pub use journal::{
    Destination, ItemRef, Journal, JournalEntry, StockInRecord, StockOutRecord, UsageRecord,
};
pub use ledger::{InventorySummary, RestockPolicy, StockLedger, StockOutOutcome};
pub use request::{StockInRequest, StockOutRequest, UsageRequest};
pub use snapshot::LedgerSnapshot;
pub use usage::reconcile;
