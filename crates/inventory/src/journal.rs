//! Append-only transaction journal.
//!
//! Every successful stock-in, stock-out and usage event lands here exactly
//! once and is never mutated afterwards. Records reference items by id and
//! carry a name/size snapshot taken at creation, so later changes to the item
//! do not rewrite history.

use core::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use stockroom_core::{Entity, ItemId, RecordId};

use crate::item::Item;

/// Item reference captured at record time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRef {
    pub item_id: ItemId,
    pub name: String,
    pub size: String,
}

impl ItemRef {
    pub fn capture(item: &Item) -> Self {
        Self {
            item_id: item.id_typed(),
            name: item.name().to_string(),
            size: item.size().to_string(),
        }
    }
}

/// Where a stock-out is headed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Destination {
    #[default]
    Kitchen,
    Bar,
    Other(String),
}

impl Destination {
    pub fn label(&self) -> &str {
        match self {
            Destination::Kitchen => "kitchen",
            Destination::Bar => "bar",
            Destination::Other(label) => label,
        }
    }
}

impl core::fmt::Display for Destination {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Destination {
    type Err = core::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "kitchen" => Destination::Kitchen,
            "bar" => Destination::Bar,
            other => Destination::Other(other.to_string()),
        })
    }
}

/// Stock received into an item (created or merged).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockInRecord {
    pub id: RecordId,
    /// Position in the journal (1-based, shared across all record kinds).
    pub sequence: u64,
    pub item: ItemRef,
    pub quantity: i64,
    /// Aggregate amount paid for the lot.
    pub total_cost: Decimal,
    pub supplier: String,
    pub received_by: String,
    /// `true` when this lot created the item.
    pub created_item: bool,
    pub recorded_at: DateTime<Utc>,
}

/// Bulk withdrawal of stock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockOutRecord {
    pub id: RecordId,
    pub sequence: u64,
    pub item: ItemRef,
    pub quantity: i64,
    pub taker: String,
    pub destination: Destination,
    pub recorded_by: String,
    pub recorded_at: DateTime<Utc>,
}

/// Informational usage reconciliation; does not move on-hand stock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageRecord {
    pub id: RecordId,
    pub sequence: u64,
    pub item: ItemRef,
    pub quantity_taken: i64,
    pub quantity_used: i64,
    /// Always `quantity_taken - quantity_used`.
    pub quantity_remaining: i64,
    pub logged_by: String,
    pub recorded_at: DateTime<Utc>,
}

macro_rules! impl_record_entity {
    ($t:ty) => {
        impl Entity for $t {
            type Id = RecordId;

            fn id(&self) -> &Self::Id {
                &self.id
            }
        }
    };
}

impl_record_entity!(StockInRecord);
impl_record_entity!(StockOutRecord);
impl_record_entity!(UsageRecord);

/// Any journal record, tagged by kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum JournalEntry {
    StockIn(StockInRecord),
    StockOut(StockOutRecord),
    Usage(UsageRecord),
}

impl JournalEntry {
    /// Stable entry type identifier (e.g. "inventory.stock_out").
    pub fn entry_type(&self) -> &'static str {
        match self {
            JournalEntry::StockIn(_) => "inventory.stock_in",
            JournalEntry::StockOut(_) => "inventory.stock_out",
            JournalEntry::Usage(_) => "inventory.usage",
        }
    }

    pub fn sequence(&self) -> u64 {
        match self {
            JournalEntry::StockIn(r) => r.sequence,
            JournalEntry::StockOut(r) => r.sequence,
            JournalEntry::Usage(r) => r.sequence,
        }
    }

    pub fn item_id(&self) -> ItemId {
        match self {
            JournalEntry::StockIn(r) => r.item.item_id,
            JournalEntry::StockOut(r) => r.item.item_id,
            JournalEntry::Usage(r) => r.item.item_id,
        }
    }

    pub fn recorded_at(&self) -> DateTime<Utc> {
        match self {
            JournalEntry::StockIn(r) => r.recorded_at,
            JournalEntry::StockOut(r) => r.recorded_at,
            JournalEntry::Usage(r) => r.recorded_at,
        }
    }
}

/// The ledger's transaction log.
///
/// Only `append_*` grows it; there is no removal or in-place update.
#[derive(Debug, Clone, Default)]
pub struct Journal {
    stock_ins: Vec<StockInRecord>,
    stock_outs: Vec<StockOutRecord>,
    usages: Vec<UsageRecord>,
    last_sequence: u64,
}

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sequence number the next appended record will receive.
    pub(crate) fn next_sequence(&self) -> u64 {
        self.last_sequence + 1
    }

    pub(crate) fn append_stock_in(&mut self, record: StockInRecord) -> &StockInRecord {
        self.last_sequence = record.sequence;
        self.stock_ins.push(record);
        &self.stock_ins[self.stock_ins.len() - 1]
    }

    pub(crate) fn append_stock_out(&mut self, record: StockOutRecord) -> &StockOutRecord {
        self.last_sequence = record.sequence;
        self.stock_outs.push(record);
        &self.stock_outs[self.stock_outs.len() - 1]
    }

    pub(crate) fn append_usage(&mut self, record: UsageRecord) -> &UsageRecord {
        self.last_sequence = record.sequence;
        self.usages.push(record);
        &self.usages[self.usages.len() - 1]
    }

    /// Rebuild from persisted collections (already validated by the caller).
    pub(crate) fn from_parts(
        stock_ins: Vec<StockInRecord>,
        stock_outs: Vec<StockOutRecord>,
        usages: Vec<UsageRecord>,
    ) -> Self {
        let last_sequence = stock_ins
            .iter()
            .map(|r| r.sequence)
            .chain(stock_outs.iter().map(|r| r.sequence))
            .chain(usages.iter().map(|r| r.sequence))
            .max()
            .unwrap_or(0);
        Self {
            stock_ins,
            stock_outs,
            usages,
            last_sequence,
        }
    }

    /// Stock-in records in append order.
    pub fn stock_ins(&self) -> &[StockInRecord] {
        &self.stock_ins
    }

    /// Stock-out records in append order.
    pub fn stock_outs(&self) -> &[StockOutRecord] {
        &self.stock_outs
    }

    /// Usage records in append order.
    pub fn usages(&self) -> &[UsageRecord] {
        &self.usages
    }

    pub fn len(&self) -> usize {
        self.stock_ins.len() + self.stock_outs.len() + self.usages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every entry touching `item_id`, in append order.
    pub fn history_for(&self, item_id: ItemId) -> Vec<JournalEntry> {
        let mut entries: Vec<JournalEntry> = self
            .stock_ins
            .iter()
            .filter(|r| r.item.item_id == item_id)
            .cloned()
            .map(JournalEntry::StockIn)
            .chain(
                self.stock_outs
                    .iter()
                    .filter(|r| r.item.item_id == item_id)
                    .cloned()
                    .map(JournalEntry::StockOut),
            )
            .chain(
                self.usages
                    .iter()
                    .filter(|r| r.item.item_id == item_id)
                    .cloned()
                    .map(JournalEntry::Usage),
            )
            .collect();
        entries.sort_by_key(JournalEntry::sequence);
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item_ref(item_id: ItemId) -> ItemRef {
        ItemRef {
            item_id,
            name: "Milk".to_string(),
            size: "1l".to_string(),
        }
    }

    fn usage(journal: &Journal, item_id: ItemId) -> UsageRecord {
        UsageRecord {
            id: RecordId::new(),
            sequence: journal.next_sequence(),
            item: item_ref(item_id),
            quantity_taken: 4,
            quantity_used: 1,
            quantity_remaining: 3,
            logged_by: "Barista".to_string(),
            recorded_at: Utc::now(),
        }
    }

    fn stock_out(journal: &Journal, item_id: ItemId) -> StockOutRecord {
        StockOutRecord {
            id: RecordId::new(),
            sequence: journal.next_sequence(),
            item: item_ref(item_id),
            quantity: 2,
            taker: "Chef".to_string(),
            destination: Destination::Kitchen,
            recorded_by: "Stock Keeper".to_string(),
            recorded_at: Utc::now(),
        }
    }

    #[test]
    fn sequences_are_shared_across_kinds() {
        let mut journal = Journal::new();
        let item_id = ItemId::new();

        let r = usage(&journal, item_id);
        journal.append_usage(r);
        let r = stock_out(&journal, item_id);
        journal.append_stock_out(r);
        let r = usage(&journal, item_id);
        journal.append_usage(r);

        let seqs: Vec<u64> = journal.history_for(item_id).iter().map(|e| e.sequence()).collect();
        assert_eq!(seqs, vec![1, 2, 3]);
        assert_eq!(journal.history_for(item_id)[1].entry_type(), "inventory.stock_out");
    }

    #[test]
    fn history_filters_by_item() {
        let mut journal = Journal::new();
        let a = ItemId::new();
        let b = ItemId::new();

        let r = stock_out(&journal, a);
        journal.append_stock_out(r);
        let r = stock_out(&journal, b);
        journal.append_stock_out(r);

        assert_eq!(journal.history_for(a).len(), 1);
        assert_eq!(journal.history_for(b).len(), 1);
        assert_eq!(journal.len(), 2);
    }

    #[test]
    fn from_parts_resumes_sequence() {
        let item_id = ItemId::new();
        let mut seed = Journal::new();
        let r = stock_out(&seed, item_id);
        seed.append_stock_out(r);
        let r = usage(&seed, item_id);
        seed.append_usage(r);

        let rebuilt = Journal::from_parts(vec![], seed.stock_outs().to_vec(), seed.usages().to_vec());
        assert_eq!(rebuilt.next_sequence(), 3);
    }

    #[test]
    fn destination_parses_known_and_custom_labels() {
        assert_eq!("kitchen".parse::<Destination>().unwrap(), Destination::Kitchen);
        assert_eq!("bar".parse::<Destination>().unwrap(), Destination::Bar);
        assert_eq!(
            "terrace".parse::<Destination>().unwrap(),
            Destination::Other("terrace".to_string())
        );
        assert_eq!(Destination::default(), Destination::Kitchen);
    }
}
