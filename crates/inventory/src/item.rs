use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use stockroom_core::{Entity, ItemId};

/// Natural key of an item: exact, case-sensitive `(name, size)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemKey {
    pub name: String,
    pub size: String,
}

impl ItemKey {
    pub fn new(name: impl Into<String>, size: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            size: size.into(),
        }
    }
}

impl core::fmt::Display for ItemKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} ({})", self.name, self.size)
    }
}

/// A distinct stock item and its running quantity / cost state.
///
/// Items are created on the first stock-in of an unseen `(name, size)` and are
/// never deleted; an item at quantity 0 stays visible. Only the ledger mutates
/// them, so fields are read through accessors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    id: ItemId,
    name: String,
    size: String,
    quantity: i64,
    /// Weighted-average cost per unit, two decimal places.
    unit_cost: Decimal,
    /// Last-known supplier.
    supplier: String,
    min_stock_level: i64,
    last_updated: DateTime<Utc>,
}

impl Item {
    pub(crate) fn new(
        id: ItemId,
        key: ItemKey,
        quantity: i64,
        unit_cost: Decimal,
        supplier: String,
        min_stock_level: i64,
        last_updated: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name: key.name,
            size: key.size,
            quantity,
            unit_cost,
            supplier,
            min_stock_level,
            last_updated,
        }
    }

    pub fn id_typed(&self) -> ItemId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> &str {
        &self.size
    }

    pub fn key(&self) -> ItemKey {
        ItemKey::new(self.name.clone(), self.size.clone())
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    pub fn unit_cost(&self) -> Decimal {
        self.unit_cost
    }

    pub fn supplier(&self) -> &str {
        &self.supplier
    }

    pub fn min_stock_level(&self) -> i64 {
        self.min_stock_level
    }

    pub fn last_updated(&self) -> DateTime<Utc> {
        self.last_updated
    }

    /// On-hand quantity is at or below the configured minimum.
    pub fn is_low_stock(&self) -> bool {
        self.quantity <= self.min_stock_level
    }

    /// How far above (positive) or below (negative) the minimum the item sits.
    pub fn headroom(&self) -> i64 {
        self.quantity - self.min_stock_level
    }

    /// `quantity × unit_cost`.
    pub fn total_value(&self) -> Decimal {
        Decimal::from(self.quantity) * self.unit_cost
    }

    pub(crate) fn set_quantity(&mut self, quantity: i64, at: DateTime<Utc>) {
        self.quantity = quantity;
        self.last_updated = at;
    }

    pub(crate) fn restock(
        &mut self,
        quantity: i64,
        unit_cost: Decimal,
        supplier: Option<String>,
        min_stock_level: Option<i64>,
        at: DateTime<Utc>,
    ) {
        self.quantity = quantity;
        self.unit_cost = unit_cost;
        if let Some(supplier) = supplier {
            self.supplier = supplier;
        }
        if let Some(min) = min_stock_level {
            self.min_stock_level = min;
        }
        self.last_updated = at;
    }

    /// Overwrite the mutable fields from `other`, keeping this item's identity.
    pub(crate) fn overwrite_from(&mut self, other: Item) {
        self.quantity = other.quantity;
        self.unit_cost = other.unit_cost;
        self.supplier = other.supplier;
        self.min_stock_level = other.min_stock_level;
        self.last_updated = other.last_updated;
    }
}

impl Entity for Item {
    type Id = ItemId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn flour(quantity: i64, min: i64) -> Item {
        Item::new(
            ItemId::new(),
            ItemKey::new("Flour", "1kg"),
            quantity,
            dec!(2.17),
            "Mill Co".to_string(),
            min,
            Utc::now(),
        )
    }

    #[test]
    fn low_stock_is_inclusive_of_minimum() {
        assert!(flour(5, 5).is_low_stock());
        assert!(flour(0, 0).is_low_stock());
        assert!(!flour(6, 5).is_low_stock());
    }

    #[test]
    fn total_value_is_quantity_times_unit_cost() {
        assert_eq!(flour(15, 5).total_value(), dec!(32.55));
    }

    #[test]
    fn restock_can_keep_supplier_and_minimum() {
        let mut item = flour(10, 5);
        item.restock(12, dec!(2.50), None, None, Utc::now());
        assert_eq!(item.quantity(), 12);
        assert_eq!(item.unit_cost(), dec!(2.50));
        assert_eq!(item.supplier(), "Mill Co");
        assert_eq!(item.min_stock_level(), 5);
    }
}
