//! Item catalog: the set of distinct stock items, in creation order.

use std::collections::HashMap;

use stockroom_core::ItemId;

use crate::item::{Item, ItemKey};

/// Owns every [`Item`]. Lookups by natural key and by surrogate id.
///
/// No business rules live here; the ledger validates before calling
/// [`ItemCatalog::upsert`].
#[derive(Debug, Clone, Default)]
pub struct ItemCatalog {
    items: Vec<Item>,
    by_key: HashMap<ItemKey, usize>,
    by_id: HashMap<ItemId, usize>,
}

impl ItemCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exact, case-sensitive match on `(name, size)`.
    pub fn find_by_key(&self, name: &str, size: &str) -> Option<&Item> {
        self.by_key
            .get(&ItemKey::new(name, size))
            .map(|&idx| &self.items[idx])
    }

    pub fn find_by_id(&self, id: ItemId) -> Option<&Item> {
        self.by_id.get(&id).map(|&idx| &self.items[idx])
    }

    /// Insert if the key is new, otherwise overwrite the existing record's
    /// mutable fields while preserving its identifier.
    pub(crate) fn upsert(&mut self, item: Item) -> &Item {
        let key = item.key();
        match self.by_key.get(&key) {
            Some(&idx) => {
                self.items[idx].overwrite_from(item);
                &self.items[idx]
            }
            None => {
                let idx = self.items.len();
                self.by_key.insert(key, idx);
                self.by_id.insert(item.id_typed(), idx);
                self.items.push(item);
                &self.items[idx]
            }
        }
    }

    pub(crate) fn get_mut(&mut self, id: ItemId) -> Option<&mut Item> {
        let idx = *self.by_id.get(&id)?;
        self.items.get_mut(idx)
    }

    /// Items in insertion (creation) order.
    pub fn list(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains_id(&self, id: ItemId) -> bool {
        self.by_id.contains_key(&id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn item(name: &str, size: &str, quantity: i64) -> Item {
        Item::new(
            ItemId::new(),
            ItemKey::new(name, size),
            quantity,
            dec!(1.00),
            "Supplier".to_string(),
            0,
            Utc::now(),
        )
    }

    #[test]
    fn key_lookup_is_case_sensitive() {
        let mut catalog = ItemCatalog::new();
        catalog.upsert(item("Flour", "1kg", 10));

        assert!(catalog.find_by_key("Flour", "1kg").is_some());
        assert!(catalog.find_by_key("flour", "1kg").is_none());
        assert!(catalog.find_by_key("Flour", "1KG").is_none());
    }

    #[test]
    fn upsert_preserves_identifier_on_existing_key() {
        let mut catalog = ItemCatalog::new();
        let original_id = catalog.upsert(item("Sugar", "500g", 4)).id_typed();

        let replacement = item("Sugar", "500g", 9);
        let stored = catalog.upsert(replacement);

        assert_eq!(stored.id_typed(), original_id);
        assert_eq!(stored.quantity(), 9);
        assert_eq!(catalog.len(), 1);
        assert!(catalog.find_by_id(original_id).is_some());
    }

    #[test]
    fn list_keeps_creation_order() {
        let mut catalog = ItemCatalog::new();
        catalog.upsert(item("Milk", "1l", 1));
        catalog.upsert(item("Beans", "1kg", 1));
        catalog.upsert(item("Milk", "1l", 5));
        catalog.upsert(item("Cups", "12oz", 1));

        let names: Vec<&str> = catalog.list().iter().map(|i| i.name()).collect();
        assert_eq!(names, vec!["Milk", "Beans", "Cups"]);
    }
}
