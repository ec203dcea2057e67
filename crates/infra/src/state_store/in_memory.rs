use std::sync::RwLock;

use stockroom_inventory::LedgerSnapshot;

use super::r#trait::{StateStore, StoreError};

/// In-memory state store.
///
/// Intended for tests/dev. Counts saves so callers can assert persistence
/// behavior.
#[derive(Debug, Default)]
pub struct InMemoryStateStore {
    inner: RwLock<Slot>,
}

#[derive(Debug, Default)]
struct Slot {
    snapshot: Option<LedgerSnapshot>,
    saves: u64,
}

impl InMemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with an existing snapshot already "on disk".
    pub fn with_snapshot(snapshot: LedgerSnapshot) -> Self {
        Self {
            inner: RwLock::new(Slot {
                snapshot: Some(snapshot),
                saves: 0,
            }),
        }
    }

    /// Number of successful `save_state` calls.
    pub fn saves(&self) -> u64 {
        self.inner.read().map(|slot| slot.saves).unwrap_or(0)
    }
}

impl StateStore for InMemoryStateStore {
    fn load_state(&self) -> Result<Option<LedgerSnapshot>, StoreError> {
        let slot = self
            .inner
            .read()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))?;
        Ok(slot.snapshot.clone())
    }

    fn save_state(&self, snapshot: &LedgerSnapshot) -> Result<(), StoreError> {
        let mut slot = self
            .inner
            .write()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))?;
        slot.snapshot = Some(snapshot.clone());
        slot.saves += 1;
        Ok(())
    }
}
