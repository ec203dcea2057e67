use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

use stockroom_inventory::LedgerSnapshot;

/// State store operation error.
///
/// These are **infrastructure errors** (IO, encoding) as opposed to domain
/// errors. A failed save never touches the in-memory ledger.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode ledger state: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("stored ledger state at {path} is unreadable: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("state store unavailable: {0}")]
    Unavailable(String),
}

/// Persistence collaborator: load the whole ledger state at startup, save it
/// after mutations.
///
/// Implementations store the snapshot verbatim; validation happens when the
/// ledger is restored from it.
pub trait StateStore: Send + Sync {
    /// Load the last saved snapshot, or `None` if nothing was saved yet.
    fn load_state(&self) -> Result<Option<LedgerSnapshot>, StoreError>;

    /// Replace the saved snapshot.
    fn save_state(&self, snapshot: &LedgerSnapshot) -> Result<(), StoreError>;
}

impl<S> StateStore for Arc<S>
where
    S: StateStore + ?Sized,
{
    fn load_state(&self) -> Result<Option<LedgerSnapshot>, StoreError> {
        (**self).load_state()
    }

    fn save_state(&self, snapshot: &LedgerSnapshot) -> Result<(), StoreError> {
        (**self).save_state(snapshot)
    }
}
