//! Infrastructure layer: state persistence, host configuration.

pub mod config;
pub mod persistent;
pub mod state_store;

pub use config::{ConfigError, LedgerConfig};
pub use persistent::{HostError, PersistentLedger};
pub use state_store::{InMemoryStateStore, JsonFileStateStore, StateStore, StoreError};
