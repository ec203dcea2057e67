//! Ledger state persistence boundary.
//!
//! The ledger itself never does IO; these stores load and save its
//! serialized snapshot.

pub mod in_memory;
pub mod json_file;
pub mod r#trait;

pub use in_memory::InMemoryStateStore;
pub use json_file::JsonFileStateStore;
pub use r#trait::{StateStore, StoreError};
