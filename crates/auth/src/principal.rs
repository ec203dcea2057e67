use serde::{Deserialize, Serialize};

use crate::Role;

/// An already-authenticated caller.
///
/// The session layer builds this after PIN/credential checks; the ledger
/// trusts it as verified and only checks `role` against the operation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Actor {
    identity: String,
    role: Role,
}

impl Actor {
    pub fn new(identity: impl Into<String>, role: Role) -> Self {
        Self {
            identity: identity.into(),
            role,
        }
    }

    /// Display identity recorded on journal entries (e.g. "Stock Keeper").
    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn role(&self) -> Role {
        self.role
    }
}
