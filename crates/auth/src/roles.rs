use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Role identifier used for RBAC.
///
/// The set is closed: the session layer hands the ledger one of these four
/// values for every call. Wire form is kebab-case (`"stock-keeper"`).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    Admin,
    StockKeeper,
    Chef,
    Barista,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Admin, Role::StockKeeper, Role::Chef, Role::Barista];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::StockKeeper => "stock-keeper",
            Role::Chef => "chef",
            Role::Barista => "barista",
        }
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role '{0}' (expected one of: admin, stock-keeper, chef, barista)")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| UnknownRole(s.to_string()))
    }
}
