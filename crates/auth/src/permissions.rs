use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::Role;

/// Permission identifier.
///
/// Permissions are modeled as opaque strings (e.g. "inventory.stock_in").
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permission(Cow<'static, str>);

impl Permission {
    pub const STOCK_IN: Permission = Permission(Cow::Borrowed("inventory.stock_in"));
    pub const STOCK_OUT: Permission = Permission(Cow::Borrowed("inventory.stock_out"));
    pub const LOG_USAGE: Permission = Permission(Cow::Borrowed("inventory.usage.log"));

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Permission {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Static role → permission mapping.
///
/// Stock movements are reserved for admins and stock keepers; every
/// authenticated role may log usage.
pub fn role_permissions(role: Role) -> &'static [Permission] {
    const MANAGE: &[Permission] = &[
        Permission::STOCK_IN,
        Permission::STOCK_OUT,
        Permission::LOG_USAGE,
    ];
    const USAGE_ONLY: &[Permission] = &[Permission::LOG_USAGE];

    match role {
        Role::Admin | Role::StockKeeper => MANAGE,
        Role::Chef | Role::Barista => USAGE_ONLY,
    }
}
