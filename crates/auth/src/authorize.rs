use thiserror::Error;

use crate::{Actor, Permission, Role, role_permissions};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("forbidden: role '{role}' lacks permission '{permission}'")]
    Forbidden { role: Role, permission: Permission },
}

/// Authorize an actor for a single permission.
///
/// - No IO
/// - No panics
/// - No business logic (pure policy check)
pub fn authorize(actor: &Actor, required: &Permission) -> Result<(), AuthzError> {
    let role = actor.role();
    if role_permissions(role).contains(required) {
        Ok(())
    } else {
        tracing::debug!(
            actor = actor.identity(),
            role = %role,
            permission = %required,
            "authorization denied"
        );
        Err(AuthzError::Forbidden {
            role,
            permission: required.clone(),
        })
    }
}
