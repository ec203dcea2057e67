//! `stockroom-auth`: pure authorization boundary.
//!
//! Authentication (PINs, OTP recovery, sessions) lives outside this
//! workspace. This crate only decides whether an already-authenticated
//! [`Actor`] may perform an operation.

pub mod authorize;
pub mod permissions;
pub mod principal;
pub mod roles;

pub use authorize::{AuthzError, authorize};
pub use permissions::{Permission, role_permissions};
pub use principal::Actor;
pub use roles::{Role, UnknownRole};
