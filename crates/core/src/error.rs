//! Domain error model.

use thiserror::Error;

use crate::id::ItemId;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Every variant is raised before any ledger state is touched: a caller that
/// receives one of these can rely on the catalog and journal being unchanged.
/// Infrastructure concerns (storage, configuration) belong elsewhere.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Malformed, missing or out-of-range input.
    #[error("invalid {field}: {message}")]
    Validation { field: &'static str, message: String },

    /// The caller's role is not permitted to perform the operation.
    #[error("role '{role}' is not permitted to {operation}")]
    Authorization { role: String, operation: String },

    /// The referenced item does not exist.
    #[error("item {0} not found")]
    NotFound(ItemId),

    /// A stock-out asked for more than is on hand.
    #[error("insufficient stock for item {item_id}: requested {requested}, on hand {on_hand}")]
    InsufficientStock {
        item_id: ItemId,
        requested: i64,
        on_hand: i64,
    },

    /// Usage reconciliation arithmetic failed.
    #[error("invalid usage: {0}")]
    InvalidUsage(String),

    /// A domain invariant was violated (e.g. a restored snapshot is inconsistent).
    #[error("invariant violated: {0}")]
    InvariantViolation(String),
}

impl DomainError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    pub fn authorization(role: impl Into<String>, operation: impl Into<String>) -> Self {
        Self::Authorization {
            role: role.into(),
            operation: operation.into(),
        }
    }

    pub fn invalid_usage(msg: impl Into<String>) -> Self {
        Self::InvalidUsage(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    pub fn not_found(item_id: ItemId) -> Self {
        Self::NotFound(item_id)
    }

    /// Stable, machine-readable kind (useful for logs and front ends).
    pub fn kind(&self) -> &'static str {
        match self {
            DomainError::Validation { .. } => "validation",
            DomainError::Authorization { .. } => "authorization",
            DomainError::NotFound(_) => "not_found",
            DomainError::InsufficientStock { .. } => "insufficient_stock",
            DomainError::InvalidUsage(_) => "invalid_usage",
            DomainError::InvariantViolation(_) => "invariant_violation",
        }
    }
}
