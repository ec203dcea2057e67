//! Usage reconciliation: quantity taken vs. quantity actually used.

use stockroom_core::{DomainError, DomainResult};

/// Recompute `taken − used`.
///
/// The remaining quantity is always derived here and never accepted from the
/// caller; fails with `InvalidUsage` on non-positive inputs or when more was
/// used than taken.
pub fn reconcile(quantity_taken: i64, quantity_used: i64) -> DomainResult<i64> {
    if quantity_taken <= 0 {
        return Err(DomainError::invalid_usage(format!(
            "quantity taken must be greater than zero (got {quantity_taken})"
        )));
    }
    if quantity_used <= 0 {
        return Err(DomainError::invalid_usage(format!(
            "quantity used must be greater than zero (got {quantity_used})"
        )));
    }
    if quantity_used > quantity_taken {
        return Err(DomainError::invalid_usage(format!(
            "cannot use {quantity_used} when only {quantity_taken} was taken"
        )));
    }
    Ok(quantity_taken - quantity_used)
}

/// Reconcile and, if the caller supplied its own remaining figure, require it
/// to match the recomputed one.
pub fn reconcile_claim(
    quantity_taken: i64,
    quantity_used: i64,
    claimed_remaining: Option<i64>,
) -> DomainResult<i64> {
    let remaining = reconcile(quantity_taken, quantity_used)?;
    match claimed_remaining {
        Some(claimed) if claimed != remaining => Err(DomainError::invalid_usage(format!(
            "claimed remaining {claimed} does not match {quantity_taken} taken - {quantity_used} used = {remaining}"
        ))),
        _ => Ok(remaining),
    }
}
