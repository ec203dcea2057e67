//! Weighted-average cost folding.
//!
//! The only rounding point in the ledger: every merge rounds to two decimal
//! places (half-up), so a sequence of stock-ins folds left to right and the
//! result is order-dependent.

use rust_decimal::Decimal;

use stockroom_core::{DomainError, DomainResult, round2};

/// The on-hand side of a merge.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct StockPosition {
    pub quantity: i64,
    pub unit_cost: Decimal,
}

/// Fold an incoming lot into an existing position.
///
/// `round2((q × c + lot_total) / (q + incoming_quantity))`.
///
/// Requires `existing.quantity + incoming_quantity > 0`, which holds because
/// incoming quantities are validated positive upstream.
pub fn merge_lot(
    existing: StockPosition,
    incoming_quantity: i64,
    incoming_total_cost: Decimal,
) -> Decimal {
    let total_value = Decimal::from(existing.quantity) * existing.unit_cost + incoming_total_cost;
    let total_quantity = Decimal::from(existing.quantity + incoming_quantity);
    round2(total_value / total_quantity)
}

/// Unit cost of a brand-new item: `round2(lot_total / quantity)`.
pub fn initial_unit_cost(quantity: i64, total_cost: Decimal) -> Decimal {
    round2(total_cost / Decimal::from(quantity))
}

/// Checks that a merge stays within `Decimal` / `i64` range.
///
/// Run before [`merge_lot`] so the merge itself cannot overflow.
pub fn check_merge_bounds(
    existing: StockPosition,
    incoming_quantity: i64,
    incoming_total_cost: Decimal,
) -> DomainResult<()> {
    existing
        .quantity
        .checked_add(incoming_quantity)
        .ok_or_else(|| DomainError::validation("quantity", "on-hand quantity would overflow"))?;

    Decimal::from(existing.quantity)
        .checked_mul(existing.unit_cost)
        .and_then(|value| value.checked_add(incoming_total_cost))
        .ok_or_else(|| DomainError::validation("cost", "stock value would overflow"))?;

    Ok(())
}
