//! Money helpers.
//!
//! All monetary values in the ledger are `Decimal`s carried at two decimal
//! places. Rounding is half-up (midpoint away from zero, which is half-up for
//! the non-negative amounts the ledger accepts).

use rust_decimal::{Decimal, RoundingStrategy};

/// Number of decimal places kept for unit costs.
pub const MONEY_SCALE: u32 = 2;

/// Round to two decimal places, half-up.
pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}
