//! Money
//!
//! Amounts are Vietnamese đồng in `u64` minor units. The đồng has no
//! sub-unit in practice, so "minor units" and "đồng" are the same thing;
//! fees are additionally quantised to the nearest 1 000₫.

/// Smallest order total the payment gateway accepts, in đồng.
pub const GATEWAY_MIN_AMOUNT: u64 = 1_000;

/// Largest order total the payment gateway accepts, in đồng.
pub const GATEWAY_MAX_AMOUNT: u64 = 50_000_000;

/// Apply a percentage discount to a unit price, rounding half-up to the
/// nearest đồng. Discounts above 100% clamp to free.
#[must_use]
pub fn discounted_unit_price(price: u64, discount_percent: u8) -> u64 {
    let remaining = 100_u64.saturating_sub(u64::from(discount_percent));

    (price * remaining + 50) / 100
}

/// Round an amount to the nearest multiple of 1 000₫, half-up.
#[must_use]
pub fn round_to_thousand(amount: u64) -> u64 {
    (amount + 500) / 1_000 * 1_000
}

/// Whether a total falls inside the gateway's accepted payment range.
#[must_use]
pub fn within_gateway_bounds(total: u64) -> bool {
    (GATEWAY_MIN_AMOUNT..=GATEWAY_MAX_AMOUNT).contains(&total)
}
