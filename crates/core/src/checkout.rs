//! Checkout arithmetic
//!
//! Cart lines are priced at order time from the product's current price and
//! discount, and the results are snapshotted onto the order so later price
//! changes never touch a placed order.

use crate::money::discounted_unit_price;

/// A cart line with its pricing resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricedLine {
    /// The undiscounted unit price at the time of pricing.
    pub unit_price: u64,

    /// The product's discount at the time of pricing.
    pub discount_percent: u8,

    /// Unit price after the discount.
    pub final_unit_price: u64,

    pub quantity: u32,

    /// `final_unit_price × quantity`.
    pub line_total: u64,
}

/// Price one cart line.
#[must_use]
pub fn price_line(unit_price: u64, discount_percent: u8, quantity: u32) -> PricedLine {
    let final_unit_price = discounted_unit_price(unit_price, discount_percent);

    PricedLine {
        unit_price,
        discount_percent,
        final_unit_price,
        quantity,
        line_total: final_unit_price * u64::from(quantity),
    }
}

/// Sum of the line totals.
#[must_use]
pub fn subtotal(lines: &[PricedLine]) -> u64 {
    lines.iter().map(|line| line.line_total).sum()
}

/// The amounts presented at checkout and charged on placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckoutTotals {
    pub subtotal: u64,
    pub shipping_fee: u64,

    /// `subtotal + shipping_fee`. No further rounding; both components are
    /// already whole đồng.
    pub total: u64,
}

impl CheckoutTotals {
    #[must_use]
    pub fn new(subtotal: u64, shipping_fee: u64) -> Self {
        Self {
            subtotal,
            shipping_fee,
            total: subtotal + shipping_fee,
        }
    }

    /// Price a whole cart against a shipping fee.
    #[must_use]
    pub fn from_lines(lines: &[PricedLine], shipping_fee: u64) -> Self {
        Self::new(subtotal(lines), shipping_fee)
    }
}
