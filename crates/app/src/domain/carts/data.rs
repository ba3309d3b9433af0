//! Cart Data

use crate::domain::products::records::ProductUuid;

/// New Cart Item Data
///
/// Adding a product already in the cart merges by summing quantities
/// rather than creating a second line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewCartItem {
    pub product_uuid: ProductUuid,
    pub quantity: u32,
}
