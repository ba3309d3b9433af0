//! Checkout Records

use agora::checkout::CheckoutTotals;

use crate::domain::{
    accounts::records::AddressRecord,
    carts::records::{CartUuid, SnapshotLine},
    products::records::ProductUuid,
};

/// What the confirmation page shows before the shopper commits.
#[derive(Debug, Clone)]
pub struct CheckoutPreview {
    pub cart_uuid: CartUuid,
    pub lines: Vec<SnapshotLine>,

    /// Products dropped from the snapshot because they are no longer sold.
    pub skipped: Vec<ProductUuid>,

    pub totals: CheckoutTotals,

    /// The delivery address the fee was quoted for.
    pub address: AddressRecord,

    /// Driving distance the quote was based on, in metres.
    pub distance_m: i64,
}
