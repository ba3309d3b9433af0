//! Product Records

use jiff::Timestamp;

use crate::uuids::TypedUuid;

/// Product UUID
pub type ProductUuid = TypedUuid<ProductRecord>;

/// Product Record
///
/// `price` is the listed unit price in đồng. `discount_percent` is applied
/// at pricing time, so the stored price never changes when a sale starts.
#[derive(Debug, Clone)]
pub struct ProductRecord {
    pub uuid: ProductUuid,
    pub title: String,
    pub image_url: Option<String>,
    pub price: u64,
    pub discount_percent: u8,
    pub stock: u32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}
