//! Products Data

use crate::domain::products::records::ProductUuid;

/// New Product Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub uuid: ProductUuid,
    pub title: String,
    pub image_url: Option<String>,
    pub price: u64,
    pub discount_percent: u8,
    pub stock: u32,
}

/// Product Update Data
///
/// A full replacement of the mutable product fields; `stock` is the new
/// absolute level, not an adjustment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductUpdate {
    pub title: String,
    pub image_url: Option<String>,
    pub price: u64,
    pub discount_percent: u8,
    pub stock: u32,
}
