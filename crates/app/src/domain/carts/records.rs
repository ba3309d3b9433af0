//! Cart Records

use std::{fmt, str::FromStr};

use jiff::Timestamp;
use thiserror::Error;

use crate::{
    domain::{accounts::records::AccountUuid, products::records::ProductUuid},
    uuids::TypedUuid,
};

/// Cart UUID
pub type CartUuid = TypedUuid<CartRecord>;

/// Cart Record
///
/// Each account holds at most one `active` cart. Placing an order empties
/// the cart's lines but leaves the cart itself in place.
#[derive(Debug, Clone)]
pub struct CartRecord {
    pub uuid: CartUuid,
    pub account_uuid: AccountUuid,
    pub status: CartStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Cart lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartStatus {
    Active,
    Ordered,
}

impl CartStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Ordered => "ordered",
        }
    }
}

impl fmt::Display for CartStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CartStatus {
    type Err = ParseCartStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "ordered" => Ok(Self::Ordered),
            other => Err(ParseCartStatusError(other.to_string())),
        }
    }
}

/// Error for cart status strings the schema does not allow.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognised cart status {0:?}")]
pub struct ParseCartStatusError(pub String);

/// Cart Item UUID
pub type CartItemUuid = TypedUuid<CartItemRecord>;

/// Cart Item Record
#[derive(Debug, Clone)]
pub struct CartItemRecord {
    pub uuid: CartItemUuid,
    pub cart_uuid: CartUuid,
    pub product_uuid: ProductUuid,
    pub quantity: u32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A cart line joined with the current state of its product, the raw
/// material the snapshot builder prices.
#[derive(Debug, Clone)]
pub struct CartLineRecord {
    pub item_uuid: CartItemUuid,
    pub product_uuid: ProductUuid,
    pub title: String,
    pub image_url: Option<String>,
    pub price: u64,
    pub discount_percent: u8,
    pub stock: u32,
    pub quantity: u32,
    pub discontinued: bool,
}

/// A priced view of a cart line, display fields included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotLine {
    pub product_uuid: ProductUuid,
    pub title: String,
    pub image_url: Option<String>,
    pub unit_price: u64,
    pub discount_percent: u8,
    pub final_unit_price: u64,
    pub quantity: u32,
    pub line_total: u64,
}

/// The priced cart as checkout sees it: kept lines, the products that were
/// dropped because they are no longer sold, and the subtotal over the kept
/// lines. Shipping is not included at this stage.
#[derive(Debug, Clone)]
pub struct CartSnapshot {
    pub cart_uuid: CartUuid,
    pub lines: Vec<SnapshotLine>,
    pub skipped: Vec<ProductUuid>,
    pub subtotal: u64,
}

impl CartSnapshot {
    /// True when nothing priced survives, counting a cart whose every line
    /// was skipped as empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
