//! Order Records

use jiff::Timestamp;

use agora::{
    checkout::CheckoutTotals,
    status::{OrderStatus, StatusEntry},
};

use crate::{
    domain::{
        accounts::records::AccountUuid,
        carts::records::CartUuid,
        payments::records::{PaymentMethod, PaymentStatus},
        products::records::ProductUuid,
    },
    uuids::TypedUuid,
};

/// Order UUID
pub type OrderUuid = TypedUuid<OrderRecord>;

/// Order Record
///
/// Contact fields and the address line are copied from the account's
/// address book at placement time; later edits to the address never
/// touch a placed order.
#[derive(Debug, Clone)]
pub struct OrderRecord {
    pub uuid: OrderUuid,
    pub account_uuid: AccountUuid,
    pub cart_uuid: CartUuid,
    pub recipient: String,
    pub email: String,
    pub phone: String,
    pub address_line: String,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    pub subtotal: u64,
    pub shipping_fee: u64,
    pub total: u64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// An order line: the price, discount and quantity snapshotted at
/// placement, joined with the product's current display fields.
#[derive(Debug, Clone)]
pub struct OrderLineRecord {
    pub product_uuid: ProductUuid,
    pub title: String,
    pub image_url: Option<String>,
    pub unit_price: u64,
    pub discount_percent: u8,
    pub quantity: u32,
}

/// One stored row of an order's status trail.
#[derive(Debug, Clone)]
pub struct OrderStatusRecord {
    pub position: u32,
    pub status: OrderStatus,
    pub recorded_at: Timestamp,
}

impl OrderStatusRecord {
    #[must_use]
    pub fn entry(&self) -> StatusEntry {
        StatusEntry {
            status: self.status,
            at: self.recorded_at,
        }
    }
}

/// An order with its lines and full status trail.
#[derive(Debug, Clone)]
pub struct OrderDetail {
    pub order: OrderRecord,
    pub lines: Vec<OrderLineRecord>,
    pub history: Vec<StatusEntry>,
}

/// What placement hands back to the caller. `pay_url` is only present
/// for gateway payments.
#[derive(Debug, Clone)]
pub struct PlacedOrder {
    pub uuid: OrderUuid,
    pub totals: CheckoutTotals,
    pub payment_method: PaymentMethod,
    pub pay_url: Option<String>,
}
