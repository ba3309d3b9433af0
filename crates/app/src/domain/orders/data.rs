//! Order Data

use crate::domain::{
    accounts::records::{AccountUuid, AddressUuid},
    carts::records::CartUuid,
    orders::records::OrderUuid,
    payments::records::PaymentMethod,
};

/// Place Order Data
///
/// The address must be one of the buyer's own; unlike the checkout
/// preview there is no default-address fallback at this stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceOrder {
    pub uuid: OrderUuid,
    pub recipient: String,
    pub email: String,
    pub phone: String,
    pub address_uuid: AddressUuid,
    pub payment_method: PaymentMethod,
}

/// The fully priced order row the placement transaction writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub uuid: OrderUuid,
    pub account_uuid: AccountUuid,
    pub cart_uuid: CartUuid,
    pub recipient: String,
    pub email: String,
    pub phone: String,
    pub address_line: String,
    pub payment_method: PaymentMethod,
    pub subtotal: u64,
    pub shipping_fee: u64,
    pub total: u64,
}
