//! Orders service errors.

use sqlx::Error;
use thiserror::Error;

use agora::status::{HistoryError, TransitionError};

use crate::{
    domain::{
        orders::records::OrderUuid, products::records::ProductUuid,
        shipping::ShippingRatesServiceError,
    },
    gateways::{GeoError, MomoError},
};

#[derive(Debug, Error)]
pub enum OrdersServiceError {
    #[error("no active cart for this account")]
    CartNotFound,

    /// The cart has no lines, or every line was skipped.
    #[error("cart is empty")]
    CartEmpty,

    #[error("address not found")]
    AddressNotFound,

    #[error("order not found")]
    NotFound,

    #[error("order belongs to another account")]
    Forbidden,

    /// A line asked for more units than the shelf holds. The placement
    /// transaction rolls back, so no other line's stock was touched.
    #[error("not enough stock for product {product}")]
    InsufficientStock { product: ProductUuid },

    /// The order total falls outside the range the payment gateway
    /// accepts, for cash on delivery included.
    #[error("order total {amount} is outside the accepted payment range")]
    AmountOutOfRange { amount: u64 },

    #[error(transparent)]
    Geo(#[from] GeoError),

    #[error("shipping rates unavailable")]
    Rates(#[source] ShippingRatesServiceError),

    /// The order was created and stays `pending`; the caller may retry
    /// the payment separately.
    #[error("payment gateway failed for order {order}")]
    Gateway {
        order: OrderUuid,
        #[source]
        source: MomoError,
    },

    #[error(transparent)]
    Transition(#[from] TransitionError),

    /// The stored status trail does not parse as a legal history.
    #[error(transparent)]
    History(#[from] HistoryError),

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for OrdersServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        Self::Sql(error)
    }
}

impl From<ShippingRatesServiceError> for OrdersServiceError {
    fn from(error: ShippingRatesServiceError) -> Self {
        Self::Rates(error)
    }
}
