//! Checkout service errors.

use sqlx::Error;
use thiserror::Error;

use crate::{domain::shipping::ShippingRatesServiceError, gateways::GeoError};

#[derive(Debug, Error)]
pub enum CheckoutServiceError {
    /// The account has no active cart.
    #[error("no active cart")]
    CartNotFound,

    /// The cart has no lines, or every line was skipped.
    #[error("cart is empty")]
    CartEmpty,

    /// No address was named and no default is set, or the named address
    /// does not belong to the account.
    #[error("address not found")]
    AddressNotFound,

    /// The map provider failed or returned nothing usable.
    #[error(transparent)]
    Geo(#[from] GeoError),

    /// The stored shipping rates could not be assembled into a schedule.
    #[error("shipping rates unavailable")]
    Rates(#[source] ShippingRatesServiceError),

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for CheckoutServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::AddressNotFound;
        }

        Self::Sql(error)
    }
}

impl From<ShippingRatesServiceError> for CheckoutServiceError {
    fn from(error: ShippingRatesServiceError) -> Self {
        Self::Rates(error)
    }
}
