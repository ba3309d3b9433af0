//! Checkout Errors

use tracing::error;

use agora_app::{domain::checkout::CheckoutServiceError, gateways::GeoError};

use crate::errors::ApiError;

pub(crate) fn into_api_error(error: CheckoutServiceError) -> ApiError {
    match error {
        CheckoutServiceError::CartNotFound => ApiError::not_found().brief("No active cart"),
        CheckoutServiceError::CartEmpty => ApiError::bad_request().brief("Cart is empty"),
        CheckoutServiceError::AddressNotFound => {
            ApiError::not_found().brief("Address not found")
        }
        CheckoutServiceError::Geo(source) => geo_api_error(&source),
        CheckoutServiceError::Rates(source) => {
            error!("shipping rates unavailable: {source}");

            ApiError::internal_server_error()
        }
        CheckoutServiceError::Sql(source) => {
            error!("checkout storage error: {source}");

            ApiError::internal_server_error()
        }
    }
}

/// One mapping for every handler that quotes shipping.
pub(crate) fn geo_api_error(error: &GeoError) -> ApiError {
    match error {
        GeoError::GeocodeFailed => {
            ApiError::bad_gateway().brief("Address could not be geocoded")
        }
        GeoError::DistanceUnavailable { status } => {
            ApiError::bad_gateway().brief(format!("Driving distance unavailable ({status})"))
        }
        GeoError::Http(source) => {
            error!("map provider request failed: {source}");

            ApiError::bad_gateway().brief("Map provider unavailable")
        }
        GeoError::UnexpectedResponse(body) => {
            error!("map provider returned an unexpected response: {body}");

            ApiError::bad_gateway().brief("Map provider unavailable")
        }
    }
}
