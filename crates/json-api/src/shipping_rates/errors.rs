//! Shipping Rate Errors

use tracing::error;

use agora_app::domain::shipping::ShippingRatesServiceError;

use crate::errors::ApiError;

pub(crate) fn into_api_error(error: ShippingRatesServiceError) -> ApiError {
    match error {
        ShippingRatesServiceError::AlreadyExists => {
            ApiError::conflict().brief("Shipping rate already exists")
        }
        ShippingRatesServiceError::NotFound => {
            ApiError::not_found().brief("Shipping rate not found")
        }
        ShippingRatesServiceError::InvalidTier(source) => {
            ApiError::bad_request().brief(source.to_string())
        }
        ShippingRatesServiceError::Sql(source) => {
            error!("shipping rate storage error: {source}");

            ApiError::internal_server_error()
        }
    }
}
