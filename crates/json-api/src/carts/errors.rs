//! Cart Errors

use tracing::error;

use agora_app::domain::carts::CartsServiceError;

use crate::errors::ApiError;

pub(crate) fn into_api_error(error: CartsServiceError) -> ApiError {
    match error {
        CartsServiceError::CartNotFound => ApiError::not_found().brief("No active cart"),
        CartsServiceError::ItemNotFound => ApiError::not_found().brief("Cart item not found"),
        CartsServiceError::UnknownProduct => ApiError::not_found().brief("Product not found"),
        CartsServiceError::InvalidQuantity => {
            ApiError::bad_request().brief("Quantity must be at least 1")
        }
        CartsServiceError::Sql(source) => {
            error!("cart storage error: {source}");

            ApiError::internal_server_error()
        }
    }
}
