//! Order Errors

use tracing::error;

use agora::status::TransitionError;
use agora_app::domain::orders::OrdersServiceError;

use crate::{checkout::errors::geo_api_error, errors::ApiError};

pub(crate) fn into_api_error(error: OrdersServiceError) -> ApiError {
    match error {
        OrdersServiceError::CartNotFound => ApiError::not_found().brief("No active cart"),
        OrdersServiceError::CartEmpty => ApiError::bad_request().brief("Cart is empty"),
        OrdersServiceError::AddressNotFound => ApiError::not_found().brief("Address not found"),
        OrdersServiceError::NotFound => ApiError::not_found().brief("Order not found"),
        OrdersServiceError::Forbidden => {
            ApiError::forbidden().brief("Order belongs to another account")
        }
        OrdersServiceError::InsufficientStock { product } => {
            ApiError::conflict().brief(format!("Not enough stock for product {product}"))
        }
        OrdersServiceError::AmountOutOfRange { amount } => ApiError::unprocessable_entity()
            .brief(format!(
                "Order total {amount} is outside the accepted payment range"
            )),
        OrdersServiceError::Geo(source) => geo_api_error(&source),
        OrdersServiceError::Rates(source) => {
            error!("shipping rates unavailable: {source}");

            ApiError::internal_server_error()
        }
        OrdersServiceError::Gateway { order, source } => {
            error!("payment gateway failed for order {order}: {source}");

            ApiError::bad_gateway().brief("Payment gateway unavailable")
        }
        OrdersServiceError::Transition(source) => transition_api_error(&source),
        OrdersServiceError::History(source) => {
            error!("stored status trail is invalid: {source}");

            ApiError::internal_server_error()
        }
        OrdersServiceError::Sql(source) => {
            error!("order storage error: {source}");

            ApiError::internal_server_error()
        }
    }
}

/// Every rejected status change is a conflict with the order's current
/// state, worded by the status machine itself.
pub(crate) fn transition_api_error(error: &TransitionError) -> ApiError {
    ApiError::conflict().brief(error.to_string())
}
