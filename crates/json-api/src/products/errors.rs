//! Product Errors

use tracing::error;

use agora_app::domain::products::ProductsServiceError;

use crate::errors::ApiError;

pub(crate) fn into_api_error(error: ProductsServiceError) -> ApiError {
    match error {
        ProductsServiceError::AlreadyExists => {
            ApiError::conflict().brief("Product already exists")
        }
        ProductsServiceError::InvalidReference
        | ProductsServiceError::MissingRequiredData
        | ProductsServiceError::InvalidData => {
            ApiError::bad_request().brief("Invalid product payload")
        }
        ProductsServiceError::InsufficientStock { product } => {
            ApiError::conflict().brief(format!("Not enough stock for product {product}"))
        }
        ProductsServiceError::NotFound => ApiError::not_found().brief("Product not found"),
        ProductsServiceError::Sql(source) => {
            error!("product storage error: {source}");

            ApiError::internal_server_error()
        }
    }
}
