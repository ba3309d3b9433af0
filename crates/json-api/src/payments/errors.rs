//! Payment Errors

use tracing::error;

use agora_app::domain::payments::PaymentsServiceError;

use crate::errors::ApiError;

pub(crate) fn into_api_error(error: PaymentsServiceError) -> ApiError {
    match error {
        PaymentsServiceError::NotFound => {
            ApiError::not_found().brief("No payment for that order")
        }
        PaymentsServiceError::Sql(source) => {
            error!("payment storage error: {source}");

            ApiError::internal_server_error()
        }
    }
}
