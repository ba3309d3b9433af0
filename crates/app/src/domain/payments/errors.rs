//! Payments service errors.

use sqlx::Error;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PaymentsServiceError {
    /// No payment row for the order the gateway named.
    #[error("payment not found")]
    NotFound,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for PaymentsServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        Self::Sql(error)
    }
}
