//! Shipping rates service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

use agora::shipping::ScheduleError;

#[derive(Debug, Error)]
pub enum ShippingRatesServiceError {
    /// A rate with the exact same kilometre bounds already exists.
    #[error("shipping rate already exists")]
    AlreadyExists,

    #[error("shipping rate not found")]
    NotFound,

    /// The candidate bracket is inverted or collides with an active one.
    #[error(transparent)]
    InvalidTier(#[from] ScheduleError),

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for ShippingRatesServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::AlreadyExists,
            Some(ErrorKind::Other | _) | None => Self::Sql(error),
        }
    }
}
