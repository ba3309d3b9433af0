//! Carts service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CartsServiceError {
    /// The account has no active cart.
    #[error("no active cart")]
    CartNotFound,

    /// The cart has no line for the addressed product.
    #[error("cart item not found")]
    ItemNotFound,

    /// The product being added is not sold (missing or discontinued).
    #[error("product not found")]
    UnknownProduct,

    /// Quantity failed the positivity check.
    #[error("quantity must be at least 1")]
    InvalidQuantity,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for CartsServiceError {
    fn from(error: Error) -> Self {
        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::ForeignKeyViolation) => Self::UnknownProduct,
            Some(ErrorKind::CheckViolation) => Self::InvalidQuantity,
            Some(ErrorKind::Other | _) | None => Self::Sql(error),
        }
    }
}
