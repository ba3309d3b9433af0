//! Payments

pub mod data;
pub mod errors;
pub mod records;
mod repository;
pub mod service;

pub(crate) use repository::{PgPaymentsRepository, try_get_payment_method, try_get_payment_status};

pub use errors::PaymentsServiceError;
pub use service::*;
