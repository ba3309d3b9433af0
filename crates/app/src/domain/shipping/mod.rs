//! Shipping Rates

pub mod data;
pub mod errors;
pub mod records;
mod repository;
pub mod service;

pub(crate) use repository::PgShippingRatesRepository;
pub(crate) use service::load_active_schedule;

pub use errors::ShippingRatesServiceError;
pub use service::*;
