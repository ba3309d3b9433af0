//! Orders

pub mod data;
pub mod errors;
pub mod records;
mod repository;
pub mod service;

pub(crate) use repository::PgOrdersRepository;

pub use errors::OrdersServiceError;
pub use service::*;
