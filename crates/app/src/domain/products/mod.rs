//! Products

pub mod data;
pub mod errors;
pub mod records;
mod repository;
pub mod service;

pub(crate) use repository::{
    PgProductsRepository, amount_param, quantity_param, try_get_amount, try_get_percent,
    try_get_quantity,
};

pub use errors::ProductsServiceError;
pub use service::*;
