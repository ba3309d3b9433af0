//! Carts

pub mod data;
pub mod errors;
pub mod records;
mod repositories;
pub mod service;

pub(crate) use repositories::{PgCartItemsRepository, PgCartsRepository};
pub(crate) use service::build_snapshot;

pub use errors::CartsServiceError;
pub use service::*;
