//! Accounts

pub mod data;
pub mod errors;
pub mod records;
mod repository;
pub mod service;

pub(crate) use repository::{PgAccountsRepository, try_get_role};

pub use errors::AccountsServiceError;
pub use service::*;
