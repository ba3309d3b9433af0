//! Authentication
//!
//! Session-cookie authentication. Sessions are minted out of band (operator
//! CLI, seed scripts) and presented by the storefront on every request; the
//! service resolves them to the owning account. Login and registration
//! flows are not part of this crate.

mod errors;
mod records;
mod repository;
mod service;
mod token;

pub use errors::*;
pub use records::*;
pub use repository::PgAuthRepository;
pub use service::*;
pub use token::*;
