//! Agora
//!
//! Pricing, shipping-fee and order-status engine for the Agora storefront.
//! Everything in this crate is pure: amounts in, amounts out, no I/O. The
//! persistence and HTTP layers live in `agora-app` and `agora-json`.

pub mod checkout;
pub mod money;
pub mod shipping;
pub mod status;
