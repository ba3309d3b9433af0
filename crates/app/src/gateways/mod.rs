//! Outbound HTTP collaborators.
//!
//! Checkout and order placement lean on two external providers: a map
//! provider for geocoding and drive distances, and the MoMo wallet for
//! card-less payments. Both sit behind traits so the services can be
//! tested without the network.

pub mod geo;
pub mod momo;

pub use geo::*;
pub use momo::*;
