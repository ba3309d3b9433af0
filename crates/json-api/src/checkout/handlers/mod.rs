//! Checkout Handlers

pub(crate) mod preview;
