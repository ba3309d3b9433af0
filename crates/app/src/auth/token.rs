//! Session token generation.

use rand::{RngCore, rngs::OsRng};

/// Session token prefix, handy when grepping logs and cookie jars.
pub const SESSION_TOKEN_PREFIX: &str = "sess";

/// Number of random bytes encoded in a session token.
pub const SESSION_TOKEN_BYTES: usize = 32;

/// Generate an opaque session token from OS randomness.
#[must_use]
pub fn generate_session_token() -> String {
    let mut bytes = [0_u8; SESSION_TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);

    format!("{SESSION_TOKEN_PREFIX}_{}", hex::encode(bytes))
}
