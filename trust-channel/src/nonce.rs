//! Session nonces (spec.md §4.F): 128-bit random tokens, hex-encoded,
//! compared with a constant-time equality primitive.

use rand::RngCore;
use std::fmt::{self, Display, Formatter};
use subtle::ConstantTimeEq;
use thiserror::Error;

const NONCE_BYTES: usize = 16;
const NONCE_HEX_LEN: usize = NONCE_BYTES * 2;

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Nonce(String);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NonceError {
    #[error("nonce must be {NONCE_HEX_LEN} lowercase hex characters, got {0:?}")]
    BadShape(String),
}

impl Nonce {
    /// Generates a fresh 128-bit random nonce. Nonces are never reused
    /// (spec.md §3 lifecycle rule).
    pub fn generate() -> Self {
        let mut bytes = [0u8; NONCE_BYTES];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(hex::encode(bytes))
    }

    pub fn validate(raw: &str) -> Result<Self, NonceError> {
        if raw.len() == NONCE_HEX_LEN && raw.bytes().all(|b| b.is_ascii_hexdigit()) && raw.chars().all(|c| !c.is_ascii_uppercase()) {
            Ok(Self(raw.to_string()))
        } else {
            Err(NonceError::BadShape(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Nonce {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Constant-time string equality (spec.md §4.F `safeEqual`). Used for nonce
/// comparison so a mismatching prefix doesn't leak timing information.
pub fn safe_equal(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

/// Panics if `nonce` is not a well-formed 128-bit hex token. One of the two
/// places spec.md §7 permits a thrown/panicking failure instead of a
/// reason code (the other being `trust_algebra::assert_sorted_unique`):
/// this guards an internal invariant (nonces are always generated by
/// [`Nonce::generate`]), not untrusted input.
pub fn assert_nonce_shape(nonce: &str) {
    assert!(
        nonce.len() == NONCE_HEX_LEN && nonce.bytes().all(|b| b.is_ascii_hexdigit()),
        "malformed nonce shape: {nonce:?}"
    );
}
