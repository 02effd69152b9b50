//! `CryptoPort` (spec.md §6): verifies one signature over a canonical
//! digest. `sig.secp256k1-schnorr.v1` is the production algorithm
//! (spec.md §9); `sig.demo.v0` is demo/test-only.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use secp256k1::schnorr;
use secp256k1::{Message, Secp256k1, XOnlyPublicKey};
use std::collections::HashMap;

pub const SIG_SECP256K1_SCHNORR_V1: &str = "sig.secp256k1-schnorr.v1";
pub const SIG_DEMO_V0: &str = "sig.demo.v0";

/// A signature over a digest, verified against a named key. Implementations
/// must be pure: the same `(sig_kind, key_id, digest, sig_b64)` always
/// produces the same answer.
pub trait CryptoPort: Send + Sync {
    fn verify(&self, sig_kind: &str, key_id: &str, digest: &[u8; 32], sig_b64: &str) -> bool;
}

/// Schnorr verification over x-only public keys registered per `keyId`,
/// following the teacher's `check_schnorr_signature`
/// (`crypto/txscript/src/lib.rs`): decode, build a `Message` from the
/// digest, call `Signature::verify`.
pub struct Secp256k1CryptoPort {
    keys: HashMap<String, XOnlyPublicKey>,
    secp: Secp256k1<secp256k1::VerifyOnly>,
}

impl Secp256k1CryptoPort {
    pub fn new(keys: HashMap<String, XOnlyPublicKey>) -> Self {
        Self { keys, secp: Secp256k1::verification_only() }
    }
}

impl CryptoPort for Secp256k1CryptoPort {
    fn verify(&self, sig_kind: &str, key_id: &str, digest: &[u8; 32], sig_b64: &str) -> bool {
        if sig_kind != SIG_SECP256K1_SCHNORR_V1 {
            return false;
        }
        let Some(pubkey) = self.keys.get(key_id) else { return false };
        let Ok(sig_bytes) = BASE64.decode(sig_b64) else { return false };
        let Ok(sig) = schnorr::Signature::from_slice(&sig_bytes) else { return false };
        let Ok(msg) = Message::from_digest_slice(digest) else { return false };
        sig.verify(&self.secp, &msg, pubkey).is_ok()
    }
}

/// Demo-only port: a "signature" is just `format!("demo:{key_id}:{digest_hex}")`
/// base64-encoded, matching the distilled spec's framing of `sig.demo.v0` as
/// a non-cryptographic placeholder used only in tests.
#[derive(Default)]
pub struct DemoCryptoPort {
    allowed_keys: std::collections::HashSet<String>,
}

impl DemoCryptoPort {
    pub fn new(allowed_keys: impl IntoIterator<Item = String>) -> Self {
        Self { allowed_keys: allowed_keys.into_iter().collect() }
    }

    pub fn sign(key_id: &str, digest: &[u8; 32]) -> String {
        BASE64.encode(format!("demo:{key_id}:{}", hex::encode(digest)).as_bytes())
    }
}

impl CryptoPort for DemoCryptoPort {
    fn verify(&self, sig_kind: &str, key_id: &str, digest: &[u8; 32], sig_b64: &str) -> bool {
        if sig_kind != SIG_DEMO_V0 || !self.allowed_keys.contains(key_id) {
            return false;
        }
        Self::sign(key_id, digest) == sig_b64
    }
}
