//! Release manifest verification (spec.md §4.E): digest checkpoints,
//! block-set equality, privacy lint, and pluggable signature verification.

mod crypto;
mod manifest;
mod privacy;
mod verify;

pub use crypto::{CryptoPort, DemoCryptoPort, Secp256k1CryptoPort, SIG_DEMO_V0, SIG_SECP256K1_SCHNORR_V1};
pub use manifest::{ManifestBody, ManifestSignature, ReleaseManifest};
pub use privacy::lint as privacy_lint;
pub use verify::{verify_release, ReleaseStatus, ReleaseVerifyResult, VerifyReleaseInput};
