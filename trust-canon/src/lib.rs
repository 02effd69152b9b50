//! Canonical JSON serialization and content-addressed digesting (spec.md §4.A).

mod canon;
mod digest;

pub use canon::{digest_value, from_canonical_bytes, to_canonical_bytes};
pub use digest::{Digest, DigestParseError};
