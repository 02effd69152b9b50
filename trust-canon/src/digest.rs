use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use sha2::{Digest as _, Sha256};
use thiserror::Error;

const DIGEST_BYTES: usize = 32;
const PREFIX: &str = "sha256";

/// A content digest: `sha256:<hex>`. All digests in this crate family are
/// prefixed strings — see spec.md §3.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Digest([u8; DIGEST_BYTES]);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DigestParseError {
    #[error("digest missing `{PREFIX}:` prefix")]
    MissingPrefix,
    #[error("digest hex decode error: {0}")]
    Hex(#[from] hex::FromHexError),
}

impl Digest {
    pub fn from_bytes(bytes: [u8; DIGEST_BYTES]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; DIGEST_BYTES] {
        &self.0
    }

    /// `digest(bytes)` from spec.md §4.A: SHA-256 over the raw bytes.
    pub fn of_bytes(data: impl AsRef<[u8]>) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(data.as_ref());
        let out = hasher.finalize();
        let mut bytes = [0u8; DIGEST_BYTES];
        bytes.copy_from_slice(out.as_slice());
        Self(bytes)
    }
}

impl Display for Digest {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut hex_buf = [0u8; DIGEST_BYTES * 2];
        hex::encode_to_slice(self.0, &mut hex_buf).expect("output is exactly twice the input size");
        write!(f, "{PREFIX}:{}", std::str::from_utf8(&hex_buf).expect("hex is always valid UTF-8"))
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({self})")
    }
}

impl FromStr for Digest {
    type Err = DigestParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex_part = s.strip_prefix(PREFIX).and_then(|s| s.strip_prefix(':')).ok_or(DigestParseError::MissingPrefix)?;
        let mut bytes = [0u8; DIGEST_BYTES];
        hex::decode_to_slice(hex_part, &mut bytes)?;
        Ok(Self(bytes))
    }
}

impl serde::Serialize for Digest {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> serde::Deserialize<'de> for Digest {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Digest::from_str(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_display_and_from_str() {
        let d = Digest::of_bytes(b"hello world");
        let s = d.to_string();
        assert!(s.starts_with("sha256:"));
        assert_eq!(s.len(), "sha256:".len() + DIGEST_BYTES * 2);
        let parsed: Digest = s.parse().unwrap();
        assert_eq!(parsed, d);
    }

    #[test]
    fn rejects_missing_prefix() {
        let bad = "deadbeef";
        assert_eq!(bad.parse::<Digest>(), Err(DigestParseError::MissingPrefix));
    }

    #[test]
    fn same_bytes_same_digest() {
        assert_eq!(Digest::of_bytes(b"abc"), Digest::of_bytes(b"abc"));
        assert_ne!(Digest::of_bytes(b"abc"), Digest::of_bytes(b"abd"));
    }
}
