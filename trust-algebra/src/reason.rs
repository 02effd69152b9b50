//! `ReasonCode`: an uppercase token, optionally `CODE:detail` with `detail`
//! truncated to 512 UTF-8 bytes at a codepoint boundary (spec.md §3).

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

const MAX_DETAIL_BYTES: usize = 512;

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReasonCode(String);

impl ReasonCode {
    /// Builds a reason code, truncating any `CODE:detail` suffix to
    /// `MAX_DETAIL_BYTES` at a codepoint boundary. Does not validate that the
    /// code portion is uppercase — callers always pass the namespace
    /// constants from [`crate::codes`] or a construction helper, so the
    /// uppercase invariant is enforced at those call sites instead of here.
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        match raw.split_once(':') {
            Some((code, detail)) if detail.len() > MAX_DETAIL_BYTES => {
                let truncated = truncate_at_char_boundary(detail, MAX_DETAIL_BYTES);
                Self(format!("{code}:{truncated}"))
            }
            _ => Self(raw),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The bare code, without any `:detail` suffix.
    pub fn code(&self) -> &str {
        self.0.split_once(':').map(|(c, _)| c).unwrap_or(&self.0)
    }
}

impl Display for ReasonCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ReasonCode {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ReasonCode {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

fn truncate_at_char_boundary(s: &str, max_bytes: usize) -> &str {
    let mut end = max_bytes.min(s.len());
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}
