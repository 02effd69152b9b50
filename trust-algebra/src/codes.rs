//! The reason-code namespace from spec.md §6, reproduced once here so every
//! crate references a single canonical copy instead of repeating string
//! literals.

// Release
pub const RELEASE_MANIFEST_MISSING: &str = "RELEASE_MANIFEST_MISSING";
pub const RELEASE_MANIFEST_INVALID: &str = "RELEASE_MANIFEST_INVALID";
pub const RELEASE_PLANDIGEST_MISMATCH: &str = "RELEASE_PLANDIGEST_MISMATCH";
pub const RELEASE_BLOCKSET_MISMATCH: &str = "RELEASE_BLOCKSET_MISMATCH";
pub const RELEASE_SIGNATURE_BAD: &str = "RELEASE_SIGNATURE_BAD";
pub const PATH_DIGEST_MISSING: &str = "PATH_DIGEST_MISSING";
pub const PATH_DIGEST_MISMATCH: &str = "PATH_DIGEST_MISMATCH";

// Privacy lint (release manifest)
pub const RELEASE_PRIVACY_FAIL_PATH: &str = "RELEASE_PATH_PRIVACY_FAIL";
pub const RELEASE_PRIVACY_FAIL_ENV: &str = "RELEASE_ENV_PRIVACY_FAIL";

// Artifact
pub const ARTIFACT_INPUT_INVALID: &str = "ARTIFACT_INPUT_INVALID";
pub const ARTIFACT_MISSING: &str = "ARTIFACT_MISSING";
pub const ARTIFACT_DIGEST_MISMATCH: &str = "ARTIFACT_DIGEST_MISMATCH";
pub const ARTIFACT_RECOVERED: &str = "ARTIFACT_RECOVERED";

// Kernel
pub const MODE_MISMATCH: &str = "MODE_MISMATCH";
pub const PLANDIGEST_MISMATCH: &str = "PLANDIGEST_MISMATCH";
pub const NONCE_MISMATCH: &str = "NONCE_MISMATCH";
pub const CALLER_MISMATCH: &str = "CALLER_MISMATCH";
pub const CAP_UNKNOWN: &str = "CAP_UNKNOWN";
pub const CAP_NOT_GRANTED: &str = "CAP_NOT_GRANTED";
pub const NET_DISABLED_IN_V0: &str = "NET_DISABLED_IN_V0";
pub const TIER_VIOLATION: &str = "TIER_VIOLATION";
pub const STAMP_MISSING: &str = "STAMP_MISSING";
pub const STAMP_INVALID: &str = "STAMP_INVALID";
pub const STAMP_SIG_INVALID: &str = "STAMP_SIG_INVALID";
pub const CONSENT_MISSING: &str = "CONSENT_MISSING";
pub const CONSENT_INVALID: &str = "CONSENT_INVALID";

// Sandbox
pub const STRICT_COMPARTMENT_UNAVAILABLE: &str = "STRICT_COMPARTMENT_UNAVAILABLE";
pub const SANDBOX_HARDENING_FAILED_PREFIX: &str = "SANDBOX_HARDENING_FAILED";
pub const SANDBOX_EVAL_ERROR: &str = "SANDBOX_EVAL_ERROR";
pub const SANDBOX_EXECUTION_ERROR: &str = "SANDBOX_EXECUTION_ERROR";
pub const SANDBOX_ENTRY_MISSING: &str = "SANDBOX_ENTRY_MISSING";
pub const UNTRUSTED_CHANNEL: &str = "UNTRUSTED_CHANNEL";

// SecretZone
pub const SECRET_ZONE_UNAVAILABLE: &str = "SECRET_ZONE_UNAVAILABLE";
pub const SECRET_ZONE_TIMEOUT: &str = "SECRET_ZONE_TIMEOUT";
pub const CONTEXT_MISMATCH: &str = "CONTEXT_MISMATCH";

// Evidence
pub const KEYTRANS_INVALID: &str = "KEYTRANS_INVALID";
pub const KEYTRANS_DIGEST_INVALID: &str = "KEYTRANS_DIGEST_INVALID";
pub const KEYTRANS_PAYLOAD_TOO_LARGE: &str = "KEYTRANS_PAYLOAD_TOO_LARGE";

// Meta
pub const TRUST_REASONS_TRUNCATED_PREFIX: &str = "TRUST_REASONS_TRUNCATED";

/// Builds a `SANDBOX_HARDENING_FAILED:<name>` detail code.
pub fn sandbox_hardening_failed(name: &str) -> String {
    format!("{SANDBOX_HARDENING_FAILED_PREFIX}:{name}")
}
