//! Message envelope (spec.md §4.F, §6): `{executionMode, planDigest,
//! sessionNonce}`, carried on every message in either direction.

use crate::nonce::{safe_equal, Nonce};
use serde::{Deserialize, Serialize};
use trust_algebra::{codes, ReasonCode};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExecutionMode {
    Strict,
    StrictPrivacy,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    pub execution_mode: ExecutionMode,
    pub plan_digest: String,
    pub session_nonce: Nonce,
}

/// The bound context a port expects every message to match, fixed for the
/// lifetime of a session (spec.md §3: "nonces never reused").
#[derive(Clone, Debug)]
pub struct BoundContext {
    pub execution_mode: ExecutionMode,
    pub plan_digest: String,
    pub session_nonce: Nonce,
}

impl BoundContext {
    pub fn to_envelope(&self) -> Envelope {
        Envelope { execution_mode: self.execution_mode, plan_digest: self.plan_digest.clone(), session_nonce: self.session_nonce.clone() }
    }
}

/// Validates an incoming envelope against the port's bound context
/// (spec.md §4.F): a mismatch never dispatches to application handlers,
/// it produces the reason codes for an auto-replied rejection instead.
pub fn validate_envelope(expected: &BoundContext, actual: &Envelope) -> Vec<ReasonCode> {
    let mut reasons = Vec::new();
    if expected.execution_mode != actual.execution_mode {
        reasons.push(ReasonCode::new(codes::MODE_MISMATCH));
    }
    if expected.plan_digest != actual.plan_digest {
        reasons.push(ReasonCode::new(codes::CONTEXT_MISMATCH));
    }
    if !safe_equal(expected.session_nonce.as_str(), actual.session_nonce.as_str()) {
        reasons.push(ReasonCode::new(codes::NONCE_MISMATCH));
    }
    reasons.sort();
    reasons.dedup();
    reasons
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> BoundContext {
        BoundContext { execution_mode: ExecutionMode::Strict, plan_digest: "plan-1".to_string(), session_nonce: Nonce::generate() }
    }

    #[test]
    fn matching_envelope_has_no_mismatch_reasons() {
        let ctx = context();
        let envelope = ctx.to_envelope();
        assert!(validate_envelope(&ctx, &envelope).is_empty());
    }

    #[test]
    fn mode_mismatch_is_reported() {
        let ctx = context();
        let mut envelope = ctx.to_envelope();
        envelope.execution_mode = ExecutionMode::StrictPrivacy;
        assert_eq!(validate_envelope(&ctx, &envelope), vec![ReasonCode::new(codes::MODE_MISMATCH)]);
    }

    #[test]
    fn plan_digest_mismatch_is_reported_as_context_mismatch() {
        let ctx = context();
        let mut envelope = ctx.to_envelope();
        envelope.plan_digest = "plan-OTHER".to_string();
        assert_eq!(validate_envelope(&ctx, &envelope), vec![ReasonCode::new(codes::CONTEXT_MISMATCH)]);
    }

    #[test]
    fn nonce_mismatch_is_reported() {
        let ctx = context();
        let mut envelope = ctx.to_envelope();
        envelope.session_nonce = Nonce::generate();
        assert_eq!(validate_envelope(&ctx, &envelope), vec![ReasonCode::new(codes::NONCE_MISMATCH)]);
    }

    #[test]
    fn all_mismatches_accumulate() {
        let ctx = context();
        let envelope = Envelope { execution_mode: ExecutionMode::StrictPrivacy, plan_digest: "other".to_string(), session_nonce: Nonce::generate() };
        let reasons = validate_envelope(&ctx, &envelope);
        assert_eq!(reasons.len(), 3);
    }
}
