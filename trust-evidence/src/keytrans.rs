//! The built-in `keytrans.inclusion.v1` verifier (spec.md §4.D).

use crate::record::EvidenceRecord;
use crate::verifier::{EvidenceVerifier, VerifierResult, VerifierStatus, VerifyContext};
use serde_json::{json, Value};
use trust_algebra::{codes, ReasonCode};
use trust_canon::{to_canonical_bytes, Digest};

pub const KEYTRANS_INCLUSION_V1: &str = "keytrans.inclusion.v1";
const MAX_PAYLOAD_BYTES: usize = 4096;
const ALLOWED_KEYS: [&str; 3] = ["directoryHeadDigest", "keyIdDigest", "proofDigest"];
const VERIFIER_VERSION: &str = "1.0.0";

pub struct KeytransInclusionVerifier;

impl EvidenceVerifier for KeytransInclusionVerifier {
    fn kind(&self) -> &'static str {
        KEYTRANS_INCLUSION_V1
    }

    fn verify(&self, record: &EvidenceRecord, _context: &VerifyContext) -> VerifierResult {
        let mut reasons = Vec::new();
        let mut normalized_claims = Vec::new();

        let Some(obj) = record.payload.as_object() else {
            reasons.push(ReasonCode::new(codes::KEYTRANS_INVALID));
            return result(reasons, normalized_claims);
        };

        if obj.keys().any(|k| !ALLOWED_KEYS.contains(&k.as_str())) {
            reasons.push(ReasonCode::new(codes::KEYTRANS_INVALID));
        }

        let mut first_digest: Option<Digest> = None;
        for key in ALLOWED_KEYS {
            let Some(value) = obj.get(key) else { continue };
            match value.as_str().and_then(|s| s.parse::<Digest>().ok()) {
                Some(digest) => {
                    if first_digest.is_none() {
                        first_digest = Some(digest);
                    }
                }
                None => reasons.push(ReasonCode::new(codes::KEYTRANS_DIGEST_INVALID)),
            }
        }

        if to_canonical_bytes(&record.payload).len() > MAX_PAYLOAD_BYTES {
            reasons.push(ReasonCode::new(codes::KEYTRANS_PAYLOAD_TOO_LARGE));
        }

        if let Some(digest) = first_digest {
            normalized_claims.push(json!({ "digest": digest.to_string() }));
        }

        result(reasons, normalized_claims)
    }
}

fn result(reason_codes: Vec<ReasonCode>, normalized_claims: Vec<Value>) -> VerifierResult {
    let status = if reason_codes.is_empty() { VerifierStatus::Verified } else { VerifierStatus::Unverified };
    VerifierResult { status, verifier_id: KEYTRANS_INCLUSION_V1.to_string(), verifier_version: VERIFIER_VERSION.to_string(), reason_codes, normalized_claims }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verify(payload: Value) -> VerifierResult {
        let record = EvidenceRecord::new(KEYTRANS_INCLUSION_V1, payload, "subject-1");
        KeytransInclusionVerifier.verify(&record, &VerifyContext)
    }

    #[test]
    fn accepts_valid_payload_and_produces_claim() {
        let digest = Digest::of_bytes(b"head").to_string();
        let res = verify(json!({ "directoryHeadDigest": digest }));
        assert_eq!(res.status, VerifierStatus::Verified);
        assert!(res.reason_codes.is_empty());
        assert_eq!(res.normalized_claims.len(), 1);
    }

    #[test]
    fn rejects_extra_keys() {
        let res = verify(json!({ "notAllowed": "x" }));
        assert_eq!(res.status, VerifierStatus::Unverified);
        assert!(res.reason_codes.iter().any(|r| r.as_str() == codes::KEYTRANS_INVALID));
    }

    #[test]
    fn rejects_non_digest_value() {
        let res = verify(json!({ "proofDigest": "not-a-digest" }));
        assert!(res.reason_codes.iter().any(|r| r.as_str() == codes::KEYTRANS_DIGEST_INVALID));
    }

    #[test]
    fn accepts_payload_under_size_limit() {
        let payload = json!({
            "directoryHeadDigest": Digest::of_bytes(b"h").to_string(),
            "keyIdDigest": Digest::of_bytes(b"k").to_string(),
            "proofDigest": Digest::of_bytes(b"p").to_string(),
        });
        let res = verify(payload);
        assert!(!res.reason_codes.iter().any(|r| r.as_str() == codes::KEYTRANS_PAYLOAD_TOO_LARGE));
    }

    #[test]
    fn rejects_oversized_payload() {
        // the allowed keys only ever hold short digest strings, so an
        // over-budget payload must come through an invalid (non-digest)
        // value long enough to blow the canonical-size check.
        let oversized = "x".repeat(MAX_PAYLOAD_BYTES + 1);
        let res = verify(json!({ "proofDigest": oversized }));
        assert!(res.reason_codes.iter().any(|r| r.as_str() == codes::KEYTRANS_PAYLOAD_TOO_LARGE));
    }

    #[test]
    fn not_an_object_is_invalid() {
        let res = verify(json!("just a string"));
        assert_eq!(res.status, VerifierStatus::Unverified);
        assert_eq!(res.reason_codes, vec![ReasonCode::new(codes::KEYTRANS_INVALID)]);
    }
}
