//! Release manifest verification (spec.md §4.E): seven checks, all run,
//! reasons accumulate (never short-circuiting).

use crate::crypto::CryptoPort;
use crate::manifest::ReleaseManifest;
use crate::privacy;
use std::collections::HashSet;
use trust_algebra::{checkpoint_eq, codes, ReasonCode};
use trust_canon::digest_value;

pub struct VerifyReleaseInput<'a> {
    pub manifest: Option<&'a ReleaseManifest>,
    pub expected_plan_digest: &'a str,
    pub expected_blocks: &'a [String],
    pub expected_path_digest: Option<&'a str>,
    pub crypto_port: Option<&'a dyn CryptoPort>,
    pub key_allowlist: &'a HashSet<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReleaseStatus {
    Verified,
    Failed,
}

#[derive(Clone, Debug)]
pub struct ReleaseVerifyResult {
    pub status: ReleaseStatus,
    pub reason_codes: Vec<ReasonCode>,
    pub release_id: Option<String>,
}

pub fn verify_release(input: &VerifyReleaseInput<'_>) -> ReleaseVerifyResult {
    let mut reasons = Vec::new();

    let Some(manifest) = input.manifest else {
        reasons.push(ReasonCode::new(codes::RELEASE_MANIFEST_MISSING));
        return finish(reasons, None);
    };

    let body = &manifest.manifest_body;

    if body.release_id.is_empty() || body.plan_digest.is_empty() || body.blocks.is_empty() {
        reasons.push(ReasonCode::new(codes::RELEASE_MANIFEST_INVALID));
    }

    let body_value = serde_json::to_value(body).expect("ManifestBody always serializes");
    reasons.extend(privacy::lint(&body_value));

    reasons.extend(checkpoint_eq(&input.expected_plan_digest.to_string(), &body.plan_digest, codes::RELEASE_PLANDIGEST_MISMATCH));

    match (&body.path_digest, input.expected_path_digest) {
        (None, _) => reasons.push(ReasonCode::new(codes::PATH_DIGEST_MISSING)),
        (Some(actual), Some(expected)) => {
            reasons.extend(checkpoint_eq(&expected.to_string(), actual, codes::PATH_DIGEST_MISMATCH));
        }
        (Some(_), None) => {}
    }

    if !blocksets_equal(input.expected_blocks, &body.blocks) {
        reasons.push(ReasonCode::new(codes::RELEASE_BLOCKSET_MISMATCH));
    }

    reasons.extend(verify_signatures(manifest, &body_value, input.crypto_port, input.key_allowlist));

    reasons.sort();
    reasons.dedup();

    let status = if reasons.is_empty() { ReleaseStatus::Verified } else { ReleaseStatus::Failed };
    ReleaseVerifyResult { status, reason_codes: reasons, release_id: Some(body.release_id.clone()) }
}

fn finish(reasons: Vec<ReasonCode>, release_id: Option<String>) -> ReleaseVerifyResult {
    ReleaseVerifyResult { status: ReleaseStatus::Failed, reason_codes: reasons, release_id }
}

fn blocksets_equal(expected: &[String], actual: &[String]) -> bool {
    let mut expected_sorted: Vec<&String> = expected.iter().collect();
    let mut actual_sorted: Vec<&String> = actual.iter().collect();
    expected_sorted.sort();
    expected_sorted.dedup();
    actual_sorted.sort();
    actual_sorted.dedup();
    expected_sorted == actual_sorted
}

fn verify_signatures(
    manifest: &ReleaseManifest,
    body_value: &serde_json::Value,
    crypto_port: Option<&dyn CryptoPort>,
    key_allowlist: &HashSet<String>,
) -> Vec<ReasonCode> {
    let Some(port) = crypto_port else {
        return vec![ReasonCode::new(codes::RELEASE_SIGNATURE_BAD)];
    };

    let digest = digest_value(body_value);

    let any_valid = manifest
        .signatures
        .iter()
        .filter(|sig| key_allowlist.contains(&sig.key_id))
        .any(|sig| port.verify(&sig.sig_kind, &sig.key_id, digest.as_bytes(), &sig.sig_b64));

    if any_valid {
        Vec::new()
    } else {
        vec![ReasonCode::new(codes::RELEASE_SIGNATURE_BAD)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{DemoCryptoPort, SIG_DEMO_V0};
    use crate::manifest::{ManifestBody, ManifestSignature};

    fn body(release_id: &str, plan_digest: &str, blocks: &[&str]) -> ManifestBody {
        ManifestBody {
            release_id: release_id.to_string(),
            plan_digest: plan_digest.to_string(),
            path_digest: Some("sha256:path".to_string()),
            blocks: blocks.iter().map(|s| s.to_string()).collect(),
            policy_digest: None,
            extra: serde_json::Map::new(),
        }
    }

    fn signed_manifest(body: ManifestBody, port: &DemoCryptoPort, key_id: &str) -> ReleaseManifest {
        let body_value = serde_json::to_value(&body).unwrap();
        let digest = digest_value(&body_value);
        let sig_b64 = DemoCryptoPort::sign(key_id, digest.as_bytes());
        let _ = port;
        ReleaseManifest {
            manifest_body: body,
            signatures: vec![ManifestSignature { sig_kind: SIG_DEMO_V0.to_string(), key_id: key_id.to_string(), sig_b64 }],
        }
    }

    #[test]
    fn missing_manifest_reports_missing_code() {
        let input = VerifyReleaseInput {
            manifest: None,
            expected_plan_digest: "plan-1",
            expected_blocks: &[],
            expected_path_digest: None,
            crypto_port: None,
            key_allowlist: &HashSet::new(),
        };
        let result = verify_release(&input);
        assert_eq!(result.status, ReleaseStatus::Failed);
        assert_eq!(result.reason_codes, vec![ReasonCode::new(codes::RELEASE_MANIFEST_MISSING)]);
    }

    #[test]
    fn happy_path_verifies_with_demo_port() {
        let port = DemoCryptoPort::new(["key-1".to_string()]);
        let manifest = signed_manifest(body("release-1", "plan-1", &["block-a", "block-b"]), &port, "key-1");
        let allowlist: HashSet<String> = ["key-1".to_string()].into_iter().collect();
        let expected_blocks = vec!["block-a".to_string(), "block-b".to_string()];

        let input = VerifyReleaseInput {
            manifest: Some(&manifest),
            expected_plan_digest: "plan-1",
            expected_blocks: &expected_blocks,
            expected_path_digest: Some("sha256:path"),
            crypto_port: Some(&port),
            key_allowlist: &allowlist,
        };
        let result = verify_release(&input);
        assert_eq!(result.status, ReleaseStatus::Verified);
        assert!(result.reason_codes.is_empty());
        assert_eq!(result.release_id.as_deref(), Some("release-1"));
    }

    #[test]
    fn plandigest_mismatch_is_reported_alongside_other_failures() {
        let port = DemoCryptoPort::new(["key-1".to_string()]);
        let manifest = signed_manifest(body("release-1", "plan-1", &["block-a"]), &port, "key-1");
        let allowlist: HashSet<String> = ["key-1".to_string()].into_iter().collect();
        let expected_blocks = vec!["block-a".to_string()];

        let input = VerifyReleaseInput {
            manifest: Some(&manifest),
            expected_plan_digest: "plan-OTHER",
            expected_blocks: &expected_blocks,
            expected_path_digest: Some("sha256:path"),
            crypto_port: Some(&port),
            key_allowlist: &allowlist,
        };
        let result = verify_release(&input);
        assert!(result.reason_codes.contains(&ReasonCode::new(codes::RELEASE_PLANDIGEST_MISMATCH)));
    }

    #[test]
    fn blockset_mismatch_accumulates_alongside_signature_failure() {
        let port = DemoCryptoPort::new(["key-1".to_string()]);
        let manifest = signed_manifest(body("release-1", "plan-1", &["block-a"]), &port, "key-1");
        let allowlist: HashSet<String> = HashSet::new();
        let expected_blocks = vec!["block-z".to_string()];

        let input = VerifyReleaseInput {
            manifest: Some(&manifest),
            expected_plan_digest: "plan-1",
            expected_blocks: &expected_blocks,
            expected_path_digest: None,
            crypto_port: Some(&port),
            key_allowlist: &allowlist,
        };
        let result = verify_release(&input);
        assert!(result.reason_codes.contains(&ReasonCode::new(codes::RELEASE_BLOCKSET_MISMATCH)));
        assert!(result.reason_codes.contains(&ReasonCode::new(codes::RELEASE_SIGNATURE_BAD)));
    }

    #[test]
    fn missing_path_digest_is_reported() {
        let port = DemoCryptoPort::new(["key-1".to_string()]);
        let mut b = body("release-1", "plan-1", &["block-a"]);
        b.path_digest = None;
        let manifest = signed_manifest(b, &port, "key-1");
        let allowlist: HashSet<String> = ["key-1".to_string()].into_iter().collect();
        let expected_blocks = vec!["block-a".to_string()];

        let input = VerifyReleaseInput {
            manifest: Some(&manifest),
            expected_plan_digest: "plan-1",
            expected_blocks: &expected_blocks,
            expected_path_digest: None,
            crypto_port: Some(&port),
            key_allowlist: &allowlist,
        };
        let result = verify_release(&input);
        assert!(result.reason_codes.contains(&ReasonCode::new(codes::PATH_DIGEST_MISSING)));
    }

    #[test]
    fn missing_crypto_port_is_signature_bad() {
        let b = body("release-1", "plan-1", &["block-a"]);
        let manifest = ReleaseManifest {
            manifest_body: b,
            signatures: vec![ManifestSignature { sig_kind: SIG_DEMO_V0.to_string(), key_id: "key-1".to_string(), sig_b64: "whatever".to_string() }],
        };
        let allowlist: HashSet<String> = ["key-1".to_string()].into_iter().collect();
        let expected_blocks = vec!["block-a".to_string()];

        let input = VerifyReleaseInput {
            manifest: Some(&manifest),
            expected_plan_digest: "plan-1",
            expected_blocks: &expected_blocks,
            expected_path_digest: None,
            crypto_port: None,
            key_allowlist: &allowlist,
        };
        let result = verify_release(&input);
        assert!(result.reason_codes.contains(&ReasonCode::new(codes::RELEASE_SIGNATURE_BAD)));
    }

    #[test]
    fn privacy_lint_failure_surfaces_alongside_other_checks() {
        let port = DemoCryptoPort::new(["key-1".to_string()]);
        let mut b = body("release-1", "plan-1", &["block-a"]);
        b.extra.insert("note".to_string(), serde_json::json!("/etc/passwd"));
        let manifest = signed_manifest(b, &port, "key-1");
        let allowlist: HashSet<String> = ["key-1".to_string()].into_iter().collect();
        let expected_blocks = vec!["block-a".to_string()];

        let input = VerifyReleaseInput {
            manifest: Some(&manifest),
            expected_plan_digest: "plan-1",
            expected_blocks: &expected_blocks,
            expected_path_digest: Some("sha256:path"),
            crypto_port: Some(&port),
            key_allowlist: &allowlist,
        };
        let result = verify_release(&input);
        assert!(result.reason_codes.contains(&ReasonCode::new(codes::RELEASE_PRIVACY_FAIL_PATH)));
    }
}
