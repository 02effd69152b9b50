//! Plan snapshot (spec.md §3): the acyclic-DAG descriptor a release is bound
//! to. `planDigest` and the path-summary's digest are both derived here.

use serde::Serialize;
use serde_json::Value;
use trust_canon::{digest_value, Digest};
use trust_channel::ExecutionMode;
use trust_kernel::Tier;

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanArtifact {
    pub node_id: String,
    pub content_hash: String,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanGrant {
    pub block_hash: String,
    pub eligible_caps: Vec<String>,
}

/// `{graphDigest, artifacts[], policyDigest, evidenceDigests[], grants[],
/// mode, tier, pathSummary}` (spec.md §3). `pathSummary` is left as an
/// opaque `Value`: its shape is owned by the path-planning collaborator this
/// crate does not implement, only digests.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanSnapshot {
    pub graph_digest: String,
    pub artifacts: Vec<PlanArtifact>,
    pub policy_digest: String,
    pub evidence_digests: Vec<String>,
    pub grants: Vec<PlanGrant>,
    pub mode: ExecutionMode,
    pub tier: Tier,
    pub path_summary: Value,
}

impl PlanSnapshot {
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).expect("PlanSnapshot always serializes")
    }

    /// `planDigest`: the SHA-256 of the canonical JSON of the whole
    /// snapshot. Changing any field, including `policyDigest`, changes it
    /// (spec.md §3, property P6).
    pub fn plan_digest(&self) -> Digest {
        digest_value(&self.to_value())
    }

    /// `expectedPathDigest` (spec.md §4.J step 1): the canonical digest of
    /// `pathSummary` alone.
    pub fn expected_path_digest(&self) -> Digest {
        digest_value(&self.path_summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn snapshot() -> PlanSnapshot {
        PlanSnapshot {
            graph_digest: "sha256:graph".to_string(),
            artifacts: vec![PlanArtifact { node_id: "n1".to_string(), content_hash: "sha256:aa".to_string() }],
            policy_digest: "policy-1".to_string(),
            evidence_digests: vec!["sha256:ev1".to_string()],
            grants: vec![PlanGrant { block_hash: "block-a".to_string(), eligible_caps: vec!["net.fetch".to_string()] }],
            mode: ExecutionMode::Strict,
            tier: Tier::T1,
            path_summary: json!({"steps": 3}),
        }
    }

    /// Property P6: changing any field changes `planDigest`.
    #[test]
    fn changing_policy_digest_changes_plan_digest() {
        let a = snapshot();
        let mut b = snapshot();
        b.policy_digest = "policy-2".to_string();
        assert_ne!(a.plan_digest(), b.plan_digest());
    }

    #[test]
    fn changing_path_summary_changes_plan_digest_but_not_unrelated_fields() {
        let a = snapshot();
        let mut b = snapshot();
        b.path_summary = json!({"steps": 4});
        assert_ne!(a.plan_digest(), b.plan_digest());
        assert_ne!(a.expected_path_digest(), b.expected_path_digest());
    }

    #[test]
    fn identical_snapshots_produce_identical_digests() {
        assert_eq!(snapshot().plan_digest(), snapshot().plan_digest());
    }
}
