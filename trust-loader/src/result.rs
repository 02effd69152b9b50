//! The strict loader's persisted-state output (spec.md §6): canonical JSON,
//! byte-identical across runs and across implementations for the same
//! inputs (spec.md §8 "Golden outputs").

use crate::severity::IncidentSummary;
use serde_json::Value;
use trust_algebra::{ReasonCode, Verdict};
use trust_canon::{to_canonical_bytes, Digest};
use trust_release::ReleaseStatus;
use trust_store::Incident;

fn verdict_str(v: Verdict) -> &'static str {
    match v {
        Verdict::Allow => "ALLOW",
        Verdict::Deny => "DENY",
        Verdict::Quarantine => "QUARANTINE",
    }
}

fn release_status_str(s: &ReleaseStatus) -> &'static str {
    match s {
        ReleaseStatus::Verified => "OK",
        ReleaseStatus::Failed => "UNVERIFIED",
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExecuteResult {
    Allow,
    Deny,
    Skip,
}

impl ExecuteResult {
    fn as_str(self) -> &'static str {
        match self {
            ExecuteResult::Allow => "ALLOW",
            ExecuteResult::Deny => "DENY",
            ExecuteResult::Skip => "SKIP",
        }
    }
}

#[derive(Clone, Debug)]
pub struct LoaderVerify {
    pub verdict: Verdict,
    pub reason_codes: Vec<ReasonCode>,
    pub release_status: ReleaseStatus,
    pub release_reason_codes: Vec<ReasonCode>,
    pub release_id: Option<String>,
}

#[derive(Clone, Debug)]
pub struct LoaderExecute {
    pub attempted: bool,
    pub result: ExecuteResult,
    pub reason_codes: Vec<ReasonCode>,
}

#[derive(Clone, Debug)]
pub struct LoaderResult {
    pub verify: LoaderVerify,
    pub execute: LoaderExecute,
    pub verdict: Verdict,
    pub execution_ok: bool,
    pub reason_codes: Vec<ReasonCode>,
    pub plan_digest: Digest,
    pub policy_digest: String,
    pub evidence_digests: Vec<String>,
    pub expected_artifact_digest: Option<Digest>,
    pub observed_artifact_digest: Option<Digest>,
    pub release_id: Option<String>,
    pub rollback: Option<Value>,
    pub incident_summary: IncidentSummary,
    pub incident_latest: Option<Incident>,
}

fn reasons_value(reasons: &[ReasonCode]) -> Value {
    Value::Array(reasons.iter().map(|r| Value::String(r.as_str().to_string())).collect())
}

fn incident_value(incident: &Incident) -> Value {
    serde_json::json!({
        "kind": incident.kind,
        "planDigest": incident.plan_digest.map(|d| d.to_string()),
        "blockHash": incident.block_hash.map(|d| d.to_string()),
        "reasonCodes": reasons_value(&incident.reason_codes),
        "seq": incident.seq,
    })
}

impl LoaderResult {
    /// Builds the canonical JSON value for this result, matching the exact
    /// field set and nesting of spec.md §6.
    pub fn to_canonical_value(&self) -> Value {
        serde_json::json!({
            "verify": {
                "verdict": verdict_str(self.verify.verdict),
                "reasonCodes": reasons_value(&self.verify.reason_codes),
                "releaseStatus": release_status_str(&self.verify.release_status),
                "releaseReasonCodes": reasons_value(&self.verify.release_reason_codes),
                "releaseId": self.verify.release_id,
            },
            "execute": {
                "attempted": self.execute.attempted,
                "result": self.execute.result.as_str(),
                "reasonCodes": reasons_value(&self.execute.reason_codes),
            },
            "verdict": verdict_str(self.verdict),
            "executionOk": self.execution_ok,
            "reasonCodes": reasons_value(&self.reason_codes),
            "planDigest": self.plan_digest.to_string(),
            "policyDigest": self.policy_digest,
            "evidenceDigests": self.evidence_digests,
            "expectedArtifactDigest": self.expected_artifact_digest.map(|d| d.to_string()),
            "observedArtifactDigest": self.observed_artifact_digest.map(|d| d.to_string()),
            "releaseId": self.release_id,
            "rollback": self.rollback,
            "incidentSummary": serde_json::to_value(&self.incident_summary).expect("IncidentSummary always serializes"),
            "incidentLatest": self.incident_latest.as_ref().map(incident_value),
        })
    }

    pub fn to_canonical_bytes(&self) -> Vec<u8> {
        to_canonical_bytes(&self.to_canonical_value())
    }
}
