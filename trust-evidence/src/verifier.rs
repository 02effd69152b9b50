//! Verifier plug-in table (spec.md §4.D): `kind -> verifier(record, context)
//! -> result`. New kinds are registered at startup only (spec.md §9).

use crate::record::EvidenceRecord;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use trust_algebra::{Decision, ReasonCode};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VerifierStatus {
    Verified,
    Unverified,
}

impl VerifierStatus {
    /// The decision-lattice reading of this status, for callers that fold
    /// evidence results into a broader join.
    pub fn as_decision(self) -> Decision {
        match self {
            VerifierStatus::Verified => Decision::Yes,
            VerifierStatus::Unverified => Decision::No,
        }
    }
}

#[derive(Clone, Debug)]
pub struct VerifierResult {
    pub status: VerifierStatus,
    pub verifier_id: String,
    pub verifier_version: String,
    pub reason_codes: Vec<ReasonCode>,
    pub normalized_claims: Vec<Value>,
}

/// Verifiers are pure: the same `(record, context)` always produces the same
/// result.
pub trait EvidenceVerifier: Send + Sync {
    fn kind(&self) -> &'static str;
    fn verify(&self, record: &EvidenceRecord, context: &VerifyContext) -> VerifierResult;
}

/// Placeholder for per-call context a verifier might need (e.g. an
/// allowlist). Currently carries nothing: the built-in verifier is fully
/// self-contained, but the type exists so the registry's call signature
/// doesn't need to change when a future verifier needs context.
#[derive(Clone, Copy, Debug, Default)]
pub struct VerifyContext;

#[derive(Default)]
pub struct EvidenceRegistry {
    verifiers: HashMap<&'static str, Arc<dyn EvidenceVerifier>>,
}

impl EvidenceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, verifier: Arc<dyn EvidenceVerifier>) {
        self.verifiers.insert(verifier.kind(), verifier);
    }

    pub fn get(&self, kind: &str) -> Option<&Arc<dyn EvidenceVerifier>> {
        self.verifiers.get(kind)
    }

    pub fn verify(&self, record: &EvidenceRecord, context: &VerifyContext) -> Option<VerifierResult> {
        self.get(&record.kind).map(|verifier| verifier.verify(record, context))
    }
}
