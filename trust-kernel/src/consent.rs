//! Consent claim (spec.md §3): `{consentId, action, subject:{blockHash,
//! planDigest}, issuerId, seq}`; monotonic per session.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ConsentSubject {
    pub block_hash: String,
    pub plan_digest: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ConsentClaim {
    pub consent_id: String,
    pub action: String,
    pub subject: ConsentSubject,
    pub issuer_id: String,
    pub seq: u64,
}

impl ConsentClaim {
    pub fn matches(&self, block_hash: &str, plan_digest: &str) -> bool {
        self.subject.block_hash == block_hash && self.subject.plan_digest == plan_digest
    }
}
