//! Incident records (spec.md §4.C): a pure function of inputs plus a
//! per-store monotonic `seq` counter.

use serde::{Deserialize, Serialize};
use trust_algebra::ReasonCode;
use trust_canon::Digest;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Incident {
    pub kind: String,
    pub plan_digest: Option<Digest>,
    pub block_hash: Option<Digest>,
    pub reason_codes: Vec<ReasonCode>,
    pub seq: u64,
}

/// Context the caller supplies so incidents can be attributed to the
/// plan/block they occurred under, without the store itself holding any
/// ambient notion of "current plan" (spec.md §9: "no global state").
#[derive(Clone, Debug, Default)]
pub struct IncidentContext {
    pub plan_digest: Option<Digest>,
    pub block_hash: Option<Digest>,
}
