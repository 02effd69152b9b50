//! Evidence record (spec.md §3): `evidenceId = digest(canonical(record −
//! evidenceId))`.

use serde_json::{json, Value};
use trust_canon::{digest_value, Digest};

#[derive(Clone, Debug)]
pub struct EvidenceRecord {
    pub evidence_id: Digest,
    pub kind: String,
    pub payload: Value,
    pub subject: String,
}

impl EvidenceRecord {
    /// Builds a record, computing `evidenceId` over `{kind, payload,
    /// subject}` — i.e. every field except `evidenceId` itself.
    pub fn new(kind: impl Into<String>, payload: Value, subject: impl Into<String>) -> Self {
        let kind = kind.into();
        let subject = subject.into();
        let evidence_id = evidence_id_of(&kind, &payload, &subject);
        Self { evidence_id, kind, payload, subject }
    }
}

fn evidence_id_of(kind: &str, payload: &Value, subject: &str) -> Digest {
    digest_value(&json!({ "kind": kind, "payload": payload, "subject": subject }))
}
