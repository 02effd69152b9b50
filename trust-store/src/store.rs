//! Content-addressed artifact store (spec.md §4.C). Two slots per key:
//! `current` (authoritative) and `lastGood` (recovery snapshot written on
//! every successful `put`). Recovery is one-shot per read and never
//! synthesizes bytes it didn't already hold.

use crate::incident::{Incident, IncidentContext};
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use trust_algebra::{codes, ReasonCode};
use trust_canon::Digest;
use trust_core::log::warn;

#[derive(Debug)]
pub struct PutOutcome {
    pub ok: bool,
    pub reasons: Vec<ReasonCode>,
    pub incident: Option<Incident>,
}

#[derive(Debug)]
pub enum ReadOutcome {
    Ok { value: Vec<u8>, observed_digest: Digest },
    Recovered { value: Vec<u8>, reasons: Vec<ReasonCode>, incident: Incident },
    Fail { reasons: Vec<ReasonCode>, incident: Option<Incident> },
}

impl ReadOutcome {
    pub fn reasons(&self) -> &[ReasonCode] {
        match self {
            ReadOutcome::Ok { .. } => &[],
            ReadOutcome::Recovered { reasons, .. } => reasons,
            ReadOutcome::Fail { reasons, .. } => reasons,
        }
    }

    pub fn value(&self) -> Option<&[u8]> {
        match self {
            ReadOutcome::Ok { value, .. } => Some(value),
            ReadOutcome::Recovered { value, .. } => Some(value),
            ReadOutcome::Fail { .. } => None,
        }
    }

    pub fn recovered(&self) -> bool {
        matches!(self, ReadOutcome::Recovered { .. })
    }

    pub fn incident(&self) -> Option<&Incident> {
        match self {
            ReadOutcome::Ok { .. } => None,
            ReadOutcome::Recovered { incident, .. } => Some(incident),
            ReadOutcome::Fail { incident, .. } => incident.as_ref(),
        }
    }
}

pub const ARTIFACT_MISMATCH_INCIDENT_KIND: &str = "artifact.mismatch";

/// In-process, content-addressed artifact cache. Not backed by disk: this
/// store's two slots hold the full artifact bytes in memory for the
/// lifetime of the process, per spec.md §3's "destroyed at process end".
#[derive(Default)]
pub struct ArtifactStore {
    current: DashMap<String, Vec<u8>>,
    last_good: DashMap<String, Vec<u8>>,
    seq: AtomicU64,
}

impl ArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// `put(expectedDigest, bytes)`. On digest mismatch, neither slot is
    /// touched and an incident is emitted. On success, both `current` and
    /// `lastGood` are overwritten with `bytes`.
    pub fn put(&self, expected_digest: &Digest, bytes: Vec<u8>, ctx: &IncidentContext) -> PutOutcome {
        let observed = Digest::of_bytes(&bytes);
        if observed != *expected_digest {
            let reasons = vec![ReasonCode::new(codes::ARTIFACT_DIGEST_MISMATCH)];
            let incident = self.emit_incident(ctx, reasons.clone());
            warn!("artifact put digest mismatch: expected={expected_digest} observed={observed}");
            return PutOutcome { ok: false, reasons, incident: Some(incident) };
        }

        let key = expected_digest.to_string();
        self.current.insert(key.clone(), bytes.clone());
        self.last_good.insert(key, bytes);
        PutOutcome { ok: true, reasons: Vec::new(), incident: None }
    }

    /// `read(expectedDigest)`. Missing key fails closed with
    /// `ARTIFACT_MISSING` and no incident. A digest mismatch with a
    /// recoverable `lastGood` snapshot restores `current` and returns the
    /// recovered bytes; without one, the read fails closed.
    pub fn read(&self, expected_digest: &Digest, ctx: &IncidentContext) -> ReadOutcome {
        let key = expected_digest.to_string();
        let Some(current_bytes) = self.current.get(&key).map(|entry| entry.clone()) else {
            return ReadOutcome::Fail { reasons: vec![ReasonCode::new(codes::ARTIFACT_MISSING)], incident: None };
        };

        let observed = Digest::of_bytes(&current_bytes);
        if observed == *expected_digest {
            return ReadOutcome::Ok { value: current_bytes, observed_digest: observed };
        }

        if let Some(last_good) = self.last_good.get(&key).map(|entry| entry.clone()) {
            self.current.insert(key, last_good.clone());
            let reasons = vec![ReasonCode::new(codes::ARTIFACT_DIGEST_MISMATCH), ReasonCode::new(codes::ARTIFACT_RECOVERED)];
            let incident = self.emit_incident(ctx, reasons.clone());
            warn!("artifact tamper recovered from lastGood for {expected_digest}");
            return ReadOutcome::Recovered { value: last_good, reasons, incident };
        }

        let reasons = vec![ReasonCode::new(codes::ARTIFACT_DIGEST_MISMATCH)];
        let incident = self.emit_incident(ctx, reasons.clone());
        warn!("artifact read failed closed, no lastGood for {expected_digest}");
        ReadOutcome::Fail { reasons, incident: Some(incident) }
    }

    fn emit_incident(&self, ctx: &IncidentContext, reason_codes: Vec<ReasonCode>) -> Incident {
        let seq = self.seq.fetch_add(1, Ordering::SeqCst) + 1;
        Incident { kind: ARTIFACT_MISMATCH_INCIDENT_KIND.to_string(), plan_digest: ctx.plan_digest, block_hash: ctx.block_hash, reason_codes, seq }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> IncidentContext {
        IncidentContext::default()
    }

    #[test]
    fn put_then_read_round_trips() {
        let store = ArtifactStore::new();
        let bytes = b"hello".to_vec();
        let digest = Digest::of_bytes(&bytes);
        let put = store.put(&digest, bytes.clone(), &ctx());
        assert!(put.ok);
        match store.read(&digest, &ctx()) {
            ReadOutcome::Ok { value, observed_digest } => {
                assert_eq!(value, bytes);
                assert_eq!(observed_digest, digest);
            }
            other => panic!("expected Ok, got {other:?}"),
        }
    }

    #[test]
    fn put_digest_mismatch_is_rejected_and_emits_incident() {
        let store = ArtifactStore::new();
        let bytes = b"hello".to_vec();
        let wrong_digest = Digest::of_bytes(b"not hello");
        let put = store.put(&wrong_digest, bytes, &ctx());
        assert!(!put.ok);
        assert_eq!(put.reasons, vec![ReasonCode::new(codes::ARTIFACT_DIGEST_MISMATCH)]);
        assert_eq!(put.incident.unwrap().seq, 1);
    }

    #[test]
    fn read_missing_key_fails_closed_without_incident() {
        let store = ArtifactStore::new();
        let digest = Digest::of_bytes(b"never stored");
        match store.read(&digest, &ctx()) {
            ReadOutcome::Fail { reasons, incident } => {
                assert_eq!(reasons, vec![ReasonCode::new(codes::ARTIFACT_MISSING)]);
                assert!(incident.is_none());
            }
            other => panic!("expected Fail, got {other:?}"),
        }
    }

    /// Scenario 2 / property P5: tamper recovered from lastGood.
    #[test]
    fn tamper_recovers_from_last_good() {
        let store = ArtifactStore::new();
        let src = b"original bytes".to_vec();
        let digest = Digest::of_bytes(&src);
        assert!(store.put(&digest, src.clone(), &ctx()).ok);

        // simulate tampering: overwrite current directly through a fresh put
        // of the wrong bytes under the same key is rejected by `put`, so we
        // reach into the same storage key the way corruption-on-disk would.
        store.current.insert(digest.to_string(), b"corrupted".to_vec());

        match store.read(&digest, &ctx()) {
            ReadOutcome::Recovered { value, reasons, incident } => {
                assert_eq!(value, src);
                assert_eq!(reasons, vec![ReasonCode::new(codes::ARTIFACT_DIGEST_MISMATCH), ReasonCode::new(codes::ARTIFACT_RECOVERED)]);
                assert_eq!(incident.kind, ARTIFACT_MISMATCH_INCIDENT_KIND);
                assert_eq!(incident.seq, 1);
            }
            other => panic!("expected Recovered, got {other:?}"),
        }

        // current was restored in place
        match store.read(&digest, &ctx()) {
            ReadOutcome::Ok { value, .. } => assert_eq!(value, src),
            other => panic!("expected Ok after recovery, got {other:?}"),
        }
    }

    /// Scenario 3: tamper with no lastGood fails closed.
    #[test]
    fn tamper_without_last_good_fails_closed() {
        let store = ArtifactStore::new();
        let src = b"original".to_vec();
        let digest = Digest::of_bytes(&src);
        // write current only, bypassing put's lastGood write, to model a
        // store state with no recovery snapshot.
        store.current.insert(digest.to_string(), b"tampered".to_vec());

        match store.read(&digest, &ctx()) {
            ReadOutcome::Fail { reasons, incident } => {
                assert_eq!(reasons, vec![ReasonCode::new(codes::ARTIFACT_DIGEST_MISMATCH)]);
                assert!(incident.is_some());
            }
            other => panic!("expected Fail, got {other:?}"),
        }
    }

    #[test]
    fn recovery_is_one_shot_and_reoccurring_corruption_bumps_seq() {
        let store = ArtifactStore::new();
        let src = b"original".to_vec();
        let digest = Digest::of_bytes(&src);
        store.put(&digest, src.clone(), &ctx());

        store.current.insert(digest.to_string(), b"corrupt-1".to_vec());
        let first = store.read(&digest, &ctx());
        assert!(first.recovered());
        assert_eq!(first.incident().unwrap().seq, 1);

        store.current.insert(digest.to_string(), b"corrupt-2".to_vec());
        let second = store.read(&digest, &ctx());
        assert!(second.recovered());
        assert_eq!(second.incident().unwrap().seq, 2);
    }
}
