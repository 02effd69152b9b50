//! `requestConsent` (spec.md §4.I): under `executionMode=strict-privacy`,
//! secrets never cross the block boundary. A consent request is posted over
//! the bound channel and the result awaited under a *logical* timeout — the
//! deadline is a fixed tick count, never a live `Instant::now()` read inside
//! the decision path.

use serde_json::{json, Value};
use std::time::Duration;
use trust_algebra::{codes, ReasonCode};
use trust_channel::{Port, RecvOutcome};
use trust_core::time::ClockPort;
use trust_kernel::{ConsentClaim, ConsentSubject};

/// 10 ticks of 100ms: a fixed, reproducible bound standing in for the
/// spec's "1-second deterministic timeout" — the tick count is the
/// decision boundary, not the wall-clock reads used only to stamp the
/// resulting incident.
const TIMEOUT_TICKS: u32 = 10;
const TICK: Duration = Duration::from_millis(100);

pub struct ConsentRequest {
    pub action: String,
    pub subject: ConsentSubject,
    pub scope: Option<Value>,
}

pub struct SecretZoneOutcome {
    pub ok: bool,
    pub consent: Option<ConsentClaim>,
    pub reason_codes: Vec<ReasonCode>,
    /// Audit-garnish timestamp for the resulting incident; never consulted
    /// by the decision itself.
    pub observed_at_ms: u64,
}

/// `requestConsent(action, subject, scope?)` (spec.md §4.I). `port` is
/// absent entirely when no channel exists for this session.
pub async fn request_consent(port: Option<&Port>, clock: &dyn ClockPort, request: ConsentRequest) -> SecretZoneOutcome {
    let observed_at_ms = clock.now_ms();

    let Some(port) = port else {
        return SecretZoneOutcome { ok: false, consent: None, reason_codes: vec![ReasonCode::new(codes::SECRET_ZONE_UNAVAILABLE)], observed_at_ms };
    };

    let envelope_body = json!({
        "kind": "consent.request",
        "action": request.action,
        "subject": {"blockHash": request.subject.block_hash, "planDigest": request.subject.plan_digest},
        "scope": request.scope,
    });

    if port.post_message(envelope_body).await.is_err() {
        return SecretZoneOutcome { ok: false, consent: None, reason_codes: vec![ReasonCode::new(codes::SECRET_ZONE_UNAVAILABLE)], observed_at_ms };
    }

    for _ in 0..TIMEOUT_TICKS {
        match tokio::time::timeout(TICK, port.recv()).await {
            Ok(RecvOutcome::Message(value)) => {
                if let Some(outcome) = parse_consent_result(&value) {
                    return SecretZoneOutcome { observed_at_ms, ..outcome };
                }
                // not a consent.result message; keep waiting for the reply.
            }
            Ok(RecvOutcome::Rejected(reasons)) => {
                return SecretZoneOutcome { ok: false, consent: None, reason_codes: reasons, observed_at_ms };
            }
            Ok(RecvOutcome::Closed) => {
                return SecretZoneOutcome { ok: false, consent: None, reason_codes: vec![ReasonCode::new(codes::SECRET_ZONE_UNAVAILABLE)], observed_at_ms };
            }
            Err(_elapsed) => continue,
        }
    }

    SecretZoneOutcome { ok: false, consent: None, reason_codes: vec![ReasonCode::new(codes::SECRET_ZONE_TIMEOUT)], observed_at_ms }
}

fn parse_consent_result(value: &Value) -> Option<SecretZoneOutcome> {
    if value.get("kind")?.as_str()? != "consent.result" {
        return None;
    }
    let ok = value.get("ok")?.as_bool()?;
    if ok {
        let claim: ConsentClaim = serde_json::from_value(value.get("consent")?.clone()).ok()?;
        Some(SecretZoneOutcome { ok: true, consent: Some(claim), reason_codes: Vec::new(), observed_at_ms: 0 })
    } else {
        let reason_codes = value
            .get("reasonCodes")
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(Value::as_str).map(ReasonCode::new).collect())
            .unwrap_or_default();
        Some(SecretZoneOutcome { ok: false, consent: None, reason_codes, observed_at_ms: 0 })
    }
}
