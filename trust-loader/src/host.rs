//! The loader's host-side responder: the other end of the bound channel the
//! compartment's `caps` handle talks to. Every `invoke` is adjudicated by
//! `trust_kernel::handle_invoke`; this module owns no capability semantics
//! of its own (no network/storage I/O — spec.md §1 non-goals), it only
//! mediates.

use serde_json::{json, Value};
use trust_algebra::ReasonCode;
use trust_channel::{HostPort, RecvOutcome};
use trust_kernel::{handle_invoke, ConsentClaim, InvokeContext, KernelConfig, KernelRequest, ShopStamp};
use trust_release::CryptoPort;

pub struct HostSession<'a> {
    pub config: &'a KernelConfig,
    pub stamp: Option<&'a ShopStamp>,
    pub consent: Option<&'a ConsentClaim>,
    pub crypto_port: Option<&'a dyn CryptoPort>,
}

/// Services `invoke` messages until the compartment closes its side of the
/// channel, returning the union of every decision's reason codes observed
/// over the session's lifetime.
pub async fn run_host_loop(host: HostPort, session: HostSession<'_>) -> Vec<ReasonCode> {
    let mut reasons = Vec::new();

    loop {
        match host.recv().await {
            RecvOutcome::Message(value) => {
                if value.get("kind").and_then(Value::as_str) != Some("invoke") {
                    continue;
                }
                let Some(req) = parse_request(&value, session.config) else { continue };
                let ctx = InvokeContext { stamp: session.stamp, consent: session.consent, crypto_port: session.crypto_port };
                let decision = handle_invoke(session.config, &req, &ctx);
                reasons.extend(decision.reason_codes.clone());

                let reply = if decision.ok {
                    json!({"kind": "result", "reqId": value.get("reqId").cloned().unwrap_or(Value::Null), "ok": true, "value": Value::Null})
                } else {
                    json!({
                        "kind": "result",
                        "reqId": value.get("reqId").cloned().unwrap_or(Value::Null),
                        "ok": false,
                        "reasonCodes": decision.reason_codes.iter().map(ReasonCode::as_str).collect::<Vec<_>>(),
                    })
                };
                let _ = host.post_message(reply).await;
            }
            RecvOutcome::Rejected(rejected) => reasons.extend(rejected),
            RecvOutcome::Closed => break,
        }
    }

    reasons.sort();
    reasons.dedup();
    reasons
}

fn parse_request(value: &Value, config: &KernelConfig) -> Option<KernelRequest> {
    Some(KernelRequest {
        req_id: value.get("reqId")?.to_string(),
        cap_id: value.get("capId")?.as_str()?.to_string(),
        execution_mode: config.execution_mode,
        plan_digest: config.plan_digest.clone(),
        session_nonce: config.session_nonce.clone(),
        caller_block_hash: value.get("callerBlockHash")?.as_str()?.to_string(),
        args: value.get("args").cloned(),
    })
}
