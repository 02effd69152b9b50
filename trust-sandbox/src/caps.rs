//! The `caps` handle (spec.md §4.G): the only way a [`crate::Block`] can
//! reach the host. Each call serializes `{kind:"invoke", reqId, capId,
//! args, callerBlockHash}` over the bound channel and awaits a matching
//! `result`.

use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use trust_algebra::{codes, ReasonCode};
use trust_channel::{ChildPort, RecvOutcome};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CapId {
    NetFetch,
    StorageRead,
    StorageWrite,
}

impl CapId {
    pub fn as_str(self) -> &'static str {
        match self {
            CapId::NetFetch => "net.fetch",
            CapId::StorageRead => "storage.read",
            CapId::StorageWrite => "storage.write",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "net.fetch" => Some(CapId::NetFetch),
            "storage.read" => Some(CapId::StorageRead),
            "storage.write" => Some(CapId::StorageWrite),
            _ => None,
        }
    }
}

pub struct CapsCallOutcome {
    pub ok: bool,
    pub value: Option<Value>,
    pub reason_codes: Vec<ReasonCode>,
}

/// Frozen shape `{net.fetch, storage.read, storage.write}`: the block's
/// only channel back into the host.
pub struct Caps {
    port: ChildPort,
    caller_block_hash: String,
    next_req_id: AtomicU64,
}

impl Caps {
    pub fn new(port: ChildPort, caller_block_hash: impl Into<String>) -> Self {
        Self { port, caller_block_hash: caller_block_hash.into(), next_req_id: AtomicU64::new(1) }
    }

    pub async fn call(&self, cap_id: CapId, args: Value) -> CapsCallOutcome {
        let req_id = self.next_req_id.fetch_add(1, Ordering::SeqCst);
        let invoke = json!({
            "kind": "invoke",
            "reqId": req_id,
            "capId": cap_id.as_str(),
            "args": args,
            "callerBlockHash": self.caller_block_hash,
        });

        if self.port.post_message(invoke).await.is_err() {
            return CapsCallOutcome { ok: false, value: None, reason_codes: vec![ReasonCode::new(codes::UNTRUSTED_CHANNEL)] };
        }

        match self.port.recv().await {
            RecvOutcome::Message(value) => parse_result(&value, req_id),
            RecvOutcome::Rejected(reasons) => CapsCallOutcome { ok: false, value: None, reason_codes: reasons },
            RecvOutcome::Closed => CapsCallOutcome { ok: false, value: None, reason_codes: vec![ReasonCode::new(codes::UNTRUSTED_CHANNEL)] },
        }
    }
}

fn parse_result(value: &Value, expected_req_id: u64) -> CapsCallOutcome {
    let matches_req_id = value.get("reqId").and_then(Value::as_u64) == Some(expected_req_id);
    if !matches_req_id {
        return CapsCallOutcome { ok: false, value: None, reason_codes: vec![ReasonCode::new(codes::UNTRUSTED_CHANNEL)] };
    }
    let ok = value.get("ok").and_then(Value::as_bool).unwrap_or(false);
    if ok {
        CapsCallOutcome { ok: true, value: value.get("value").cloned(), reason_codes: Vec::new() }
    } else {
        let reason_codes = value
            .get("reasonCodes")
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(Value::as_str).map(ReasonCode::new).collect())
            .unwrap_or_default();
        CapsCallOutcome { ok: false, value: None, reason_codes }
    }
}
