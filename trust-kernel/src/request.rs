//! Kernel request (spec.md §3): `{reqId, capId, executionMode, planDigest,
//! sessionNonce, callerBlockHash, args?}`.

use serde_json::Value;
use trust_channel::{ExecutionMode, Nonce};

#[derive(Clone, Debug)]
pub struct KernelRequest {
    pub req_id: String,
    pub cap_id: String,
    pub execution_mode: ExecutionMode,
    pub plan_digest: String,
    pub session_nonce: Nonce,
    pub caller_block_hash: String,
    pub args: Option<Value>,
}
