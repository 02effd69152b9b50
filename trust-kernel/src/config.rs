//! `KernelConfig` (spec.md §9 open question, resolved in DESIGN.md):
//! injected, immutable construction parameters — never read from `std::env`
//! or a config file.

use crate::stamp::Tier;
use std::collections::{HashMap, HashSet};
use trust_channel::{ExecutionMode, Nonce};

/// The kernel's fixed view of the current session, against which every
/// request is checked (spec.md §4.H).
#[derive(Clone, Debug)]
pub struct KernelConfig {
    pub execution_mode: ExecutionMode,
    pub plan_digest: String,
    pub session_nonce: Nonce,
    pub caller_block_hash: String,
    pub policy_digest: String,
    pub runtime_tier: Tier,

    pub known_caps: HashSet<String>,
    pub disabled_caps: HashSet<String>,
    pub granted_caps: HashSet<String>,
    /// Minimum tier each capability requires, absent entries default to
    /// `Tier::T0` (no restriction beyond `runtime_tier` itself existing).
    pub cap_required_tier: HashMap<String, Tier>,
    /// Caps that require a valid shop stamp regardless of tier.
    pub stamp_required_caps: HashSet<String>,
    pub consent_required_caps: HashSet<String>,

    pub stamp_key_allowlist: HashSet<String>,
}

impl KernelConfig {
    /// A minimal, fully-populated config for tests and examples: one
    /// known/granted capability (`storage.read`), `net.fetch` disabled,
    /// tier T1, no stamp or consent requirements.
    pub fn demo(execution_mode: ExecutionMode, plan_digest: impl Into<String>, session_nonce: Nonce, caller_block_hash: impl Into<String>) -> Self {
        Self {
            execution_mode,
            plan_digest: plan_digest.into(),
            session_nonce,
            caller_block_hash: caller_block_hash.into(),
            policy_digest: "policy-demo".to_string(),
            runtime_tier: Tier::T1,
            known_caps: ["storage.read".to_string(), "storage.write".to_string(), "net.fetch".to_string()].into_iter().collect(),
            disabled_caps: ["net.fetch".to_string()].into_iter().collect(),
            granted_caps: ["storage.read".to_string(), "storage.write".to_string()].into_iter().collect(),
            cap_required_tier: HashMap::new(),
            stamp_required_caps: HashSet::new(),
            consent_required_caps: HashSet::new(),
            stamp_key_allowlist: HashSet::new(),
        }
    }
}
