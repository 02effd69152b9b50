//! `handleInvoke` (spec.md §4.H): a deny-by-default adjudication over ten
//! checks. All checks run; reasons accumulate and are never short-circuited.

use crate::config::KernelConfig;
use crate::consent::ConsentClaim;
use crate::request::KernelRequest;
use crate::stamp::{ShopStamp, Tier};
use std::collections::HashSet;
use trust_algebra::{codes, ReasonCode};
use trust_channel::safe_equal;
use trust_release::CryptoPort;

#[derive(Clone, Debug)]
pub struct KernelDecision {
    pub ok: bool,
    pub reason_codes: Vec<ReasonCode>,
}

/// Everything `handleInvoke` needs beyond the request itself: the stamp and
/// consent claim a caller attaches, and the crypto port used to verify a
/// stamp's signature. All optional — their absence is itself meaningful
/// (`STAMP_MISSING`, `CONSENT_MISSING`).
pub struct InvokeContext<'a> {
    pub stamp: Option<&'a ShopStamp>,
    pub consent: Option<&'a ConsentClaim>,
    pub crypto_port: Option<&'a dyn CryptoPort>,
}

pub fn handle_invoke(config: &KernelConfig, req: &KernelRequest, ctx: &InvokeContext<'_>) -> KernelDecision {
    let mut reasons = Vec::new();

    if req.execution_mode != config.execution_mode {
        reasons.push(ReasonCode::new(codes::MODE_MISMATCH));
    }
    if req.plan_digest != config.plan_digest {
        reasons.push(ReasonCode::new(codes::PLANDIGEST_MISMATCH));
    }
    if !safe_equal(req.session_nonce.as_str(), config.session_nonce.as_str()) {
        reasons.push(ReasonCode::new(codes::NONCE_MISMATCH));
    }
    if req.caller_block_hash != config.caller_block_hash {
        reasons.push(ReasonCode::new(codes::CALLER_MISMATCH));
    }

    let cap_known = config.known_caps.contains(&req.cap_id);
    if !cap_known {
        reasons.push(ReasonCode::new(codes::CAP_UNKNOWN));
    }
    if config.disabled_caps.contains(&req.cap_id) {
        reasons.push(ReasonCode::new(codes::NET_DISABLED_IN_V0));
    }
    if !config.granted_caps.contains(&req.cap_id) {
        reasons.push(ReasonCode::new(codes::CAP_NOT_GRANTED));
    }

    let required_tier = config.cap_required_tier.get(&req.cap_id).copied().unwrap_or(Tier::T0);
    if config.runtime_tier < required_tier {
        reasons.push(ReasonCode::new(codes::TIER_VIOLATION));
    }

    if config.stamp_required_caps.contains(&req.cap_id) {
        reasons.extend(check_stamp(config, ctx));
    }

    if config.consent_required_caps.contains(&req.cap_id) {
        reasons.extend(check_consent(config, req, ctx.consent));
    }

    reasons.sort();
    reasons.dedup();
    let ok = reasons.is_empty();
    KernelDecision { ok, reason_codes: reasons }
}

fn check_stamp(config: &KernelConfig, ctx: &InvokeContext<'_>) -> Vec<ReasonCode> {
    let Some(stamp) = ctx.stamp else {
        return vec![ReasonCode::new(codes::STAMP_MISSING)];
    };

    let mut reasons = Vec::new();
    let fields_match = stamp.block_hash == config.caller_block_hash && stamp.policy_digest == config.policy_digest && stamp.digest_is_consistent();
    if !fields_match {
        reasons.push(ReasonCode::new(codes::STAMP_INVALID));
    }
    if stamp.tier != config.runtime_tier {
        reasons.push(ReasonCode::new(codes::TIER_VIOLATION));
    }

    let signature_valid = match ctx.crypto_port {
        Some(port) => stamp.signature_verifies(port, &config.stamp_key_allowlist),
        None => false,
    };
    if !signature_valid {
        reasons.push(ReasonCode::new(codes::STAMP_SIG_INVALID));
    }

    reasons
}

fn check_consent(config: &KernelConfig, req: &KernelRequest, consent: Option<&ConsentClaim>) -> Vec<ReasonCode> {
    let Some(claim) = consent else {
        return vec![ReasonCode::new(codes::CONSENT_MISSING)];
    };
    if claim.matches(&config.caller_block_hash, &config.plan_digest) && claim.subject.block_hash == req.caller_block_hash {
        Vec::new()
    } else {
        vec![ReasonCode::new(codes::CONSENT_INVALID)]
    }
}

/// The kernel's fixed view of known capabilities, as a sanity helper for
/// callers building a [`KernelConfig`].
pub fn known_cap_ids(config: &KernelConfig) -> &HashSet<String> {
    &config.known_caps
}
