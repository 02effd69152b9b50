//! Hardening self-test (spec.md §4.G step 4): probes the block's declared
//! capability requests against a forbidden-globals-style denylist before
//! first invocation.

use trust_algebra::{codes, ReasonCode};

/// The runtime has no `fetch`/`localStorage`-style ambient globals for a
/// native `Block` to reach — the sandbox's real guarantee is structural
/// (a `Block` only ever receives a [`crate::Caps`] handle). This list is
/// kept so a block's *declared* capability names are still checked against
/// the same denylist the original sandbox enforced at runtime, preserving
/// the observable reason-code contract.
const FORBIDDEN_GLOBALS: &[&str] =
    &["fetch", "XMLHttpRequest", "WebSocket", "EventSource", "importScripts", "localStorage", "sessionStorage", "indexedDB", "caches"];

/// Runs the hardening self-test against a block's declared capability
/// requests, returning one `SANDBOX_HARDENING_FAILED:<name>` reason per
/// forbidden name present, sorted.
pub fn self_test(declared_capabilities: &[String]) -> Vec<ReasonCode> {
    let mut present: Vec<&str> = FORBIDDEN_GLOBALS.iter().copied().filter(|name| declared_capabilities.iter().any(|d| d == name)).collect();
    present.sort_unstable();
    present.into_iter().map(|name| ReasonCode::new(codes::sandbox_hardening_failed(name))).collect()
}
