//! The `Block` trait (spec.md §4.G): a `Compartment` realized as a trait
//! object reachable by the host only through its declared entry point and
//! a [`crate::Caps`] handle — the Rust analogue of "endowments limited to
//! a frozen `caps` object".

use crate::caps::Caps;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use trust_algebra::ReasonCode;

#[derive(Debug)]
pub enum BlockError {
    /// `sourceText` failed to evaluate (spec.md §4.G step 5). Native
    /// blocks are pre-compiled, so this only fires for blocks that embed
    /// and reject their own source payload (e.g. a malformed manifest).
    EvalError,
    /// The named export does not exist.
    EntryMissing,
    /// The block ran and reported its own failure reasons.
    Reasons(Vec<ReasonCode>),
}

/// A single untrusted unit of code. The only host surface it can reach is
/// the `caps` argument passed to `run`.
#[async_trait]
pub trait Block: Send + Sync {
    /// Capability names this block declares it may call, checked by the
    /// hardening self-test before `run` is ever invoked.
    fn declared_capabilities(&self) -> &[String];

    /// The block's exported entry points.
    fn exports(&self) -> &[String];

    async fn run(&self, entry_export_name: &str, entry_args: Value, caps: Arc<Caps>) -> Result<Value, BlockError>;
}
