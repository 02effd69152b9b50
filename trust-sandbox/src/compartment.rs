//! Compartment bootstrap (spec.md §4.G): init → self-test → run → terminate,
//! modeled on the teacher's `AsyncService` lifecycle
//! (`core/src/task/service.rs`, here `trust_core::lifecycle::Lifecycle`).

use crate::block::{Block, BlockError};
use crate::caps::Caps;
use crate::hardening;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use trust_algebra::{codes, ReasonCode};
use trust_channel::ChildPort;
use trust_core::lifecycle::Lifecycle;

pub struct InitRequest {
    pub caller_block_hash: String,
    /// Present for provenance only: native blocks are pre-compiled, not
    /// evaluated from source. An explicitly empty string models the
    /// `SANDBOX_EVAL_ERROR` path from spec.md §4.G step 5.
    pub source_text: Option<String>,
    pub entry_export_name: String,
    pub entry_args: Value,
}

pub enum CompartmentOutcome {
    Ran(Value),
    HardeningFailed(Vec<ReasonCode>),
    EvalError,
    EntryMissing,
    ExecutionError(Vec<ReasonCode>),
}

impl CompartmentOutcome {
    pub fn reason_codes(&self) -> Vec<ReasonCode> {
        match self {
            CompartmentOutcome::Ran(_) => Vec::new(),
            CompartmentOutcome::HardeningFailed(reasons) => reasons.clone(),
            CompartmentOutcome::EvalError => vec![ReasonCode::new(codes::SANDBOX_EVAL_ERROR)],
            CompartmentOutcome::EntryMissing => vec![ReasonCode::new(codes::SANDBOX_ENTRY_MISSING)],
            CompartmentOutcome::ExecutionError(reasons) => reasons.clone(),
        }
    }
}

/// A single compartment session bound to one block and one channel port.
pub struct CompartmentSession {
    block: Arc<dyn Block>,
    port: ChildPort,
    terminated: AtomicBool,
}

impl CompartmentSession {
    pub fn new(block: Arc<dyn Block>, port: ChildPort) -> Arc<Self> {
        Arc::new(Self { block, port, terminated: AtomicBool::new(false) })
    }

    /// Runs the compartment bootstrap for one `init` request.
    pub async fn run(&self, request: InitRequest) -> CompartmentOutcome {
        let hardening_reasons = hardening::self_test(self.block.declared_capabilities());
        if !hardening_reasons.is_empty() {
            return CompartmentOutcome::HardeningFailed(hardening_reasons);
        }

        if matches!(&request.source_text, Some(text) if text.is_empty()) {
            return CompartmentOutcome::EvalError;
        }

        if !self.block.exports().iter().any(|e| e == &request.entry_export_name) {
            return CompartmentOutcome::EntryMissing;
        }

        let caps = Arc::new(Caps::new(self.port.clone(), request.caller_block_hash.clone()));
        match self.block.run(&request.entry_export_name, request.entry_args, caps).await {
            Ok(value) => CompartmentOutcome::Ran(value),
            Err(BlockError::EvalError) => CompartmentOutcome::EvalError,
            Err(BlockError::EntryMissing) => CompartmentOutcome::EntryMissing,
            Err(BlockError::Reasons(reasons)) => CompartmentOutcome::ExecutionError(reasons),
        }
    }
}

#[async_trait]
impl Lifecycle for CompartmentSession {
    fn ident(self: &Arc<Self>) -> &'static str {
        "trust-sandbox-compartment"
    }

    async fn start(self: &Arc<Self>) {
        trust_core::log::trace!("compartment session starting");
    }

    fn signal_terminate(self: &Arc<Self>) {
        self.terminated.store(true, Ordering::SeqCst);
    }

    async fn stop(self: &Arc<Self>) {
        self.port.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct EchoBlock {
        declared: Vec<String>,
        exports: Vec<String>,
    }

    #[async_trait]
    impl Block for EchoBlock {
        fn declared_capabilities(&self) -> &[String] {
            &self.declared
        }

        fn exports(&self) -> &[String] {
            &self.exports
        }

        async fn run(&self, _entry: &str, args: Value, _caps: Arc<Caps>) -> Result<Value, BlockError> {
            Ok(args)
        }
    }

    fn port_pair() -> (trust_channel::HostPort, ChildPort) {
        use trust_channel::{create_bound_channel, BoundContext, ExecutionMode, Nonce};
        create_bound_channel(BoundContext { execution_mode: ExecutionMode::Strict, plan_digest: "plan-1".to_string(), session_nonce: Nonce::generate() })
    }

    #[tokio::test]
    async fn runs_entry_and_returns_value() {
        let (_host, child) = port_pair();
        let block = Arc::new(EchoBlock { declared: vec!["storage.read".to_string()], exports: vec!["main".to_string()] });
        let session = CompartmentSession::new(block, child);
        let request = InitRequest { caller_block_hash: "block-a".to_string(), source_text: None, entry_export_name: "main".to_string(), entry_args: json!({"x": 1}) };
        match session.run(request).await {
            CompartmentOutcome::Ran(value) => assert_eq!(value, json!({"x": 1})),
            _ => panic!("expected Ran"),
        }
    }

    #[tokio::test]
    async fn hardening_blocks_forbidden_capability_declaration() {
        let (_host, child) = port_pair();
        let block = Arc::new(EchoBlock { declared: vec!["fetch".to_string()], exports: vec!["main".to_string()] });
        let session = CompartmentSession::new(block, child);
        let request = InitRequest { caller_block_hash: "block-a".to_string(), source_text: None, entry_export_name: "main".to_string(), entry_args: json!({}) };
        match session.run(request).await {
            CompartmentOutcome::HardeningFailed(reasons) => {
                assert_eq!(reasons, vec![ReasonCode::new(codes::sandbox_hardening_failed("fetch"))]);
            }
            _ => panic!("expected HardeningFailed"),
        }
    }

    #[tokio::test]
    async fn missing_entry_export_is_reported() {
        let (_host, child) = port_pair();
        let block = Arc::new(EchoBlock { declared: vec![], exports: vec!["other".to_string()] });
        let session = CompartmentSession::new(block, child);
        let request = InitRequest { caller_block_hash: "block-a".to_string(), source_text: None, entry_export_name: "main".to_string(), entry_args: json!({}) };
        assert!(matches!(session.run(request).await, CompartmentOutcome::EntryMissing));
    }

    #[tokio::test]
    async fn empty_source_text_is_an_eval_error() {
        let (_host, child) = port_pair();
        let block = Arc::new(EchoBlock { declared: vec![], exports: vec!["main".to_string()] });
        let session = CompartmentSession::new(block, child);
        let request = InitRequest { caller_block_hash: "block-a".to_string(), source_text: Some(String::new()), entry_export_name: "main".to_string(), entry_args: json!({}) };
        assert!(matches!(session.run(request).await, CompartmentOutcome::EvalError));
    }
}
