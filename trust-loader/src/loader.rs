//! Strict loader orchestration (spec.md §4.J): verify → read artifact →
//! derive verify verdict → execute inside a compartment → merge → summarize.

use crate::host::{run_host_loop, HostSession};
use crate::plan::PlanSnapshot;
use crate::result::{ExecuteResult, LoaderExecute, LoaderResult, LoaderVerify};
use crate::severity::{classify, IncidentSummary};
use serde_json::Value;
use std::collections::HashSet;
use std::sync::Arc;
use trust_algebra::{codes, derive_verdict, join, normalize, NormalizeOptions, ReasonBudget, ReasonCode, Verdict};
use trust_canon::Digest;
use trust_channel::{create_bound_channel, BoundContext, Nonce};
use trust_core::lifecycle::Lifecycle;
use trust_kernel::{ConsentClaim, KernelConfig, ShopStamp};
use trust_release::{CryptoPort, ReleaseManifest, VerifyReleaseInput};
use trust_sandbox::{Block, CompartmentOutcome, CompartmentSession, InitRequest};
use trust_store::{ArtifactStore, Incident, IncidentContext};

/// One execution attempt: a block bound to a fresh nonce, with the kernel
/// config that will mediate every `caps.*` call it makes.
pub struct ExecuteInput<'a> {
    pub block: Arc<dyn Block>,
    pub caller_block_hash: String,
    pub entry_export_name: String,
    pub entry_args: Value,
    pub kernel_config: &'a KernelConfig,
    pub stamp: Option<&'a ShopStamp>,
    pub consent: Option<&'a ConsentClaim>,
    pub kernel_crypto_port: Option<&'a dyn CryptoPort>,
    /// Models spec.md §4.G step 3's "no Compartment primitive available" ->
    /// `STRICT_COMPARTMENT_UNAVAILABLE`, execute=SKIP. Always `true` outside
    /// tests: a native `Block` never lacks the primitive it's built from.
    pub compartment_available: bool,
}

pub struct LoaderInput<'a> {
    pub plan_snapshot: &'a PlanSnapshot,
    pub manifest: Option<&'a ReleaseManifest>,
    pub expected_blocks: &'a [String],
    pub release_crypto_port: Option<&'a dyn CryptoPort>,
    pub release_key_allowlist: &'a HashSet<String>,
    pub artifact_store: Option<&'a ArtifactStore>,
    pub expected_source_digest: Option<&'a Digest>,
    pub execute: Option<ExecuteInput<'a>>,
}

pub async fn run_strict_load(input: LoaderInput<'_>) -> LoaderResult {
    // Step 1.
    let plan_digest = input.plan_snapshot.plan_digest();
    let expected_path_digest = input.plan_snapshot.expected_path_digest();
    let policy_digest = input.plan_snapshot.policy_digest.clone();
    let evidence_digests = input.plan_snapshot.evidence_digests.clone();

    // Step 2.
    let release_result = trust_release::verify_release(&VerifyReleaseInput {
        manifest: input.manifest,
        expected_plan_digest: &plan_digest.to_string(),
        expected_blocks: input.expected_blocks,
        expected_path_digest: Some(&expected_path_digest.to_string()),
        crypto_port: input.release_crypto_port,
        key_allowlist: input.release_key_allowlist,
    });

    // Step 3.
    let mut artifact_reasons: Vec<ReasonCode> = Vec::new();
    let mut observed_artifact_digest: Option<Digest> = None;
    let mut incidents: Vec<(Incident, crate::severity::Severity)> = Vec::new();
    let mut rollback: Option<Value> = None;

    if let (Some(store), Some(expected_digest)) = (input.artifact_store, input.expected_source_digest) {
        let ctx = IncidentContext { plan_digest: Some(plan_digest), block_hash: None };
        let read_outcome = store.read(expected_digest, &ctx);
        artifact_reasons = read_outcome.reasons().to_vec();
        if let Some(bytes) = read_outcome.value() {
            observed_artifact_digest = Some(Digest::of_bytes(bytes));
        }
        if let Some(incident) = read_outcome.incident() {
            let recovered = read_outcome.recovered();
            if recovered {
                rollback = Some(serde_json::json!({"fromLastGood": true, "incidentSeq": incident.seq}));
            }
            // severity is finalized below once the quarantine verdict is known.
            incidents.push((incident.clone(), if recovered { crate::severity::Severity::Warn } else { crate::severity::Severity::Deny }));
        }
    }

    // Step 4.
    let verify_reasons = join(&release_result.reason_codes, &artifact_reasons);
    let verify_quarantined = verify_reasons.iter().any(|r| r.code() == codes::ARTIFACT_DIGEST_MISMATCH) && !verify_reasons.iter().any(|r| r.code() == codes::ARTIFACT_RECOVERED);
    let verify_verdict = if verify_quarantined {
        Verdict::Quarantine
    } else if verify_reasons.is_empty() {
        Verdict::Allow
    } else {
        Verdict::Deny
    };

    // Reclassify any unrecovered artifact incident now that quarantine is known.
    for (incident, severity) in incidents.iter_mut() {
        *severity = classify(incident, verify_quarantined);
    }

    // Step 5.
    let mut attempted = false;
    let mut execute_result = ExecuteResult::Skip;
    let mut execute_reasons: Vec<ReasonCode> = Vec::new();

    if let Some(exec) = input.execute {
        attempted = true;
        if !exec.compartment_available {
            execute_reasons.push(ReasonCode::new(codes::STRICT_COMPARTMENT_UNAVAILABLE));
            execute_result = ExecuteResult::Skip;
        } else {
            let nonce = Nonce::generate();
            let context = BoundContext { execution_mode: exec.kernel_config.execution_mode, plan_digest: plan_digest.to_string(), session_nonce: nonce };
            let (host, child) = create_bound_channel(context);

            let session = CompartmentSession::new(exec.block, child);
            let init = InitRequest {
                caller_block_hash: exec.caller_block_hash.clone(),
                source_text: None,
                entry_export_name: exec.entry_export_name,
                entry_args: exec.entry_args,
            };

            let host_session = HostSession { config: exec.kernel_config, stamp: exec.stamp, consent: exec.consent, crypto_port: exec.kernel_crypto_port };

            // Both futures are polled cooperatively on the current task (no
            // `tokio::spawn`, so no `'static`/`Send` requirement on the
            // borrowed kernel config/stamp/consent). The host loop only
            // returns once the compartment's run finishes and closes its
            // side of the channel -- done from inside the same future so
            // `join!` never waits on a port nobody closes.
            let (outcome, host_reasons) = tokio::join!(
                async {
                    let outcome = session.run(init).await;
                    session.stop().await;
                    outcome
                },
                run_host_loop(host, host_session)
            );

            let outcome_reasons = outcome.reason_codes();
            execute_reasons = join(&outcome_reasons, &host_reasons);
            execute_result = match (&outcome, execute_reasons.is_empty()) {
                (CompartmentOutcome::Ran(_), true) => ExecuteResult::Allow,
                _ => ExecuteResult::Deny,
            };
        }
    }

    // Step 6.
    let quarantined = verify_verdict == Verdict::Quarantine;
    let verify_allow = verify_verdict == Verdict::Allow;
    let execute_allow = execute_result == ExecuteResult::Allow;
    let verdict = derive_verdict(quarantined, verify_allow, execute_allow);

    let budget = ReasonBudget::default();
    let opts = NormalizeOptions::new("loader", "strict-load");
    let reason_codes = normalize(&join(&execute_reasons, &artifact_reasons), &opts, &budget);

    // Step 7.
    let incident_summary = IncidentSummary::from_incidents(&incidents);
    let incident_latest = incidents.last().map(|(incident, _)| incident.clone());

    LoaderResult {
        verify: LoaderVerify {
            verdict: verify_verdict,
            reason_codes: verify_reasons,
            release_status: release_result.status,
            release_reason_codes: release_result.reason_codes,
            release_id: release_result.release_id.clone(),
        },
        execute: LoaderExecute { attempted, result: execute_result, reason_codes: execute_reasons },
        verdict,
        execution_ok: execute_allow,
        reason_codes,
        plan_digest,
        policy_digest,
        evidence_digests,
        expected_artifact_digest: input.expected_source_digest.copied(),
        observed_artifact_digest,
        release_id: release_result.release_id,
        rollback,
        incident_summary,
        incident_latest,
    }
}
