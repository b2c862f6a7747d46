//! Verify Ensemble use case
//!
//! Runs one operation on a panel of models and decides whether the result
//! may be accepted.
//!
//! ```text
//! Idle ─▶ PanelAssembled ─▶ Executing ─▶ SafetyEvaluated ─┬─▶ Rejected (critical violation)
//!  │       (selector xN)     (fan-out,                     │
//!  │                          barrier)                     └─▶ consensus ─▶ Accepted | Rejected
//!  └─▶ Rejected (no models)
//! ```
//!
//! Every member runs concurrently in its own task. Errors, panics and
//! timeouts are converted into failed [`PanelMemberResult`]s at the call
//! site, so one member can never abort the others.

use crate::config::VerificationParams;
use crate::ports::audit_sink::{AuditEvent, AuditEventKind, AuditSink, NoAuditSink};
use crate::ports::metrics_source::MetricsSource;
use crate::ports::model_registry::ModelRegistry;
use crate::ports::progress::{NoProgress, VerificationProgress};
use crate::ports::task_executor::TaskExecutor;
use crate::use_cases::select_model::{ModelSelector, SelectionError};
use ensemble_domain::selection::canary::ANONYMOUS_USER;
use ensemble_domain::verification::artifact::extract_artifacts;
use ensemble_domain::verification::safety::{destructive_markers, first_critical_violation};
use ensemble_domain::{
    ModelDescriptor, OperationKind, PanelMemberResult, RejectionReason, SafetyCheckResult,
    SafetyCheckSuite, SelectionContext, SelectionOutcome, SimilarityStrategy, VerificationContext,
    VerificationMetadata, VerificationOutcome, VerificationPhase, compute_consensus,
};
use futures::FutureExt;
use serde_json::{Value, json};
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// Errors that can occur during verification
///
/// Rejections are not errors; they are returned as a
/// [`VerificationOutcome`] with `success = false`. Only infrastructure
/// failures surface here.
#[derive(Error, Debug)]
pub enum VerifyError {
    #[error("Panel selection failed: {0}")]
    Selection(#[from] SelectionError),
}

/// Use case for verifying an operation with a panel of models
pub struct EnsembleVerifier<R, M, E>
where
    R: ModelRegistry + 'static,
    M: MetricsSource + 'static,
    E: TaskExecutor + 'static,
{
    selector: ModelSelector<R, M>,
    executor: Arc<E>,
    audit: Arc<dyn AuditSink>,
    safety: SafetyCheckSuite,
    similarity: Arc<dyn SimilarityStrategy>,
    params: VerificationParams,
}

impl<R, M, E> EnsembleVerifier<R, M, E>
where
    R: ModelRegistry + 'static,
    M: MetricsSource + 'static,
    E: TaskExecutor + 'static,
{
    pub fn new(selector: ModelSelector<R, M>, executor: Arc<E>, params: VerificationParams) -> Self {
        Self {
            selector,
            executor,
            audit: Arc::new(NoAuditSink),
            safety: SafetyCheckSuite::standard(),
            similarity: params.similarity.strategy(),
            params,
        }
    }

    pub fn with_audit_sink(mut self, audit: Arc<dyn AuditSink>) -> Self {
        self.audit = audit;
        self
    }

    pub fn with_safety_checks(mut self, safety: SafetyCheckSuite) -> Self {
        self.safety = safety;
        self
    }

    /// Replace the pairwise comparator chosen by the params
    pub fn with_similarity(mut self, similarity: Arc<dyn SimilarityStrategy>) -> Self {
        self.similarity = similarity;
        self
    }

    pub fn selector(&self) -> &ModelSelector<R, M> {
        &self.selector
    }

    pub fn params(&self) -> &VerificationParams {
        &self.params
    }

    /// Verify with default (no-op) progress
    pub async fn verify(
        &self,
        context: &VerificationContext,
    ) -> Result<VerificationOutcome, VerifyError> {
        self.verify_with_progress(context, &NoProgress).await
    }

    /// Verify with progress callbacks
    pub async fn verify_with_progress(
        &self,
        context: &VerificationContext,
        progress: &dyn VerificationProgress,
    ) -> Result<VerificationOutcome, VerifyError> {
        let quorum_size = context.effective_quorum_size(self.params.quorum_size);
        let gate = self.params.gate(quorum_size);
        let requires_quorum = context.requires_quorum();

        let mut metadata = VerificationMetadata {
            quorum_required: requires_quorum,
            quorum_size,
            agreement_threshold: gate.agreement_threshold,
            ..Default::default()
        };

        // Phase 1: Panel assembly
        let panel = self
            .assemble_panel(context, self.params.panel_target(quorum_size))
            .await?;
        if panel.is_empty() {
            let outcome = VerificationOutcome::rejected(
                context.operation,
                RejectionReason::NoModelsAvailable,
                Vec::new(),
                Vec::new(),
                metadata,
            );
            return Ok(self.finish(outcome, progress, 0));
        }

        metadata.models_used = panel.iter().map(|m| m.id.clone()).collect();
        info!(
            "Verifying {} with panel [{}] (quorum {}, required: {})",
            context.operation,
            metadata.models_used.join(", "),
            quorum_size,
            requires_quorum
        );
        progress.on_phase(VerificationPhase::PanelAssembled, panel.len());

        // Phase 2: Fan-out with barrier
        progress.on_phase(VerificationPhase::Executing, panel.len());
        let results = self.execute_panel(&panel, context, progress).await;

        // Phase 3: Safety checks over successful outputs
        let artifacts: Vec<_> = results
            .iter()
            .filter_map(|r| r.output().map(|out| extract_artifacts(&r.model_id, out)))
            .flatten()
            .collect();
        let safety_checks = self.safety.evaluate(&artifacts);
        metadata.destructive_markers = destructive_markers(&artifacts);
        metadata.successful_members = results.iter().filter(|r| r.success).count();
        progress.on_phase(VerificationPhase::SafetyEvaluated, panel.len());

        if let Some(violation) = first_critical_violation(&safety_checks) {
            let reason = RejectionReason::CriticalSafetyViolation {
                check: violation.name.clone(),
                message: violation.message.clone(),
            };
            metadata.safety_violation = true;
            let outcome = VerificationOutcome::rejected(
                context.operation,
                reason,
                results,
                safety_checks,
                metadata,
            );
            return Ok(self.finish(outcome, progress, panel.len()));
        }

        // Phase 4: Consensus and gating
        let report = compute_consensus(&results, self.similarity.as_ref());
        metadata.agreement_score = report.agreement_score;
        debug!(
            "Consensus: {}/{} pairs agree (score {:.2}, {})",
            report.agreeing_pairs(),
            report.pairs.len(),
            report.agreement_score,
            self.similarity.name()
        );

        let decision = if report.successful == 0 {
            Err(RejectionReason::AllModelsFailed)
        } else if requires_quorum {
            gate.check(&report)
        } else {
            Ok(())
        };

        let outcome = match decision {
            Ok(()) => VerificationOutcome::accepted(
                context.operation,
                gate.is_agreement(report.agreement_score),
                results,
                safety_checks,
                report.result,
                metadata,
            ),
            Err(reason) => VerificationOutcome {
                consensus: gate.is_agreement(report.agreement_score),
                ..VerificationOutcome::rejected(
                    context.operation,
                    reason,
                    results,
                    safety_checks,
                    metadata,
                )
            },
        };
        Ok(self.finish(outcome, progress, panel.len()))
    }

    /// Collect up to `target` distinct models for the operation's role
    ///
    /// The first slot is selected as critical with the caller's identity.
    /// Later slots use a synthetic per-slot user so canary bucketing varies,
    /// and exclude the models already on the panel.
    async fn assemble_panel(
        &self,
        context: &VerificationContext,
        target: usize,
    ) -> Result<Vec<ModelDescriptor>, SelectionError> {
        let role = context.operation.role();
        let user = context.user_id.as_deref().unwrap_or(ANONYMOUS_USER);

        let mut base = SelectionContext::new(role)
            .with_capabilities(context.required_capabilities.iter().cloned());
        if let Some(project) = &context.project_id {
            base = base.with_project(project.clone());
        }

        let mut panel: Vec<ModelDescriptor> = Vec::new();
        for slot in 0..target {
            let mut selection = if slot == 0 {
                base.clone().critical().with_user(user)
            } else {
                base.clone()
                    .with_user(format!("{user}::verification-slot-{slot}"))
            };
            for model in &panel {
                selection = selection.excluding(model.id.clone());
            }

            match self.selector.select(&selection).await? {
                SelectionOutcome::Selected(result) => {
                    debug!(
                        "Panel slot {} -> {} ({})",
                        slot, result.model.id, result.reason
                    );
                    panel.push(result.model);
                }
                SelectionOutcome::NotFound { reason } => {
                    debug!("Panel candidates exhausted at slot {}: {}", slot, reason);
                    break;
                }
            }
        }

        if panel.len() < target {
            warn!(
                "Assembled {} of {} panel members for {}",
                panel.len(),
                target,
                context.operation
            );
        }
        Ok(panel)
    }

    /// Run every member concurrently and wait for all of them
    ///
    /// Results come back in panel order regardless of completion order.
    async fn execute_panel(
        &self,
        panel: &[ModelDescriptor],
        context: &VerificationContext,
        progress: &dyn VerificationProgress,
    ) -> Vec<PanelMemberResult> {
        let mut join_set = JoinSet::new();

        for (index, model) in panel.iter().enumerate() {
            let executor = Arc::clone(&self.executor);
            let model = model.clone();
            let operation = context.operation;
            let inputs = context.inputs.clone();
            let timeout = self.params.member_timeout;

            join_set.spawn(async move {
                let result = Self::run_member(&executor, &model, operation, &inputs, timeout).await;
                (index, result)
            });
        }

        let mut slots: Vec<Option<PanelMemberResult>> = vec![None; panel.len()];

        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((index, result)) => {
                    if result.success {
                        info!(
                            "Model {} completed in {}ms",
                            result.model_id, result.execution_time_ms
                        );
                    } else {
                        warn!(
                            "Model {} failed: {}",
                            result.model_id,
                            result.error.as_deref().unwrap_or("unknown error")
                        );
                    }
                    progress.on_member_complete(&result.model_id, result.success);
                    slots[index] = Some(result);
                }
                Err(e) => {
                    warn!("Panel task join error: {}", e);
                }
            }
        }

        slots
            .into_iter()
            .zip(panel)
            .map(|(slot, model)| {
                slot.unwrap_or_else(|| {
                    PanelMemberResult::failure(&model.id, &model.name, "execution task aborted", 0)
                })
            })
            .collect()
    }

    /// Execute on a single member, converting every failure into a result
    async fn run_member(
        executor: &E,
        model: &ModelDescriptor,
        operation: OperationKind,
        inputs: &Value,
        timeout: Option<Duration>,
    ) -> PanelMemberResult {
        let started = Instant::now();
        let call = AssertUnwindSafe(executor.run(model, operation, inputs)).catch_unwind();

        let settled = match timeout {
            Some(limit) => match tokio::time::timeout(limit, call).await {
                Ok(settled) => settled,
                Err(_) => {
                    return PanelMemberResult::failure(
                        &model.id,
                        &model.name,
                        format!("execution timed out after {}", timeout_label(limit)),
                        elapsed_ms(started),
                    );
                }
            },
            None => call.await,
        };

        let elapsed = elapsed_ms(started);
        match settled {
            Ok(Ok(payload)) => PanelMemberResult::success(&model.id, &model.name, payload, elapsed),
            Ok(Err(e)) => PanelMemberResult::failure(&model.id, &model.name, e.to_string(), elapsed),
            Err(panic) => PanelMemberResult::failure(
                &model.id,
                &model.name,
                format!("executor panicked: {}", panic_message(panic.as_ref())),
                elapsed,
            ),
        }
    }

    /// Terminal step: log, audit and report the final phase
    fn finish(
        &self,
        outcome: VerificationOutcome,
        progress: &dyn VerificationProgress,
        panel_size: usize,
    ) -> VerificationOutcome {
        let kind = if outcome.success {
            info!(
                "Verification of {} accepted (agreement {:.2}, consensus: {})",
                outcome.operation, outcome.metadata.agreement_score, outcome.consensus
            );
            progress.on_phase(VerificationPhase::Accepted, panel_size);
            AuditEventKind::VerificationSuccess
        } else {
            warn!(
                "Verification of {} rejected: {}",
                outcome.operation,
                outcome.reason_message().unwrap_or_default()
            );
            progress.on_phase(VerificationPhase::Rejected, panel_size);
            AuditEventKind::VerificationFailure
        };

        let event = AuditEvent::new(kind, audit_payload(&outcome));
        if let Err(e) = self.audit.record(&event) {
            warn!("Failed to record {} audit event: {}", kind, e);
        }
        outcome
    }
}

/// Audit payload shared by success and failure events
fn audit_payload(outcome: &VerificationOutcome) -> Value {
    let members: Vec<Value> = outcome
        .results
        .iter()
        .map(|r| {
            json!({
                "model": r.model_id,
                "success": r.success,
                "error": r.error,
                "execution_time_ms": r.execution_time_ms,
            })
        })
        .collect();
    let checks: Vec<Value> = outcome.safety_checks.iter().map(check_summary).collect();

    let mut payload = json!({
        "operation": outcome.operation.as_str(),
        "models": outcome.metadata.models_used,
        "member_results": members,
        "safety_checks": checks,
        "agreement_score": outcome.metadata.agreement_score,
        "destructive_markers": outcome.metadata.destructive_markers,
    });
    if let Some(reason) = outcome.reason_message() {
        payload["reason"] = Value::String(reason);
    }
    payload
}

fn check_summary(check: &SafetyCheckResult) -> Value {
    json!({
        "name": check.name,
        "passed": check.passed,
        "severity": check.severity.as_str(),
        "message": check.message,
    })
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}

/// Whole seconds as `5s`, anything finer as `250ms`
fn timeout_label(limit: Duration) -> String {
    if limit.subsec_nanos() == 0 && limit.as_secs() > 0 {
        format!("{}s", limit.as_secs())
    } else {
        format!("{}ms", limit.as_millis())
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::audit_sink::AuditError;
    use crate::ports::metrics_source::NoMetrics;
    use crate::ports::model_registry::RegistryError;
    use crate::ports::task_executor::ExecutionError;
    use async_trait::async_trait;
    use ensemble_domain::{CanaryConfig, ModelRole, Severity};
    use std::collections::HashMap;
    use std::sync::Mutex;

    // ==================== Test Mocks ====================

    struct MockRegistry {
        models: Vec<ModelDescriptor>,
    }

    #[async_trait]
    impl ModelRegistry for MockRegistry {
        async fn list_by_role(
            &self,
            role: ModelRole,
        ) -> Result<Vec<ModelDescriptor>, RegistryError> {
            Ok(self.models.iter().filter(|m| m.role == role).cloned().collect())
        }
    }

    struct UnreachableRegistry;

    #[async_trait]
    impl ModelRegistry for UnreachableRegistry {
        async fn list_by_role(
            &self,
            _role: ModelRole,
        ) -> Result<Vec<ModelDescriptor>, RegistryError> {
            Err(RegistryError::Unavailable("connection refused".to_string()))
        }
    }

    #[derive(Clone)]
    enum Script {
        Respond(Value),
        Fail(String),
        Panic,
        Delay(Duration, Value),
    }

    /// Executor that replays a scripted behavior per model id
    #[derive(Default)]
    struct ScriptedExecutor {
        scripts: HashMap<String, Script>,
    }

    impl ScriptedExecutor {
        fn with(mut self, model_id: &str, script: Script) -> Self {
            self.scripts.insert(model_id.to_string(), script);
            self
        }
    }

    #[async_trait]
    impl TaskExecutor for ScriptedExecutor {
        async fn run(
            &self,
            model: &ModelDescriptor,
            _operation: OperationKind,
            _inputs: &Value,
        ) -> Result<Value, ExecutionError> {
            match self.scripts.get(&model.id).cloned() {
                Some(Script::Respond(value)) => Ok(value),
                Some(Script::Fail(message)) => Err(ExecutionError::RequestFailed(message)),
                Some(Script::Panic) => panic!("backend exploded"),
                Some(Script::Delay(delay, value)) => {
                    tokio::time::sleep(delay).await;
                    Ok(value)
                }
                None => Err(ExecutionError::ModelNotAvailable(model.id.clone())),
            }
        }
    }

    #[derive(Default)]
    struct RecordingAudit {
        events: Mutex<Vec<(AuditEventKind, Value)>>,
    }

    impl AuditSink for RecordingAudit {
        fn record(&self, event: &AuditEvent) -> Result<(), AuditError> {
            self.events
                .lock()
                .unwrap()
                .push((event.kind, event.payload.clone()));
            Ok(())
        }
    }

    struct BrokenAudit;

    impl AuditSink for BrokenAudit {
        fn record(&self, _event: &AuditEvent) -> Result<(), AuditError> {
            Err(AuditError::WriteFailed("disk full".to_string()))
        }
    }

    #[derive(Default)]
    struct RecordingProgress {
        phases: Mutex<Vec<VerificationPhase>>,
        members: Mutex<Vec<(String, bool)>>,
    }

    impl VerificationProgress for RecordingProgress {
        fn on_phase(&self, phase: VerificationPhase, _panel_size: usize) {
            self.phases.lock().unwrap().push(phase);
        }

        fn on_member_complete(&self, model_id: &str, success: bool) {
            self.members
                .lock()
                .unwrap()
                .push((model_id.to_string(), success));
        }
    }

    /// Returns a fixed similarity for every pair
    struct FixedSimilarity(f64);

    impl SimilarityStrategy for FixedSimilarity {
        fn name(&self) -> &'static str {
            "fixed"
        }

        fn similarity(&self, _left: &Value, _right: &Value) -> f64 {
            self.0
        }
    }

    // ==================== Helpers ====================

    fn model(id: &str, role: ModelRole) -> ModelDescriptor {
        ModelDescriptor::new(id, id.to_uppercase(), role)
    }

    fn planners(ids: &[&str]) -> Vec<ModelDescriptor> {
        ids.iter()
            .map(|id| model(id, ModelRole::MigrationPlanner))
            .collect()
    }

    fn verifier(
        models: Vec<ModelDescriptor>,
        executor: ScriptedExecutor,
        params: VerificationParams,
    ) -> EnsembleVerifier<MockRegistry, NoMetrics, ScriptedExecutor> {
        let selector = ModelSelector::new(
            Arc::new(MockRegistry { models }),
            Arc::new(NoMetrics),
            CanaryConfig::default(),
        );
        EnsembleVerifier::new(selector, Arc::new(executor), params)
    }

    fn migration_plan() -> Value {
        json!({
            "kind": "migration",
            "sql": "CREATE INDEX idx_users_email ON users (email);",
            "down": "DROP INDEX idx_users_email;"
        })
    }

    fn migrate() -> VerificationContext {
        VerificationContext::new(OperationKind::Migrate, json!({"schema": "users"}))
    }

    // ==================== Scenarios ====================

    #[tokio::test]
    async fn test_three_member_panel_two_identical_successes() {
        let executor = ScriptedExecutor::default()
            .with("a", Script::Respond(migration_plan()))
            .with("b", Script::Fail("rate limited".to_string()))
            .with("c", Script::Respond(migration_plan()));
        let verifier = verifier(
            planners(&["a", "b", "c"]),
            executor,
            VerificationParams::default().with_panel_size(3),
        );

        let outcome = verifier.verify(&migrate()).await.unwrap();

        assert!(outcome.success, "{:?}", outcome.reason);
        assert!(outcome.consensus);
        assert_eq!(outcome.metadata.agreement_score, 1.0);
        assert_eq!(outcome.results.len(), 3);
        assert_eq!(outcome.successful_count(), 2);
        assert_eq!(outcome.final_result, Some(migration_plan()));
    }

    #[tokio::test]
    async fn test_two_members_disagree() {
        let executor = ScriptedExecutor::default()
            .with("a", Script::Respond(json!({"plan": "add index"})))
            .with("b", Script::Respond(json!({"plan": "rewrite query entirely"})));
        let verifier = verifier(planners(&["a", "b"]), executor, VerificationParams::default())
            .with_similarity(Arc::new(FixedSimilarity(0.3)));

        let outcome = verifier.verify(&migrate()).await.unwrap();

        assert!(!outcome.success);
        assert!(!outcome.consensus);
        assert_eq!(outcome.metadata.agreement_score, 0.0);
        assert_eq!(
            outcome.reason_message().as_deref(),
            Some("insufficient agreement: 0.00 < 0.70")
        );
        assert!(outcome.final_result.is_none());
    }

    #[tokio::test]
    async fn test_all_members_fail() {
        let executor = ScriptedExecutor::default()
            .with("a", Script::Fail("boom".to_string()))
            .with("b", Script::Fail("boom".to_string()));
        let verifier = verifier(planners(&["a", "b"]), executor, VerificationParams::default());

        let outcome = verifier.verify(&migrate()).await.unwrap();

        assert!(!outcome.success);
        assert_eq!(outcome.reason, Some(RejectionReason::AllModelsFailed));
        assert_eq!(
            outcome.reason_message().as_deref(),
            Some("all verification models failed")
        );
        assert_eq!(outcome.metadata.agreement_score, 0.0);
        assert_eq!(outcome.results.len(), 2);
    }

    #[tokio::test]
    async fn test_single_success_without_quorum() {
        let executor =
            ScriptedExecutor::default().with("v", Script::Respond(json!({"valid": true})));
        let verifier = verifier(
            vec![model("v", ModelRole::Validator)],
            executor,
            VerificationParams::default(),
        );
        let context = VerificationContext::new(OperationKind::Validate, json!({}));
        assert!(!context.requires_quorum());

        let outcome = verifier.verify(&context).await.unwrap();

        assert!(outcome.success);
        assert!(outcome.consensus);
        assert_eq!(outcome.metadata.agreement_score, 1.0);
        assert_eq!(outcome.successful_count(), 1);
        assert_eq!(outcome.final_result, Some(json!({"valid": true})));
    }

    #[tokio::test]
    async fn test_non_destructive_disagreement_still_accepted() {
        let executor = ScriptedExecutor::default()
            .with("v1", Script::Respond(json!({"valid": true})))
            .with("v2", Script::Respond(json!({"valid": false})));
        let verifier = verifier(
            vec![
                model("v1", ModelRole::Validator),
                model("v2", ModelRole::Validator),
            ],
            executor,
            VerificationParams::default(),
        )
        .with_similarity(Arc::new(FixedSimilarity(0.1)));
        let context = VerificationContext::new(OperationKind::Validate, json!({}));

        let outcome = verifier.verify(&context).await.unwrap();

        assert!(outcome.success);
        assert!(!outcome.consensus);
        assert_eq!(outcome.final_result, Some(json!({"valid": true})));
    }

    #[tokio::test]
    async fn test_insufficient_quorum() {
        let executor = ScriptedExecutor::default()
            .with("a", Script::Respond(migration_plan()))
            .with("b", Script::Fail("timeout".to_string()));
        let verifier = verifier(planners(&["a", "b"]), executor, VerificationParams::default());

        let outcome = verifier.verify(&migrate()).await.unwrap();

        assert!(!outcome.success);
        assert_eq!(
            outcome.reason,
            Some(RejectionReason::InsufficientQuorum {
                successful: 1,
                required: 2
            })
        );
        assert_eq!(
            outcome.reason_message().as_deref(),
            Some("insufficient quorum: 1 < 2")
        );
    }

    #[tokio::test]
    async fn test_quorum_shortfall_still_reports_agreement() {
        let executor = ScriptedExecutor::default()
            .with("a", Script::Respond(migration_plan()))
            .with("b", Script::Fail("timeout".to_string()));
        let verifier = verifier(planners(&["a", "b"]), executor, VerificationParams::default());

        let outcome = verifier.verify(&migrate()).await.unwrap();

        assert!(!outcome.success);
        assert_eq!(outcome.metadata.agreement_score, 1.0);
        assert!(outcome.consensus);
        assert!(outcome.final_result.is_none());
    }

    #[tokio::test]
    async fn test_huge_quorum_size_is_insufficient_quorum() {
        let executor = ScriptedExecutor::default().with("a", Script::Respond(migration_plan()));
        let verifier = verifier(planners(&["a"]), executor, VerificationParams::default());

        let outcome = verifier
            .verify(&migrate().with_quorum_size(usize::MAX))
            .await
            .unwrap();

        assert!(!outcome.success);
        assert_eq!(outcome.metadata.models_used, vec!["a"]);
        assert_eq!(
            outcome.reason,
            Some(RejectionReason::InsufficientQuorum {
                successful: 1,
                required: usize::MAX
            })
        );
    }

    #[tokio::test]
    async fn test_quorum_waived_by_context() {
        let executor = ScriptedExecutor::default()
            .with("a", Script::Respond(migration_plan()))
            .with("b", Script::Fail("timeout".to_string()));
        let verifier = verifier(planners(&["a", "b"]), executor, VerificationParams::default());

        let outcome = verifier.verify(&migrate().without_quorum()).await.unwrap();

        assert!(outcome.success);
        assert!(!outcome.metadata.quorum_required);
    }

    #[tokio::test]
    async fn test_critical_violation_overrides_quorum() {
        let drop = json!({"kind": "migration", "sql": "DROP TABLE users;"});
        let executor = ScriptedExecutor::default()
            .with("a", Script::Respond(drop.clone()))
            .with("b", Script::Respond(drop));
        let audit = Arc::new(RecordingAudit::default());
        let verifier = verifier(planners(&["a", "b"]), executor, VerificationParams::default())
            .with_audit_sink(audit.clone());

        let outcome = verifier.verify(&migrate()).await.unwrap();

        assert!(!outcome.success);
        assert!(!outcome.consensus);
        assert!(outcome.metadata.safety_violation);
        assert_eq!(outcome.results.len(), 2);
        assert_eq!(outcome.safety_checks.len(), SafetyCheckSuite::standard().len());
        assert_eq!(outcome.metadata.destructive_markers, vec!["DROP TABLE"]);
        assert!(matches!(
            outcome.reason,
            Some(RejectionReason::CriticalSafetyViolation { ref check, .. }) if check == "destructive_operation"
        ));
        assert!(
            outcome
                .reason_message()
                .unwrap()
                .starts_with("critical safety violation: destructive operation without safeguards")
        );

        let events = audit.events.lock().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].0, AuditEventKind::VerificationFailure);
        assert_eq!(events[0].1["destructive_markers"], json!(["DROP TABLE"]));
    }

    #[tokio::test]
    async fn test_safeguarded_drop_is_accepted() {
        let drop = json!({"kind": "migration", "sql": "DROP TABLE legacy;", "confirmed": true, "down": "CREATE TABLE legacy (id INT);"});
        let executor = ScriptedExecutor::default()
            .with("a", Script::Respond(drop.clone()))
            .with("b", Script::Respond(drop));
        let verifier = verifier(planners(&["a", "b"]), executor, VerificationParams::default());

        let outcome = verifier.verify(&migrate()).await.unwrap();

        assert!(outcome.success, "{:?}", outcome.reason);
        assert!(outcome.safety_checks.iter().all(|c| c.severity != Severity::Critical || c.passed));
    }

    #[tokio::test]
    async fn test_no_models_available() {
        let audit = Arc::new(RecordingAudit::default());
        let verifier = verifier(
            vec![model("v", ModelRole::Validator)],
            ScriptedExecutor::default(),
            VerificationParams::default(),
        )
        .with_audit_sink(audit.clone());

        let outcome = verifier.verify(&migrate()).await.unwrap();

        assert!(!outcome.success);
        assert_eq!(outcome.reason, Some(RejectionReason::NoModelsAvailable));
        assert!(outcome.results.is_empty());
        assert!(outcome.metadata.models_used.is_empty());
        assert_eq!(audit.events.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_registry_failure_is_an_error() {
        let selector = ModelSelector::new(
            Arc::new(UnreachableRegistry),
            Arc::new(NoMetrics),
            CanaryConfig::default(),
        );
        let verifier = EnsembleVerifier::new(
            selector,
            Arc::new(ScriptedExecutor::default()),
            VerificationParams::default(),
        );

        let result = verifier.verify(&migrate()).await;
        assert!(matches!(
            result,
            Err(VerifyError::Selection(SelectionError::Registry(_)))
        ));
    }

    // ==================== Panel assembly ====================

    #[tokio::test]
    async fn test_panel_has_distinct_members() {
        let executor = ScriptedExecutor::default()
            .with("a", Script::Respond(migration_plan()))
            .with("b", Script::Respond(migration_plan()))
            .with("c", Script::Respond(migration_plan()));
        let verifier = verifier(planners(&["a", "b", "c"]), executor, VerificationParams::default());

        let outcome = verifier
            .verify(&migrate().with_quorum_size(3).with_user("alice"))
            .await
            .unwrap();

        let mut used = outcome.metadata.models_used.clone();
        used.sort();
        used.dedup();
        assert_eq!(used.len(), 3);
        assert!(outcome.success);
    }

    #[tokio::test]
    async fn test_panel_smaller_than_quorum_when_exhausted() {
        let executor = ScriptedExecutor::default().with("a", Script::Respond(migration_plan()));
        let verifier = verifier(planners(&["a"]), executor, VerificationParams::default());

        let outcome = verifier.verify(&migrate()).await.unwrap();

        assert_eq!(outcome.metadata.models_used, vec!["a"]);
        assert_eq!(
            outcome.reason,
            Some(RejectionReason::InsufficientQuorum {
                successful: 1,
                required: 2
            })
        );
    }

    #[tokio::test]
    async fn test_required_capabilities_limit_panel() {
        let models = vec![
            model("a", ModelRole::MigrationPlanner).with_capability("postgres"),
            model("b", ModelRole::MigrationPlanner),
        ];
        let executor = ScriptedExecutor::default()
            .with("a", Script::Respond(migration_plan()))
            .with("b", Script::Respond(migration_plan()));
        let verifier = verifier(models, executor, VerificationParams::default());

        let outcome = verifier
            .verify(&migrate().with_capability("postgres"))
            .await
            .unwrap();

        assert_eq!(outcome.metadata.models_used, vec!["a"]);
    }

    // ==================== Isolation and ordering ====================

    #[tokio::test(start_paused = true)]
    async fn test_results_keep_panel_order() {
        let executor = ScriptedExecutor::default()
            .with("a", Script::Delay(Duration::from_secs(3), migration_plan()))
            .with("b", Script::Delay(Duration::from_secs(2), migration_plan()))
            .with("c", Script::Delay(Duration::from_secs(1), migration_plan()));
        let progress = RecordingProgress::default();
        let verifier = verifier(
            planners(&["a", "b", "c"]),
            executor,
            VerificationParams::default().with_panel_size(3),
        );

        let outcome = verifier
            .verify_with_progress(&migrate(), &progress)
            .await
            .unwrap();

        let order: Vec<&str> = outcome.results.iter().map(|r| r.model_id.as_str()).collect();
        assert_eq!(order, outcome.metadata.models_used);

        let completed: Vec<String> = progress
            .members
            .lock()
            .unwrap()
            .iter()
            .map(|(id, _)| id.clone())
            .collect();
        assert_eq!(completed, vec!["c", "b", "a"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_member_timeout_is_a_failure() {
        let executor = ScriptedExecutor::default()
            .with("a", Script::Respond(migration_plan()))
            .with("b", Script::Delay(Duration::from_secs(600), migration_plan()));
        let verifier = verifier(
            planners(&["a", "b"]),
            executor,
            VerificationParams::default().with_timeout_seconds(5),
        );

        let outcome = verifier.verify(&migrate()).await.unwrap();

        let slow = &outcome.results[1];
        assert_eq!(slow.model_id, "b");
        assert!(!slow.success);
        assert_eq!(slow.error.as_deref(), Some("execution timed out after 5s"));
        assert!(!outcome.success);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sub_second_timeout_reports_milliseconds() {
        let executor = ScriptedExecutor::default()
            .with("a", Script::Respond(migration_plan()))
            .with("b", Script::Delay(Duration::from_secs(600), migration_plan()));
        let verifier = verifier(
            planners(&["a", "b"]),
            executor,
            VerificationParams::default().with_member_timeout(Duration::from_millis(250)),
        );

        let outcome = verifier.verify(&migrate()).await.unwrap();

        assert_eq!(
            outcome.results[1].error.as_deref(),
            Some("execution timed out after 250ms")
        );
    }

    #[test]
    fn test_timeout_label() {
        assert_eq!(timeout_label(Duration::from_secs(120)), "120s");
        assert_eq!(timeout_label(Duration::from_millis(1500)), "1500ms");
        assert_eq!(timeout_label(Duration::ZERO), "0ms");
    }

    #[tokio::test]
    async fn test_panicking_member_is_isolated() {
        let executor = ScriptedExecutor::default()
            .with("a", Script::Panic)
            .with("b", Script::Respond(migration_plan()))
            .with("c", Script::Respond(migration_plan()));
        let verifier = verifier(
            planners(&["a", "b", "c"]),
            executor,
            VerificationParams::default().with_panel_size(3),
        );

        let outcome = verifier.verify(&migrate()).await.unwrap();

        let failed = outcome.results.iter().find(|r| r.model_id == "a").unwrap();
        assert!(!failed.success);
        assert_eq!(
            failed.error.as_deref(),
            Some("executor panicked: backend exploded")
        );
        assert!(outcome.success);
    }

    #[tokio::test]
    async fn test_outcome_independent_of_registry_order() {
        for ids in [["a", "b", "c"], ["c", "b", "a"], ["b", "c", "a"]] {
            let executor = ScriptedExecutor::default()
                .with("a", Script::Respond(migration_plan()))
                .with("b", Script::Respond(migration_plan()))
                .with("c", Script::Fail("unavailable".to_string()));
            let verifier = verifier(
                planners(&ids),
                executor,
                VerificationParams::default().with_panel_size(3),
            );

            let outcome = verifier.verify(&migrate()).await.unwrap();
            assert!(outcome.success, "order {:?}: {:?}", ids, outcome.reason);
        }
    }

    // ==================== Audit and progress ====================

    #[tokio::test]
    async fn test_success_audit_event() {
        let executor = ScriptedExecutor::default()
            .with("a", Script::Respond(migration_plan()))
            .with("b", Script::Respond(migration_plan()));
        let audit = Arc::new(RecordingAudit::default());
        let verifier = verifier(planners(&["a", "b"]), executor, VerificationParams::default())
            .with_audit_sink(audit.clone());

        verifier.verify(&migrate()).await.unwrap();

        let events = audit.events.lock().unwrap();
        assert_eq!(events.len(), 1);
        let (kind, payload) = &events[0];
        assert_eq!(*kind, AuditEventKind::VerificationSuccess);
        assert_eq!(payload["operation"], "migrate");
        assert_eq!(payload["agreement_score"], 1.0);
        assert_eq!(payload["models"], json!(["a", "b"]));
        assert_eq!(payload["member_results"][0]["success"], true);
        assert!(payload.get("reason").is_none());
        assert!(payload["safety_checks"].as_array().unwrap().len() >= 5);
    }

    #[tokio::test]
    async fn test_failing_audit_sink_does_not_change_outcome() {
        let executor = ScriptedExecutor::default()
            .with("a", Script::Respond(migration_plan()))
            .with("b", Script::Respond(migration_plan()));
        let verifier = verifier(planners(&["a", "b"]), executor, VerificationParams::default())
            .with_audit_sink(Arc::new(BrokenAudit));

        let outcome = verifier.verify(&migrate()).await.unwrap();
        assert!(outcome.success);
    }

    #[tokio::test]
    async fn test_progress_follows_state_machine() {
        let executor = ScriptedExecutor::default()
            .with("a", Script::Respond(migration_plan()))
            .with("b", Script::Respond(migration_plan()));
        let progress = RecordingProgress::default();
        let verifier = verifier(planners(&["a", "b"]), executor, VerificationParams::default());

        verifier
            .verify_with_progress(&migrate(), &progress)
            .await
            .unwrap();

        let phases = progress.phases.lock().unwrap().clone();
        assert_eq!(
            phases,
            vec![
                VerificationPhase::PanelAssembled,
                VerificationPhase::Executing,
                VerificationPhase::SafetyEvaluated,
                VerificationPhase::Accepted,
            ]
        );
        let mut previous = VerificationPhase::Idle;
        for phase in phases {
            assert!(previous.can_transition_to(phase));
            previous = phase;
        }
        assert_eq!(progress.members.lock().unwrap().len(), 2);
    }
}
