//! Safety checks over panel outputs
//!
//! Each check is an independent predicate over the migration artifacts of
//! the successful members. A failed check with [`Severity::Critical`] vetoes
//! acceptance unconditionally; lower severities are reported for triage only.

use super::artifact::MigrationArtifact;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Severity of a safety finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of one safety check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SafetyCheckResult {
    pub name: String,
    pub passed: bool,
    pub severity: Severity,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl SafetyCheckResult {
    pub fn pass(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed: true,
            severity: Severity::Low,
            message: message.into(),
            details: None,
        }
    }

    pub fn fail(name: impl Into<String>, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed: false,
            severity,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Failed with critical severity
    pub fn is_critical_violation(&self) -> bool {
        !self.passed && self.severity == Severity::Critical
    }
}

/// An independent predicate over migration artifacts
pub trait SafetyCheck: Send + Sync {
    /// Stable check name used in reports and audit events
    fn name(&self) -> &'static str;

    /// Evaluate the check. Must report a severity and message even when passing.
    fn evaluate(&self, artifacts: &[MigrationArtifact]) -> SafetyCheckResult;
}

const NO_ARTIFACTS: &str = "no migration artifacts to inspect";

fn findings_details(findings: &[(String, String)]) -> Value {
    Value::Array(
        findings
            .iter()
            .map(|(model, statement)| json!({"model": model, "statement": statement}))
            .collect(),
    )
}

/// Flags destructive statements that carry neither a backup nor a confirmation
pub struct DestructiveOperationCheck;

impl SafetyCheck for DestructiveOperationCheck {
    fn name(&self) -> &'static str {
        "destructive_operation"
    }

    fn evaluate(&self, artifacts: &[MigrationArtifact]) -> SafetyCheckResult {
        let mut unsafe_markers: Vec<&'static str> = Vec::new();
        let mut offenders = Vec::new();
        let mut safeguarded = 0usize;

        for artifact in artifacts {
            let markers = artifact.destructive_markers();
            if markers.is_empty() {
                continue;
            }
            if artifact.is_safeguarded() {
                safeguarded += 1;
                continue;
            }
            offenders.push(json!({"model": artifact.model_id, "markers": markers}));
            for marker in markers {
                if !unsafe_markers.contains(&marker) {
                    unsafe_markers.push(marker);
                }
            }
        }

        if !offenders.is_empty() {
            return SafetyCheckResult::fail(
                self.name(),
                Severity::Critical,
                format!(
                    "destructive operation without safeguards: {}",
                    unsafe_markers.join(", ")
                ),
            )
            .with_details(json!({ "artifacts": offenders }));
        }

        if safeguarded > 0 {
            SafetyCheckResult::pass(
                self.name(),
                format!("{safeguarded} destructive artifact(s) carry a backup or confirmation"),
            )
        } else {
            SafetyCheckResult::pass(self.name(), "no destructive operations detected")
        }
    }
}

/// Flags unbounded deletes and column type changes
pub struct DataLossRiskCheck;

impl SafetyCheck for DataLossRiskCheck {
    fn name(&self) -> &'static str {
        "data_loss_risk"
    }

    fn evaluate(&self, artifacts: &[MigrationArtifact]) -> SafetyCheckResult {
        if artifacts.is_empty() {
            return SafetyCheckResult::pass(self.name(), NO_ARTIFACTS);
        }

        let findings: Vec<(String, String)> = artifacts
            .iter()
            .flat_map(|a| a.statements().map(move |s| (a, s)))
            .filter(|(_, s)| {
                (s.contains("DELETE FROM") && !s.contains(" WHERE "))
                    || (s.contains("ALTER COLUMN") && s.contains(" TYPE "))
            })
            .map(|(a, s)| (a.model_id.clone(), s.to_string()))
            .collect();

        if findings.is_empty() {
            SafetyCheckResult::pass(self.name(), "no unbounded deletes or type changes")
        } else {
            SafetyCheckResult::fail(
                self.name(),
                Severity::High,
                format!("{} statement(s) may lose data", findings.len()),
            )
            .with_details(findings_details(&findings))
        }
    }
}

/// Flags constraints added to existing data without a default or deferred validation
pub struct ConstraintViolationCheck;

impl SafetyCheck for ConstraintViolationCheck {
    fn name(&self) -> &'static str {
        "constraint_violation"
    }

    fn evaluate(&self, artifacts: &[MigrationArtifact]) -> SafetyCheckResult {
        if artifacts.is_empty() {
            return SafetyCheckResult::pass(self.name(), NO_ARTIFACTS);
        }

        let findings: Vec<(String, String)> = artifacts
            .iter()
            .flat_map(|a| a.statements().map(move |s| (a, s)))
            .filter(|(_, s)| {
                s.contains("SET NOT NULL")
                    || (s.contains("ADD COLUMN") && s.contains("NOT NULL") && !s.contains("DEFAULT"))
                    || (s.contains("ADD CONSTRAINT") && !s.contains("NOT VALID"))
            })
            .map(|(a, s)| (a.model_id.clone(), s.to_string()))
            .collect();

        if findings.is_empty() {
            SafetyCheckResult::pass(self.name(), "no constraints that existing rows may violate")
        } else {
            SafetyCheckResult::fail(
                self.name(),
                Severity::Medium,
                format!(
                    "{} statement(s) add constraints existing rows may violate",
                    findings.len()
                ),
            )
            .with_details(findings_details(&findings))
        }
    }
}

/// Flags migrations that ship without a down section
pub struct RollbackSafetyCheck;

impl SafetyCheck for RollbackSafetyCheck {
    fn name(&self) -> &'static str {
        "rollback_safety"
    }

    fn evaluate(&self, artifacts: &[MigrationArtifact]) -> SafetyCheckResult {
        if artifacts.is_empty() {
            return SafetyCheckResult::pass(self.name(), NO_ARTIFACTS);
        }

        let missing: Vec<&str> = artifacts
            .iter()
            .filter(|a| !a.has_down)
            .map(|a| a.model_id.as_str())
            .collect();

        if missing.is_empty() {
            SafetyCheckResult::pass(self.name(), "every migration has a rollback path")
        } else {
            SafetyCheckResult::fail(
                self.name(),
                Severity::Medium,
                format!("{} migration(s) have no rollback path", missing.len()),
            )
            .with_details(json!({ "models": missing }))
        }
    }
}

/// Flags removal of foreign keys and cascading drops
pub struct ReferentialIntegrityCheck;

impl SafetyCheck for ReferentialIntegrityCheck {
    fn name(&self) -> &'static str {
        "referential_integrity"
    }

    fn evaluate(&self, artifacts: &[MigrationArtifact]) -> SafetyCheckResult {
        if artifacts.is_empty() {
            return SafetyCheckResult::pass(self.name(), NO_ARTIFACTS);
        }

        let findings: Vec<(String, String)> = artifacts
            .iter()
            .flat_map(|a| a.statements().map(move |s| (a, s)))
            .filter(|(_, s)| {
                s.contains("DROP CONSTRAINT")
                    || s.contains("DROP FOREIGN KEY")
                    || s.ends_with(" CASCADE")
                    || s.contains(" CASCADE ")
            })
            .map(|(a, s)| (a.model_id.clone(), s.to_string()))
            .collect();

        if findings.is_empty() {
            SafetyCheckResult::pass(self.name(), "no foreign keys removed")
        } else {
            SafetyCheckResult::fail(
                self.name(),
                Severity::High,
                format!("{} statement(s) weaken referential integrity", findings.len()),
            )
            .with_details(findings_details(&findings))
        }
    }
}

/// Ordered set of safety checks
pub struct SafetyCheckSuite {
    checks: Vec<Box<dyn SafetyCheck>>,
}

impl SafetyCheckSuite {
    pub fn new(checks: Vec<Box<dyn SafetyCheck>>) -> Self {
        Self { checks }
    }

    /// The five standard checks
    pub fn standard() -> Self {
        Self::new(vec![
            Box::new(DestructiveOperationCheck),
            Box::new(DataLossRiskCheck),
            Box::new(ConstraintViolationCheck),
            Box::new(RollbackSafetyCheck),
            Box::new(ReferentialIntegrityCheck),
        ])
    }

    pub fn with_check(mut self, check: impl SafetyCheck + 'static) -> Self {
        self.checks.push(Box::new(check));
        self
    }

    pub fn len(&self) -> usize {
        self.checks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    /// Run every check, in suite order
    pub fn evaluate(&self, artifacts: &[MigrationArtifact]) -> Vec<SafetyCheckResult> {
        self.checks.iter().map(|c| c.evaluate(artifacts)).collect()
    }
}

impl Default for SafetyCheckSuite {
    fn default() -> Self {
        Self::standard()
    }
}

/// First critical violation in `results`, if any
pub fn first_critical_violation(results: &[SafetyCheckResult]) -> Option<&SafetyCheckResult> {
    results.iter().find(|r| r.is_critical_violation())
}

/// Distinct destructive markers across `artifacts`, in first-seen order
pub fn destructive_markers(artifacts: &[MigrationArtifact]) -> Vec<String> {
    let mut markers: Vec<String> = Vec::new();
    for marker in artifacts.iter().flat_map(|a| a.destructive_markers()) {
        if !markers.iter().any(|m| m == marker) {
            markers.push(marker.to_string());
        }
    }
    markers
}
