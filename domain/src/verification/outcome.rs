//! Verification outcome and rejection reasons

use super::member::PanelMemberResult;
use super::operation::OperationKind;
use super::safety::SafetyCheckResult;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Why a verification was rejected
///
/// The `Display` form is the user-facing reason string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RejectionReason {
    /// No model could be selected for the panel
    NoModelsAvailable,
    /// Every panel member failed to execute
    AllModelsFailed,
    /// A critical safety check failed
    CriticalSafetyViolation { check: String, message: String },
    /// Fewer successful members than the quorum size
    InsufficientQuorum { successful: usize, required: usize },
    /// Agreement score below the threshold
    InsufficientAgreement { score: f64, threshold: f64 },
}

impl std::fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RejectionReason::NoModelsAvailable => {
                write!(f, "no models available for verification panel")
            }
            RejectionReason::AllModelsFailed => write!(f, "all verification models failed"),
            RejectionReason::CriticalSafetyViolation { message, .. } => {
                write!(f, "critical safety violation: {}", message)
            }
            RejectionReason::InsufficientQuorum {
                successful,
                required,
            } => write!(f, "insufficient quorum: {} < {}", successful, required),
            RejectionReason::InsufficientAgreement { score, threshold } => {
                write!(f, "insufficient agreement: {:.2} < {:.2}", score, threshold)
            }
        }
    }
}

/// Diagnostics attached to every outcome
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VerificationMetadata {
    /// Panel model ids, in panel order
    pub models_used: Vec<String>,
    pub agreement_score: f64,
    pub destructive_markers: Vec<String>,
    pub safety_violation: bool,
    pub successful_members: usize,
    pub quorum_required: bool,
    pub quorum_size: usize,
    pub agreement_threshold: f64,
}

/// Final accept/reject decision of a verification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationOutcome {
    pub operation: OperationKind,
    pub success: bool,
    pub consensus: bool,
    pub results: Vec<PanelMemberResult>,
    pub safety_checks: Vec<SafetyCheckResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<RejectionReason>,
    pub metadata: VerificationMetadata,
}

impl VerificationOutcome {
    /// An accepted outcome carrying `final_result`
    pub fn accepted(
        operation: OperationKind,
        consensus: bool,
        results: Vec<PanelMemberResult>,
        safety_checks: Vec<SafetyCheckResult>,
        final_result: Option<Value>,
        metadata: VerificationMetadata,
    ) -> Self {
        Self {
            operation,
            success: true,
            consensus,
            results,
            safety_checks,
            final_result,
            reason: None,
            metadata,
        }
    }

    /// A rejected outcome; no payload is accepted
    ///
    /// `consensus` starts false. Rejections decided after consensus was
    /// computed set it from the agreement score.
    pub fn rejected(
        operation: OperationKind,
        reason: RejectionReason,
        results: Vec<PanelMemberResult>,
        safety_checks: Vec<SafetyCheckResult>,
        metadata: VerificationMetadata,
    ) -> Self {
        Self {
            operation,
            success: false,
            consensus: false,
            results,
            safety_checks,
            final_result: None,
            reason: Some(reason),
            metadata,
        }
    }

    pub fn is_accepted(&self) -> bool {
        self.success
    }

    /// User-facing reason string for rejected outcomes
    pub fn reason_message(&self) -> Option<String> {
        self.reason.as_ref().map(ToString::to_string)
    }

    pub fn successful_count(&self) -> usize {
        self.results.iter().filter(|r| r.success).count()
    }
}
