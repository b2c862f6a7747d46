//! Verification state machine
//!
//! ```text
//! Idle → PanelAssembled → Executing → SafetyEvaluated → Accepted | Rejected
//! ```
//!
//! A critical safety violation moves straight from `SafetyEvaluated` to
//! `Rejected`. Panel assembly failure and "all members failed" also end in
//! `Rejected`. There are no retries within one verification.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationPhase {
    Idle,
    PanelAssembled,
    Executing,
    SafetyEvaluated,
    Accepted,
    Rejected,
}

impl VerificationPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerificationPhase::Idle => "idle",
            VerificationPhase::PanelAssembled => "panel_assembled",
            VerificationPhase::Executing => "executing",
            VerificationPhase::SafetyEvaluated => "safety_evaluated",
            VerificationPhase::Accepted => "accepted",
            VerificationPhase::Rejected => "rejected",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, VerificationPhase::Accepted | VerificationPhase::Rejected)
    }

    /// Whether moving from `self` to `next` is a legal transition
    pub fn can_transition_to(&self, next: VerificationPhase) -> bool {
        use VerificationPhase::*;
        matches!(
            (self, next),
            (Idle, PanelAssembled)
                | (Idle, Rejected)
                | (PanelAssembled, Executing)
                | (Executing, SafetyEvaluated)
                | (Executing, Rejected)
                | (SafetyEvaluated, Accepted)
                | (SafetyEvaluated, Rejected)
        )
    }
}

impl std::fmt::Display for VerificationPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
