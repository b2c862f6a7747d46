//! Selection output

use crate::model::ModelDescriptor;
use serde::{Deserialize, Serialize};

/// Why a model was chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionReason {
    /// Best (or only) stable candidate
    Stable,
    /// Routed into the canary experiment
    Canary,
    /// Stable candidate whose score clearly stood out
    PerformanceBased,
    /// No stable candidate; first eligible model taken
    Fallback,
}

impl SelectionReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            SelectionReason::Stable => "stable",
            SelectionReason::Canary => "canary",
            SelectionReason::PerformanceBased => "performance_based",
            SelectionReason::Fallback => "fallback",
        }
    }
}

impl std::fmt::Display for SelectionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Diagnostics about how a selection was made
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionMetadata {
    /// Candidates left after role and capability filtering
    pub candidates_considered: usize,
    /// Canary routing was active for this call
    pub canary_active: bool,
    /// Performance ranking was applied
    pub performance_ranked: bool,
    /// Fallback path was used
    pub fallback_used: bool,
}

/// A chosen model with its justification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionResult {
    pub model: ModelDescriptor,
    pub reason: SelectionReason,
    /// Confidence in the choice, in [0, 1]
    pub confidence: f64,
    pub metadata: SelectionMetadata,
}

impl SelectionResult {
    pub fn new(model: ModelDescriptor, reason: SelectionReason, confidence: f64) -> Self {
        Self {
            model,
            reason,
            confidence: confidence.clamp(0.0, 1.0),
            metadata: SelectionMetadata::default(),
        }
    }

    pub fn with_metadata(mut self, metadata: SelectionMetadata) -> Self {
        self.metadata = metadata;
        self
    }
}

/// Why no model could be selected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotFoundReason {
    /// The registry lists no model for the role
    NoModelsForRole,
    /// Models exist for the role but none has the required capabilities
    NoCapableModels,
}

impl std::fmt::Display for NotFoundReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotFoundReason::NoModelsForRole => write!(f, "no models registered for role"),
            NotFoundReason::NoCapableModels => {
                write!(f, "no eligible model has the required capabilities")
            }
        }
    }
}

/// Result of a selection: a chosen model, or a non-fatal "not found"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SelectionOutcome {
    Selected(SelectionResult),
    NotFound { reason: NotFoundReason },
}

impl SelectionOutcome {
    pub fn not_found(reason: NotFoundReason) -> Self {
        SelectionOutcome::NotFound { reason }
    }

    pub fn selected(&self) -> Option<&SelectionResult> {
        match self {
            SelectionOutcome::Selected(result) => Some(result),
            SelectionOutcome::NotFound { .. } => None,
        }
    }

    pub fn into_selected(self) -> Option<SelectionResult> {
        match self {
            SelectionOutcome::Selected(result) => Some(result),
            SelectionOutcome::NotFound { .. } => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, SelectionOutcome::NotFound { .. })
    }
}
