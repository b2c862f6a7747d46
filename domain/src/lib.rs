//! Domain layer for model-ensemble
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns, and
//! everything in it is synchronous and side-effect free.
//!
//! # Core Concepts
//!
//! ## Model Selection
//!
//! Routes a task for a [`ModelRole`] to one backend:
//!
//! - **Canary routing**: a deterministic share of `(user, project, role)`
//!   triples is served by canary models
//! - **Performance ranking**: candidates are scored from historical
//!   [`PerformanceWindow`]s
//! - **Fallback**: with no stable candidate, the first eligible model is used
//!
//! ## Ensemble Verification
//!
//! Runs one operation on a panel of models and accepts the result only when:
//!
//! - at least one member succeeded,
//! - no critical [`SafetyCheck`] failed, and
//! - for destructive operations, the quorum and agreement threshold are met

pub mod config;
pub mod core;
pub mod model;
pub mod selection;
pub mod verification;

// Re-export commonly used types
pub use config::{ConfigIssue, ConfigIssueCode, IssueSeverity};
pub use crate::core::error::DomainError;
pub use model::{MetricsWindow, ModelDescriptor, ModelRole, ModelStatus, PerformanceWindow};
pub use selection::{
    CanaryConfig, NotFoundReason, SelectionContext, SelectionMetadata, SelectionOutcome,
    SelectionReason, SelectionResult, canary_bucket, performance_score,
};
pub use verification::{
    ConsensusReport, LengthRatioSimilarity, MigrationArtifact, OperationKind, PanelMemberResult,
    QuorumGate, RejectionReason, SafetyCheck, SafetyCheckResult, SafetyCheckSuite, Severity,
    SimilarityKind, SimilarityStrategy, StructuralSimilarity, VerificationContext,
    VerificationMetadata, VerificationOutcome, VerificationPhase, compute_consensus,
};
