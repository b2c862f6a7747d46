//! Ensemble verification domain
//!
//! The pure half of ensemble verification: inputs, per-member results,
//! migration artifact extraction, the safety check suite, pairwise
//! similarity, consensus math, the quorum gate and the final outcome.
//!
//! ```text
//! VerificationContext ──▶ panel (selector) ──▶ Vec<PanelMemberResult>
//!                                                   │
//!                     ┌─────────────────────────────┤
//!                     ▼                             ▼
//!          SafetyCheckSuite                 compute_consensus
//!          (critical → reject)              QuorumGate (destructive only)
//!                     └──────────────┬──────────────┘
//!                                    ▼
//!                           VerificationOutcome
//! ```

pub mod artifact;
pub mod consensus;
pub mod context;
pub mod member;
pub mod operation;
pub mod outcome;
pub mod phase;
pub mod safety;
pub mod similarity;

pub use artifact::{MigrationArtifact, extract_artifacts};
pub use consensus::{
    ConsensusReport, DEFAULT_AGREEMENT_THRESHOLD, DEFAULT_QUORUM_SIZE, PAIR_AGREEMENT_THRESHOLD,
    PairSimilarity, QuorumGate, compute_consensus,
};
pub use context::VerificationContext;
pub use member::{PanelMemberResult, successful_outputs};
pub use operation::OperationKind;
pub use outcome::{RejectionReason, VerificationMetadata, VerificationOutcome};
pub use phase::VerificationPhase;
pub use safety::{
    SafetyCheck, SafetyCheckResult, SafetyCheckSuite, Severity, destructive_markers,
    first_critical_violation,
};
pub use similarity::{
    LengthRatioSimilarity, SimilarityKind, SimilarityStrategy, StructuralSimilarity,
};
