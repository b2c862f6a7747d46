//! Model selection domain
//!
//! Pure pieces of the selector: the input context, deterministic canary
//! bucketing, performance scoring and the result types. The selector use case
//! in the application layer combines them with registry and metrics snapshots.

pub mod canary;
pub mod context;
pub mod result;
pub mod scoring;

pub use canary::{CanaryConfig, canary_bucket, canary_seed, stable_hash};
pub use context::SelectionContext;
pub use result::{
    NotFoundReason, SelectionMetadata, SelectionOutcome, SelectionReason, SelectionResult,
};
pub use scoring::performance_score;
