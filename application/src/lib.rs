//! Application layer for model-ensemble
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{EnsembleConfig, VerificationParams};
pub use ports::{
    audit_sink::{AuditError, AuditEvent, AuditEventKind, AuditSink, NoAuditSink},
    metrics_source::{MetricsError, MetricsSource, NoMetrics},
    model_registry::{ModelRegistry, RegistryError},
    progress::{NoProgress, VerificationProgress},
    task_executor::{ExecutionError, TaskExecutor},
};
pub use use_cases::select_model::{ModelSelector, SelectionError};
pub use use_cases::verify_ensemble::{EnsembleVerifier, VerifyError};
