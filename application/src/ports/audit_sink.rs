//! Port for verification audit events.
//!
//! Audit recording is best effort: the verifier records each terminal
//! decision at most once, never waits on a slow sink, and a failing sink
//! only produces a local warning. It never changes the verification outcome.

use serde_json::Value;
use thiserror::Error;

/// Kind of audit event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditEventKind {
    VerificationSuccess,
    VerificationFailure,
}

impl AuditEventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditEventKind::VerificationSuccess => "verification_success",
            AuditEventKind::VerificationFailure => "verification_failure",
        }
    }
}

impl std::fmt::Display for AuditEventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A structured audit event.
pub struct AuditEvent {
    pub kind: AuditEventKind,
    /// JSON payload with event-specific fields.
    pub payload: Value,
}

impl AuditEvent {
    pub fn new(kind: AuditEventKind, payload: Value) -> Self {
        Self { kind, payload }
    }
}

/// Errors reported by audit sinks
#[derive(Error, Debug)]
pub enum AuditError {
    #[error("Audit write failed: {0}")]
    WriteFailed(String),

    #[error("Audit serialization failed: {0}")]
    Serialization(String),
}

/// Destination for audit events.
///
/// `record` must return quickly; it is called on the verification path.
pub trait AuditSink: Send + Sync {
    fn record(&self, event: &AuditEvent) -> Result<(), AuditError>;
}

/// No-op implementation for tests and when auditing is disabled.
pub struct NoAuditSink;

impl AuditSink for NoAuditSink {
    fn record(&self, _event: &AuditEvent) -> Result<(), AuditError> {
        Ok(())
    }
}
