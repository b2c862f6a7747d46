//! Audit sink that reports events through `tracing`.
//!
//! Used when no audit file is configured, so decisions still show up in the
//! process log.

use ensemble_application::ports::audit_sink::{AuditError, AuditEvent, AuditEventKind, AuditSink};
use tracing::{info, warn};

pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn record(&self, event: &AuditEvent) -> Result<(), AuditError> {
        let payload = serde_json::to_string(&event.payload)
            .map_err(|e| AuditError::Serialization(e.to_string()))?;
        match event.kind {
            AuditEventKind::VerificationSuccess => {
                info!(target: "audit", event = %event.kind, "{}", payload)
            }
            AuditEventKind::VerificationFailure => {
                warn!(target: "audit", event = %event.kind, "{}", payload)
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tracing_sink_never_fails() {
        let sink = TracingAuditSink;
        for kind in [
            AuditEventKind::VerificationSuccess,
            AuditEventKind::VerificationFailure,
        ] {
            assert!(
                sink.record(&AuditEvent::new(kind, json!({"operation": "migrate"})))
                    .is_ok()
            );
        }
    }
}
