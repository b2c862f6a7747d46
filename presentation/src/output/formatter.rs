//! Output formatter trait

use ensemble_domain::{ConfigIssue, SelectionOutcome, VerificationOutcome};
use serde::Serialize;
use serde_json::json;

/// One configuration source as shown by the `config` command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceStatus {
    pub label: &'static str,
    pub location: String,
    pub found: bool,
}

/// Trait for formatting command results
pub trait OutputFormatter {
    /// Format a selection outcome
    fn format_selection(&self, outcome: &SelectionOutcome) -> String;

    /// Format a verification outcome
    fn format_verification(&self, outcome: &VerificationOutcome) -> String;

    /// Format configuration sources and validation issues
    fn format_config_report(&self, sources: &[SourceStatus], issues: &[ConfigIssue]) -> String;
}

/// Pretty-printed JSON output
pub struct JsonFormatter;

impl JsonFormatter {
    fn to_json<T: Serialize>(value: &T) -> String {
        serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_selection(&self, outcome: &SelectionOutcome) -> String {
        Self::to_json(outcome)
    }

    fn format_verification(&self, outcome: &VerificationOutcome) -> String {
        let mut value = serde_json::to_value(outcome).unwrap_or_else(|_| json!({}));
        if let Some(message) = outcome.reason_message() {
            value["reason_message"] = json!(message);
        }
        Self::to_json(&value)
    }

    fn format_config_report(&self, sources: &[SourceStatus], issues: &[ConfigIssue]) -> String {
        let sources: Vec<_> = sources
            .iter()
            .map(|s| json!({"source": s.label, "location": s.location, "found": s.found}))
            .collect();
        let issues: Vec<_> = issues
            .iter()
            .map(|i| {
                json!({
                    "severity": if i.is_error() { "error" } else { "warning" },
                    "message": i.message,
                })
            })
            .collect();
        Self::to_json(&json!({"sources": sources, "issues": issues}))
    }
}
