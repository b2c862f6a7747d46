//! Console output formatter for selection and verification results

use crate::output::formatter::{OutputFormatter, SourceStatus};
use colored::Colorize;
use ensemble_domain::{
    ConfigIssue, SelectionOutcome, SelectionResult, Severity, VerificationOutcome,
};

/// Formats results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format a selection outcome
    pub fn format_selection(outcome: &SelectionOutcome) -> String {
        match outcome {
            SelectionOutcome::Selected(result) => Self::format_selected(result),
            SelectionOutcome::NotFound { reason } => {
                format!("{} {}\n", "No model selected:".yellow().bold(), reason)
            }
        }
    }

    fn format_selected(result: &SelectionResult) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "{} {} ({})\n",
            "Model:".cyan().bold(),
            result.model.name.bold(),
            result.model.id
        ));
        output.push_str(&format!("{} {}\n", "Role:".cyan().bold(), result.model.role));
        output.push_str(&format!(
            "{} {} ({:.2})\n",
            "Reason:".cyan().bold(),
            result.reason,
            result.confidence
        ));

        let meta = &result.metadata;
        output.push_str(&format!(
            "{} {} candidate(s){}{}{}\n",
            "Considered:".dimmed(),
            meta.candidates_considered,
            if meta.canary_active { ", canary" } else { "" },
            if meta.performance_ranked { ", ranked" } else { "" },
            if meta.fallback_used { ", fallback" } else { "" },
        ));

        output
    }

    /// Format a verification outcome
    pub fn format_verification(outcome: &VerificationOutcome) -> String {
        let mut output = String::new();

        output.push_str(&Self::header(&format!("Verification: {}", outcome.operation)));
        output.push('\n');

        // Verdict
        let verdict = if outcome.success {
            "ACCEPTED".green().bold()
        } else {
            "REJECTED".red().bold()
        };
        output.push_str(&format!("\n{} {}\n", "Verdict:".cyan().bold(), verdict));
        if let Some(reason) = outcome.reason_message() {
            output.push_str(&format!("{} {}\n", "Reason:".cyan().bold(), reason));
        }

        let meta = &outcome.metadata;
        output.push_str(&format!(
            "{} {:.2} (threshold {:.2}, consensus: {})\n",
            "Agreement:".cyan().bold(),
            meta.agreement_score,
            meta.agreement_threshold,
            if outcome.consensus { "yes" } else { "no" }
        ));
        if meta.quorum_required {
            output.push_str(&format!(
                "{} {}/{} successful\n",
                "Quorum:".cyan().bold(),
                meta.successful_members,
                meta.quorum_size
            ));
        }

        // Panel
        if !outcome.results.is_empty() {
            output.push_str(&Self::section_header("Panel"));
            for member in &outcome.results {
                if member.success {
                    output.push_str(&format!(
                        "  {} {} {}\n",
                        "v".green(),
                        member.model_id,
                        format!("({}ms)", member.execution_time_ms).dimmed()
                    ));
                } else {
                    output.push_str(&format!(
                        "  {} {} {}\n",
                        "x".red(),
                        member.model_id,
                        member.error.as_deref().unwrap_or("Unknown").red()
                    ));
                }
            }
        }

        // Safety checks
        if !outcome.safety_checks.is_empty() {
            output.push_str(&Self::section_header("Safety Checks"));
            for check in &outcome.safety_checks {
                let mark = if check.passed {
                    "pass".green()
                } else {
                    match check.severity {
                        Severity::Critical => "FAIL".red().bold(),
                        Severity::High => "fail".red(),
                        _ => "warn".yellow(),
                    }
                };
                output.push_str(&format!(
                    "  [{}] {:<22} {}\n",
                    mark, check.name, check.message
                ));
            }
        }

        if !meta.destructive_markers.is_empty() {
            output.push_str(&format!(
                "\n{} {}\n",
                "Destructive markers:".yellow().bold(),
                meta.destructive_markers.join(", ")
            ));
        }

        // Accepted payload
        if let Some(result) = &outcome.final_result {
            output.push_str(&Self::section_header("Result"));
            let pretty = serde_json::to_string_pretty(result).unwrap_or_default();
            output.push_str(&Self::indent(&pretty, "  "));
            output.push('\n');
        }

        output.push_str(&Self::footer());
        output
    }

    /// Format configuration sources and validation issues
    pub fn format_config_report(sources: &[SourceStatus], issues: &[ConfigIssue]) -> String {
        let mut output = String::from("Configuration sources (in priority order):\n");

        for source in sources {
            let mark = if source.found { "FOUND" } else { "     " };
            output.push_str(&format!(
                "  [{}] {:<9} {}\n",
                mark,
                format!("{}:", source.label),
                source.location
            ));
        }

        if issues.is_empty() {
            output.push_str(&format!("\n{}\n", "No configuration issues.".green()));
        } else {
            output.push_str(&format!("\n{}\n", "Issues:".cyan().bold()));
            for issue in issues {
                let label = if issue.is_error() {
                    "error".red().bold()
                } else {
                    "warning".yellow().bold()
                };
                output.push_str(&format!("  {}: {}\n", label, issue.message));
            }
        }

        output
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_selection(&self, outcome: &SelectionOutcome) -> String {
        Self::format_selection(outcome)
    }

    fn format_verification(&self, outcome: &VerificationOutcome) -> String {
        Self::format_verification(outcome)
    }

    fn format_config_report(&self, sources: &[SourceStatus], issues: &[ConfigIssue]) -> String {
        Self::format_config_report(sources, issues)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ensemble_domain::{
        ModelDescriptor, ModelRole, NotFoundReason, OperationKind, PanelMemberResult,
        RejectionReason, SelectionReason, VerificationMetadata,
    };
    use serde_json::json;

    fn plain() {
        colored::control::set_override(false);
    }

    #[test]
    fn test_format_selected() {
        plain();
        let result = SelectionResult::new(
            ModelDescriptor::new("a", "Model A", ModelRole::Validator),
            SelectionReason::Stable,
            0.8,
        );
        let text = ConsoleFormatter::format_selection(&SelectionOutcome::Selected(result));
        assert!(text.contains("Model A (a)"));
        assert!(text.contains("stable (0.80)"));
    }

    #[test]
    fn test_format_not_found() {
        plain();
        let text = ConsoleFormatter::format_selection(&SelectionOutcome::not_found(
            NotFoundReason::NoModelsForRole,
        ));
        assert!(text.contains("no models registered for role"));
    }

    #[test]
    fn test_format_rejected_verification() {
        plain();
        let outcome = VerificationOutcome::rejected(
            OperationKind::Migrate,
            RejectionReason::InsufficientAgreement {
                score: 0.0,
                threshold: 0.7,
            },
            vec![
                PanelMemberResult::success("a", "A", json!({"x": 1}), 12),
                PanelMemberResult::failure("b", "B", "rate limited", 3),
            ],
            Vec::new(),
            VerificationMetadata::default(),
        );
        let text = ConsoleFormatter::format_verification(&outcome);
        assert!(text.contains("REJECTED"));
        assert!(text.contains("insufficient agreement: 0.00 < 0.70"));
        assert!(text.contains("rate limited"));
        assert!(!text.contains("Result"));
    }

    #[test]
    fn test_format_config_report() {
        plain();
        let sources = vec![SourceStatus {
            label: "Project",
            location: "./ensemble.toml".to_string(),
            found: true,
        }];
        let text = ConsoleFormatter::format_config_report(&sources, &[]);
        assert!(text.contains("[FOUND] Project:"));
        assert!(text.contains("No configuration issues."));
    }
}
