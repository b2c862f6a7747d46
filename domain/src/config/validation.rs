//! Configuration issues detected at load time.
//!
//! Validation never aborts on the first problem: every issue is collected and
//! returned with a severity so the caller can decide whether to continue.

/// Severity level of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueSeverity {
    /// Fatal: the configuration cannot work at all.
    Error,
    /// Non-fatal: the configuration works but may not behave as expected.
    Warning,
}

/// Identifies a specific configuration issue.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigIssueCode {
    /// A numeric field is outside its allowed range.
    OutOfRange { field: String, value: String },
    /// A string field does not name a known enum value.
    InvalidEnumValue {
        field: String,
        value: String,
        valid_values: Vec<String>,
    },
    /// Two registry entries share the same model id.
    DuplicateModelId { id: String },
    /// A registry entry cannot be routed to.
    InvalidModel { id: String },
}

/// A detected issue in the configuration.
#[derive(Debug, Clone)]
pub struct ConfigIssue {
    pub severity: IssueSeverity,
    pub code: ConfigIssueCode,
    pub message: String,
}

impl ConfigIssue {
    pub fn error(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: IssueSeverity::Error,
            code,
            message: message.into(),
        }
    }

    pub fn warning(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: IssueSeverity::Warning,
            code,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == IssueSeverity::Error
    }
}

/// Check whether any issues are errors (i.e. fatal).
pub fn has_errors(issues: &[ConfigIssue]) -> bool {
    issues.iter().any(ConfigIssue::is_error)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_errors() {
        let warning = ConfigIssue::warning(
            ConfigIssueCode::InvalidEnumValue {
                field: "verification.similarity".to_string(),
                value: "cosine".to_string(),
                valid_values: vec!["length_ratio".to_string()],
            },
            "unknown similarity",
        );
        assert!(!has_errors(std::slice::from_ref(&warning)));

        let error = ConfigIssue::error(
            ConfigIssueCode::OutOfRange {
                field: "canary.percentage".to_string(),
                value: "140".to_string(),
            },
            "percentage must be 0..=100",
        );
        assert!(has_errors(&[warning, error]));
    }
}
