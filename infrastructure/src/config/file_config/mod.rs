//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted into domain and application
//! types after validation.

mod audit;
mod canary;
mod models;
mod verification;

pub use audit::FileAuditConfig;
pub use canary::FileCanaryConfig;
pub use models::{FileModelEntry, parse_models};
pub use verification::FileVerificationConfig;

use ensemble_application::EnsembleConfig;
use ensemble_domain::{ConfigIssue, ModelDescriptor};
use serde::{Deserialize, Serialize};

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Canary routing settings
    pub canary: FileCanaryConfig,
    /// Panel and consensus settings
    pub verification: FileVerificationConfig,
    /// Audit trail settings
    pub audit: FileAuditConfig,
    /// Model registry entries
    pub models: Vec<FileModelEntry>,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    ///
    /// This is the single entry point for config validation. It checks:
    /// 1. Canary percentage range and excluded role names
    /// 2. Quorum size, agreement threshold, panel size and similarity name
    /// 3. Registry entries (ids, roles, statuses, duplicates)
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        issues.extend(self.canary.validate_percentage());
        issues.extend(self.canary.parse_excluded_roles().1);

        issues.extend(self.verification.validate());

        issues.extend(parse_models(&self.models).1);

        issues
    }

    /// Selector and verifier settings
    pub fn to_ensemble_config(&self) -> EnsembleConfig {
        EnsembleConfig::new(
            self.canary.to_canary_config(),
            self.verification.to_params(),
        )
    }

    /// Valid registry entries; invalid ones are reported by [`validate`](Self::validate)
    pub fn registry_models(&self) -> Vec<ModelDescriptor> {
        parse_models(&self.models).0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ensemble_domain::{ConfigIssueCode, ModelRole, SimilarityKind};

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[canary]
enabled = true
percentage = 20
excluded_roles = ["validator"]

[verification]
quorum_size = 2
agreement_threshold = 0.75
similarity = "structural"

[audit]
log_path = "/tmp/audit.jsonl"

[[models]]
id = "a"
role = "migration_planner"

[[models]]
id = "b"
role = "migration_planner"
status = "canary"
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert!(config.validate().is_empty());

        let ensemble = config.to_ensemble_config();
        assert!(ensemble.canary().enabled);
        assert_eq!(ensemble.canary().percentage, 20);
        assert!(ensemble.canary().excluded_roles.contains(&ModelRole::Validator));
        assert_eq!(ensemble.verification().agreement_threshold, 0.75);
        assert_eq!(ensemble.verification().similarity, SimilarityKind::Structural);
        assert_eq!(config.registry_models().len(), 2);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: FileConfig = toml::from_str("").unwrap();
        assert_eq!(config, FileConfig::default());
        assert!(config.validate().is_empty());
        assert!(config.registry_models().is_empty());
    }

    #[test]
    fn test_validate_collects_all_issues() {
        let toml_str = r#"
[canary]
percentage = 150
excluded_roles = ["poet"]

[verification]
quorum_size = 0
agreement_threshold = -0.1
similarity = "cosine"

[[models]]
id = "a"
role = "validator"

[[models]]
id = "a"
role = "validator"
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        let issues = config.validate();

        let errors = issues.iter().filter(|i| i.is_error()).count();
        let warnings = issues.len() - errors;
        assert_eq!(errors, 4);
        assert_eq!(warnings, 2);
        assert!(
            issues
                .iter()
                .any(|i| matches!(i.code, ConfigIssueCode::DuplicateModelId { .. }))
        );
    }
}
