//! Canary routing configuration from TOML (`[canary]` section)

use ensemble_domain::{CanaryConfig, ConfigIssue, ConfigIssueCode, ModelRole};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Canary routing configuration
///
/// # Example
///
/// ```toml
/// [canary]
/// enabled = true
/// percentage = 10                       # share of (user, project, role) triples
/// critical_only = false                 # only route critical tasks to canaries
/// excluded_roles = ["migration_planner"]
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileCanaryConfig {
    pub enabled: bool,
    /// Read wider than `u8` so out-of-range values are reported, not rejected by serde
    pub percentage: u32,
    pub critical_only: bool,
    pub excluded_roles: Vec<String>,
}

impl Default for FileCanaryConfig {
    fn default() -> Self {
        let defaults = CanaryConfig::default();
        Self {
            enabled: defaults.enabled,
            percentage: u32::from(defaults.percentage),
            critical_only: defaults.critical_only,
            excluded_roles: Vec::new(),
        }
    }
}

impl FileCanaryConfig {
    /// Parse excluded role names, collecting issues for unknown ones.
    pub fn parse_excluded_roles(&self) -> (BTreeSet<ModelRole>, Vec<ConfigIssue>) {
        let mut roles = BTreeSet::new();
        let mut issues = Vec::new();

        for name in &self.excluded_roles {
            match name.parse::<ModelRole>() {
                Ok(role) => {
                    roles.insert(role);
                }
                Err(_) => issues.push(ConfigIssue::warning(
                    ConfigIssueCode::InvalidEnumValue {
                        field: "canary.excluded_roles".to_string(),
                        value: name.clone(),
                        valid_values: ModelRole::ALL
                            .iter()
                            .map(|r| r.as_str().to_string())
                            .collect(),
                    },
                    format!("canary.excluded_roles: unknown role '{}', ignoring", name),
                )),
            }
        }

        (roles, issues)
    }

    /// Validate the percentage range.
    pub fn validate_percentage(&self) -> Option<ConfigIssue> {
        (self.percentage > 100).then(|| {
            ConfigIssue::error(
                ConfigIssueCode::OutOfRange {
                    field: "canary.percentage".to_string(),
                    value: self.percentage.to_string(),
                },
                format!(
                    "canary.percentage: {} is outside 0..=100",
                    self.percentage
                ),
            )
        })
    }

    /// Convert to the domain [`CanaryConfig`]. Percentages above 100 are capped.
    pub fn to_canary_config(&self) -> CanaryConfig {
        let percentage = u8::try_from(self.percentage.min(100)).unwrap_or(100);
        CanaryConfig {
            enabled: self.enabled,
            percentage,
            critical_only: self.critical_only,
            excluded_roles: self.parse_excluded_roles().0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::file_config::FileConfig;

    #[test]
    fn test_canary_config_default() {
        let config = FileCanaryConfig::default();
        assert!(!config.enabled);
        assert_eq!(config.percentage, 10);
        assert!(config.excluded_roles.is_empty());
    }

    #[test]
    fn test_canary_config_deserialize() {
        let toml_str = r#"
[canary]
enabled = true
percentage = 25
critical_only = true
excluded_roles = ["migration_planner", "reviewer"]
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        let canary = config.canary.to_canary_config();

        assert!(canary.enabled);
        assert_eq!(canary.percentage, 25);
        assert!(canary.critical_only);
        assert!(canary.excluded_roles.contains(&ModelRole::MigrationPlanner));
        assert!(canary.excluded_roles.contains(&ModelRole::Reviewer));
    }

    #[test]
    fn test_unknown_excluded_role_is_warning() {
        let config = FileCanaryConfig {
            excluded_roles: vec!["validator".to_string(), "poet".to_string()],
            ..Default::default()
        };
        let (roles, issues) = config.parse_excluded_roles();

        assert_eq!(roles.len(), 1);
        assert_eq!(issues.len(), 1);
        assert!(!issues[0].is_error());
        assert!(issues[0].message.contains("poet"));
    }

    #[test]
    fn test_percentage_out_of_range() {
        let config = FileCanaryConfig {
            percentage: 140,
            ..Default::default()
        };
        let issue = config.validate_percentage().unwrap();
        assert!(issue.is_error());
        assert_eq!(config.to_canary_config().percentage, 100);

        assert!(FileCanaryConfig::default().validate_percentage().is_none());
    }
}
