//! Model registry entries from TOML (`[[models]]` array)

use ensemble_domain::{ConfigIssue, ConfigIssueCode, ModelDescriptor, ModelRole, ModelStatus};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One model backend in the registry
///
/// # Example
///
/// ```toml
/// [[models]]
/// id = "claude-sonnet"
/// name = "Claude Sonnet"          # defaults to the id
/// role = "migration_planner"
/// status = "stable"               # or "canary"
/// capabilities = ["sql", "postgres"]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileModelEntry {
    pub id: String,
    pub name: Option<String>,
    pub role: String,
    pub status: Option<String>,
    pub capabilities: Vec<String>,
}

impl FileModelEntry {
    /// Parse into a descriptor; `index` locates the entry in messages.
    fn parse(&self, index: usize) -> Result<ModelDescriptor, ConfigIssue> {
        let id = self.id.trim();
        if id.is_empty() {
            return Err(ConfigIssue::error(
                ConfigIssueCode::InvalidModel {
                    id: format!("models[{}]", index),
                },
                format!("models[{}]: id cannot be empty", index),
            ));
        }

        let role: ModelRole = self.role.parse().map_err(|_| {
            ConfigIssue::error(
                ConfigIssueCode::InvalidEnumValue {
                    field: format!("models[{}].role", index),
                    value: self.role.clone(),
                    valid_values: ModelRole::ALL
                        .iter()
                        .map(|r| r.as_str().to_string())
                        .collect(),
                },
                format!("models[{}] ({}): unknown role '{}'", index, id, self.role),
            )
        })?;

        let status: ModelStatus = match self.status.as_deref() {
            None => ModelStatus::default(),
            Some(raw) => raw.parse().map_err(|_| {
                ConfigIssue::error(
                    ConfigIssueCode::InvalidEnumValue {
                        field: format!("models[{}].status", index),
                        value: raw.to_string(),
                        valid_values: vec!["stable".to_string(), "canary".to_string()],
                    },
                    format!("models[{}] ({}): unknown status '{}'", index, id, raw),
                )
            })?,
        };

        let name = self
            .name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(id);

        Ok(ModelDescriptor::new(id, name, role)
            .with_status(status)
            .with_capabilities(self.capabilities.iter().map(|c| c.trim().to_lowercase())))
    }
}

/// Parse every registry entry, collecting issues instead of failing early.
///
/// Invalid entries and later duplicates are skipped; the first entry for an
/// id wins.
pub fn parse_models(entries: &[FileModelEntry]) -> (Vec<ModelDescriptor>, Vec<ConfigIssue>) {
    let mut models = Vec::new();
    let mut issues = Vec::new();
    let mut seen = HashSet::new();

    for (index, entry) in entries.iter().enumerate() {
        match entry.parse(index) {
            Ok(model) => {
                if seen.insert(model.id.clone()) {
                    models.push(model);
                } else {
                    issues.push(ConfigIssue::error(
                        ConfigIssueCode::DuplicateModelId {
                            id: model.id.clone(),
                        },
                        format!("models[{}]: duplicate model id '{}'", index, model.id),
                    ));
                }
            }
            Err(issue) => issues.push(issue),
        }
    }

    (models, issues)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::file_config::FileConfig;

    #[test]
    fn test_models_deserialize() {
        let toml_str = r#"
[[models]]
id = "claude-sonnet"
name = "Claude Sonnet"
role = "migration_planner"
capabilities = ["SQL", "postgres"]

[[models]]
id = "gpt-next"
role = "migration-planner"
status = "canary"
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        let (models, issues) = parse_models(&config.models);

        assert!(issues.is_empty());
        assert_eq!(models.len(), 2);
        assert_eq!(models[0].name, "Claude Sonnet");
        assert_eq!(models[0].status, ModelStatus::Stable);
        assert!(models[0].has_capability("sql"));
        assert_eq!(models[1].name, "gpt-next");
        assert_eq!(models[1].role, ModelRole::MigrationPlanner);
        assert!(models[1].status.is_canary());
    }

    #[test]
    fn test_invalid_entries_are_reported() {
        let entries = vec![
            FileModelEntry {
                id: " ".to_string(),
                role: "validator".to_string(),
                ..Default::default()
            },
            FileModelEntry {
                id: "a".to_string(),
                role: "poet".to_string(),
                ..Default::default()
            },
            FileModelEntry {
                id: "b".to_string(),
                role: "validator".to_string(),
                status: Some("beta".to_string()),
                ..Default::default()
            },
        ];
        let (models, issues) = parse_models(&entries);

        assert!(models.is_empty());
        assert_eq!(issues.len(), 3);
        assert!(issues.iter().all(ConfigIssue::is_error));
    }

    #[test]
    fn test_duplicate_ids() {
        let entry = FileModelEntry {
            id: "a".to_string(),
            role: "reviewer".to_string(),
            ..Default::default()
        };
        let (models, issues) = parse_models(&[entry.clone(), entry]);

        assert_eq!(models.len(), 1);
        assert_eq!(
            issues[0].code,
            ConfigIssueCode::DuplicateModelId {
                id: "a".to_string()
            }
        );
    }
}
