//! Model descriptors: the registry's catalog entries.

use super::role::ModelRole;
use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Lifecycle status of a model backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelStatus {
    /// Fully trusted, receives regular traffic
    #[default]
    Stable,
    /// Under experiment, receives a deterministic fraction of traffic
    Canary,
}

impl ModelStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelStatus::Stable => "stable",
            ModelStatus::Canary => "canary",
        }
    }

    pub fn is_canary(&self) -> bool {
        matches!(self, ModelStatus::Canary)
    }
}

impl std::fmt::Display for ModelStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ModelStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "stable" => Ok(ModelStatus::Stable),
            "canary" => Ok(ModelStatus::Canary),
            _ => Err(DomainError::UnknownStatus(s.to_string())),
        }
    }
}

/// A model backend as listed in the registry
///
/// # Example
///
/// ```
/// use ensemble_domain::{ModelDescriptor, ModelRole, ModelStatus};
///
/// let model = ModelDescriptor::new("claude-sonnet", "Claude Sonnet", ModelRole::MigrationPlanner)
///     .with_status(ModelStatus::Canary)
///     .with_capability("postgres");
///
/// assert!(model.status.is_canary());
/// assert!(model.has_capability("postgres"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelDescriptor {
    /// Stable identifier used by executors and metrics
    pub id: String,
    /// Human-readable name
    pub name: String,
    /// Task category this model serves
    pub role: ModelRole,
    /// Lifecycle status
    #[serde(default)]
    pub status: ModelStatus,
    /// Capability tags
    #[serde(default)]
    pub capabilities: BTreeSet<String>,
}

impl ModelDescriptor {
    pub fn new(id: impl Into<String>, name: impl Into<String>, role: ModelRole) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            role,
            status: ModelStatus::Stable,
            capabilities: BTreeSet::new(),
        }
    }

    pub fn with_status(mut self, status: ModelStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_capability(mut self, capability: impl Into<String>) -> Self {
        self.capabilities.insert(capability.into());
        self
    }

    pub fn with_capabilities<I, S>(mut self, capabilities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.capabilities
            .extend(capabilities.into_iter().map(Into::into));
        self
    }

    pub fn has_capability(&self, capability: &str) -> bool {
        self.capabilities.contains(capability)
    }

    /// Whether this model's capabilities are a superset of `required`
    pub fn satisfies(&self, required: &BTreeSet<String>) -> bool {
        required.is_subset(&self.capabilities)
    }

    /// Reject descriptors that cannot be routed to
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.id.trim().is_empty() {
            return Err(DomainError::InvalidDescriptor(format!(
                "model '{}' has an empty id",
                self.name
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caps(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_default_status_is_stable() {
        let model = ModelDescriptor::new("m", "M", ModelRole::Validator);
        assert_eq!(model.status, ModelStatus::Stable);
    }

    #[test]
    fn test_satisfies_superset() {
        let model = ModelDescriptor::new("m", "M", ModelRole::Validator)
            .with_capabilities(["sql", "postgres", "mysql"]);

        assert!(model.satisfies(&caps(&[])));
        assert!(model.satisfies(&caps(&["sql", "postgres"])));
        assert!(!model.satisfies(&caps(&["sql", "sqlite"])));
    }

    #[test]
    fn test_status_parse() {
        assert_eq!("Canary".parse::<ModelStatus>().unwrap(), ModelStatus::Canary);
        assert!("beta".parse::<ModelStatus>().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_id() {
        let model = ModelDescriptor::new("  ", "Nameless", ModelRole::Reviewer);
        assert!(model.validate().is_err());
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let json = r#"{"id": "gpt", "name": "GPT", "role": "schema_designer"}"#;
        let model: ModelDescriptor = serde_json::from_str(json).unwrap();
        assert_eq!(model.role, ModelRole::SchemaDesigner);
        assert_eq!(model.status, ModelStatus::Stable);
        assert!(model.capabilities.is_empty());
    }
}
