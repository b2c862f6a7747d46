//! Selection input

use crate::model::ModelRole;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Input to a single model selection
///
/// `user_id` and `project_id` are used only as hashing inputs for canary
/// bucketing; they never influence ranking.
///
/// # Example
///
/// ```
/// use ensemble_domain::{ModelRole, SelectionContext};
///
/// let context = SelectionContext::new(ModelRole::MigrationPlanner)
///     .critical()
///     .with_user("user-42")
///     .with_capability("postgres");
///
/// assert!(context.is_critical);
/// assert_eq!(context.user_id.as_deref(), Some("user-42"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionContext {
    pub role: ModelRole,
    #[serde(default)]
    pub is_critical: bool,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub required_capabilities: BTreeSet<String>,
    /// Model ids removed from consideration (used while assembling panels)
    #[serde(default)]
    pub excluded_models: BTreeSet<String>,
}

impl SelectionContext {
    pub fn new(role: ModelRole) -> Self {
        Self {
            role,
            is_critical: false,
            user_id: None,
            project_id: None,
            required_capabilities: BTreeSet::new(),
            excluded_models: BTreeSet::new(),
        }
    }

    pub fn critical(mut self) -> Self {
        self.is_critical = true;
        self
    }

    pub fn with_critical(mut self, is_critical: bool) -> Self {
        self.is_critical = is_critical;
        self
    }

    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn with_project(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }

    pub fn with_capability(mut self, capability: impl Into<String>) -> Self {
        self.required_capabilities.insert(capability.into());
        self
    }

    pub fn with_capabilities<I, S>(mut self, capabilities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required_capabilities
            .extend(capabilities.into_iter().map(Into::into));
        self
    }

    pub fn excluding(mut self, model_id: impl Into<String>) -> Self {
        self.excluded_models.insert(model_id.into());
        self
    }

    pub fn is_excluded(&self, model_id: &str) -> bool {
        self.excluded_models.contains(model_id)
    }
}
