//! Verification input

use super::operation::OperationKind;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;

/// Input to an ensemble verification
///
/// # Example
///
/// ```
/// use ensemble_domain::{OperationKind, VerificationContext};
/// use serde_json::json;
///
/// let context = VerificationContext::new(OperationKind::Migrate, json!({"table": "users"}));
/// assert!(context.requires_quorum());
///
/// let relaxed = VerificationContext::new(OperationKind::Migrate, json!({})).without_quorum();
/// assert!(!relaxed.requires_quorum());
///
/// // Non-destructive operations never require a quorum
/// let design = VerificationContext::new(OperationKind::Design, json!({}));
/// assert!(!design.requires_quorum());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationContext {
    pub operation: OperationKind,
    /// Opaque payload handed to every panel member
    pub inputs: Value,
    /// Caller's request for a quorum (only honored for destructive operations)
    #[serde(default = "default_require_quorum")]
    pub require_quorum: bool,
    /// Required successful members; `None` uses the configured default
    #[serde(default)]
    pub quorum_size: Option<usize>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub required_capabilities: BTreeSet<String>,
}

fn default_require_quorum() -> bool {
    true
}

impl VerificationContext {
    pub fn new(operation: OperationKind, inputs: Value) -> Self {
        Self {
            operation,
            inputs,
            require_quorum: operation.is_destructive(),
            quorum_size: None,
            user_id: None,
            project_id: None,
            required_capabilities: BTreeSet::new(),
        }
    }

    pub fn with_quorum_size(mut self, quorum_size: usize) -> Self {
        self.quorum_size = Some(quorum_size);
        self
    }

    pub fn with_require_quorum(mut self, require_quorum: bool) -> Self {
        self.require_quorum = require_quorum;
        self
    }

    pub fn without_quorum(self) -> Self {
        self.with_require_quorum(false)
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

    /// Whether quorum and agreement gate acceptance
    pub fn requires_quorum(&self) -> bool {
        self.require_quorum && self.operation.is_destructive()
    }

    /// Effective quorum size, never below one
    pub fn effective_quorum_size(&self, default: usize) -> usize {
        self.quorum_size.unwrap_or(default).max(1)
    }
}
