//! Model roles (Value Object)
//!
//! A role is the task category a backend serves. Roles form a closed set so
//! that registries keyed by role stay exhaustive at compile time.

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Task category a model backend serves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelRole {
    /// Designs database schemas
    SchemaDesigner,
    /// Plans and writes schema migrations
    MigrationPlanner,
    /// Rewrites queries and indexes for performance
    QueryOptimizer,
    /// Validates schemas, migrations and queries
    Validator,
    /// Generates application code from a schema
    CodeGenerator,
    /// General-purpose review
    Reviewer,
}

impl ModelRole {
    /// All roles, in declaration order
    pub const ALL: [ModelRole; 6] = [
        ModelRole::SchemaDesigner,
        ModelRole::MigrationPlanner,
        ModelRole::QueryOptimizer,
        ModelRole::Validator,
        ModelRole::CodeGenerator,
        ModelRole::Reviewer,
    ];

    /// Get the snake_case identifier for this role
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelRole::SchemaDesigner => "schema_designer",
            ModelRole::MigrationPlanner => "migration_planner",
            ModelRole::QueryOptimizer => "query_optimizer",
            ModelRole::Validator => "validator",
            ModelRole::CodeGenerator => "code_generator",
            ModelRole::Reviewer => "reviewer",
        }
    }
}

impl std::fmt::Display for ModelRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ModelRole {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        ModelRole::ALL
            .into_iter()
            .find(|role| role.as_str() == normalized)
            .ok_or_else(|| DomainError::UnknownRole(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_roundtrip() {
        for role in ModelRole::ALL {
            let parsed: ModelRole = role.to_string().parse().unwrap();
            assert_eq!(parsed, role);
        }
    }

    #[test]
    fn test_parse_accepts_kebab_case() {
        assert_eq!(
            "migration-planner".parse::<ModelRole>().unwrap(),
            ModelRole::MigrationPlanner
        );
    }

    #[test]
    fn test_parse_unknown_role() {
        let err = "poet".parse::<ModelRole>().unwrap_err();
        assert_eq!(err, DomainError::UnknownRole("poet".to_string()));
    }

    #[test]
    fn test_serde_snake_case() {
        let json = serde_json::to_string(&ModelRole::QueryOptimizer).unwrap();
        assert_eq!(json, "\"query_optimizer\"");
    }
}
