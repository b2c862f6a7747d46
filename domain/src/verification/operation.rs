//! Operation kinds that can be verified by an ensemble

use crate::core::error::DomainError;
use crate::model::ModelRole;
use serde::{Deserialize, Serialize};

/// Kind of operation being verified
///
/// `Migrate` and `Optimize` change live data or structures and are treated as
/// destructive: they require a quorum by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    Design,
    Migrate,
    Optimize,
    Validate,
}

impl OperationKind {
    pub const ALL: [OperationKind; 4] = [
        OperationKind::Design,
        OperationKind::Migrate,
        OperationKind::Optimize,
        OperationKind::Validate,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Design => "design",
            OperationKind::Migrate => "migrate",
            OperationKind::Optimize => "optimize",
            OperationKind::Validate => "validate",
        }
    }

    /// Whether this operation belongs to the destructive class
    pub fn is_destructive(&self) -> bool {
        matches!(self, OperationKind::Migrate | OperationKind::Optimize)
    }

    /// Role whose models serve this operation
    pub fn role(&self) -> ModelRole {
        match self {
            OperationKind::Design => ModelRole::SchemaDesigner,
            OperationKind::Migrate => ModelRole::MigrationPlanner,
            OperationKind::Optimize => ModelRole::QueryOptimizer,
            OperationKind::Validate => ModelRole::Validator,
        }
    }
}

impl std::fmt::Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for OperationKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        OperationKind::ALL
            .into_iter()
            .find(|op| op.as_str() == normalized)
            .ok_or_else(|| DomainError::UnknownOperation(s.to_string()))
    }
}
