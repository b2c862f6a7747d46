//! Model registry port
//!
//! Defines how the application layer reads the catalog of model backends.

use async_trait::async_trait;
use ensemble_domain::{ModelDescriptor, ModelRole};
use thiserror::Error;

/// Errors that can occur while reading the registry
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Registry unavailable: {0}")]
    Unavailable(String),

    #[error("Registry error: {0}")]
    Other(String),
}

/// Catalog of model backends, indexed by role
///
/// Implementations return a snapshot; the selector never mutates it and
/// treats any staleness as an external concern.
#[async_trait]
pub trait ModelRegistry: Send + Sync {
    /// All models registered for `role`, in registry order
    async fn list_by_role(&self, role: ModelRole) -> Result<Vec<ModelDescriptor>, RegistryError>;
}
