//! In-memory model registry.
//!
//! Holds the catalog loaded from `[[models]]` entries. The catalog can be
//! swapped at runtime with [`InMemoryRegistry::replace`]; readers always see
//! a complete snapshot, either the old one or the new one.

use async_trait::async_trait;
use ensemble_application::ports::model_registry::{ModelRegistry, RegistryError};
use ensemble_domain::{ModelDescriptor, ModelRole};
use std::sync::RwLock;
use tracing::debug;

/// Registry backed by a vector in registry order.
pub struct InMemoryRegistry {
    models: RwLock<Vec<ModelDescriptor>>,
}

impl InMemoryRegistry {
    pub fn new(models: Vec<ModelDescriptor>) -> Self {
        Self {
            models: RwLock::new(models),
        }
    }

    /// Swap in a new catalog.
    pub fn replace(&self, models: Vec<ModelDescriptor>) -> Result<(), RegistryError> {
        let mut guard = self
            .models
            .write()
            .map_err(|_| RegistryError::Unavailable("registry lock poisoned".to_string()))?;
        debug!("Registry refreshed: {} -> {} models", guard.len(), models.len());
        *guard = models;
        Ok(())
    }

    /// Snapshot of every registered model.
    pub fn all(&self) -> Result<Vec<ModelDescriptor>, RegistryError> {
        self.models
            .read()
            .map(|models| models.clone())
            .map_err(|_| RegistryError::Unavailable("registry lock poisoned".to_string()))
    }
}

#[async_trait]
impl ModelRegistry for InMemoryRegistry {
    async fn list_by_role(&self, role: ModelRole) -> Result<Vec<ModelDescriptor>, RegistryError> {
        let models = self
            .models
            .read()
            .map_err(|_| RegistryError::Unavailable("registry lock poisoned".to_string()))?;
        Ok(models.iter().filter(|m| m.role == role).cloned().collect())
    }
}
