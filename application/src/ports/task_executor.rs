//! Task executor port
//!
//! Executes one operation against one model backend. Backends are opaque:
//! they may fail, hang or return arbitrary JSON.

use async_trait::async_trait;
use ensemble_domain::{ModelDescriptor, OperationKind};
use serde_json::Value;
use thiserror::Error;

/// Errors that can occur while executing a task on a backend
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExecutionError {
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Other error: {0}")]
    Other(String),
}

/// Runs operations on model backends
///
/// Called concurrently for every panel member; implementations must not
/// share mutable state across calls.
#[async_trait]
pub trait TaskExecutor: Send + Sync {
    /// Execute `operation` with `inputs` on `model` and return its payload
    async fn run(
        &self,
        model: &ModelDescriptor,
        operation: OperationKind,
        inputs: &Value,
    ) -> Result<Value, ExecutionError>;
}
