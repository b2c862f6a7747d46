//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod audit_sink;
pub mod metrics_source;
pub mod model_registry;
pub mod progress;
pub mod task_executor;
