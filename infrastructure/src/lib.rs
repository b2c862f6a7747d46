//! Infrastructure layer for model-ensemble
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod audit;
pub mod config;
pub mod executor;
pub mod metrics;
pub mod registry;

// Re-export commonly used types
pub use audit::{JsonlAuditSink, TracingAuditSink};
pub use config::{
    ConfigError, ConfigLoader, ConfigSource, ConfigSourceKind, FileAuditConfig,
    FileCanaryConfig, FileConfig, FileModelEntry, FileVerificationConfig,
};
pub use executor::{FixtureExecutor, FixtureResponse};
pub use metrics::InMemoryMetrics;
pub use registry::InMemoryRegistry;
