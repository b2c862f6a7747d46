//! Model catalog domain
//!
//! - [`role::ModelRole`] — closed set of task categories
//! - [`descriptor::ModelDescriptor`] — a registry entry (role, status, capabilities)
//! - [`performance::PerformanceWindow`] — historical aggregates read from metrics

pub mod descriptor;
pub mod performance;
pub mod role;

pub use descriptor::{ModelDescriptor, ModelStatus};
pub use performance::{MetricsWindow, PerformanceWindow};
pub use role::ModelRole;
