//! Metrics source port
//!
//! Read-only access to historical per-model performance aggregates.

use async_trait::async_trait;
use ensemble_domain::{MetricsWindow, PerformanceWindow};
use thiserror::Error;

/// Errors that can occur while reading metrics
#[derive(Error, Debug)]
pub enum MetricsError {
    #[error("Metrics unavailable: {0}")]
    Unavailable(String),

    #[error("Metrics error: {0}")]
    Other(String),
}

/// Supplier of per-model performance windows
#[async_trait]
pub trait MetricsSource: Send + Sync {
    /// Latest aggregate for `model_id` over `window`, if one exists
    async fn get_window(
        &self,
        model_id: &str,
        window: MetricsWindow,
    ) -> Result<Option<PerformanceWindow>, MetricsError>;
}

/// Metrics source with no history; every candidate scores neutral
pub struct NoMetrics;

#[async_trait]
impl MetricsSource for NoMetrics {
    async fn get_window(
        &self,
        _model_id: &str,
        _window: MetricsWindow,
    ) -> Result<Option<PerformanceWindow>, MetricsError> {
        Ok(None)
    }
}
