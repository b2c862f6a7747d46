//! In-memory metrics source.
//!
//! Performance windows are produced by an external pipeline. This adapter
//! serves a snapshot of them, typically loaded from a JSON export:
//!
//! ```json
//! {
//!   "claude-sonnet": {
//!     "7d":  { "success_rate": 0.94, "avg_confidence": 0.88, "correction_rate": 0.05, "total_runs": 42 },
//!     "30d": { "success_rate": 0.91, "avg_confidence": 0.85, "correction_rate": 0.07, "total_runs": 160 }
//!   }
//! }
//! ```

use async_trait::async_trait;
use ensemble_application::ports::metrics_source::{MetricsError, MetricsSource};
use ensemble_domain::{MetricsWindow, PerformanceWindow};
use std::collections::HashMap;
use std::sync::RwLock;

type WindowsByModel = HashMap<String, HashMap<MetricsWindow, PerformanceWindow>>;

/// Metrics source backed by a map of model id to windows.
#[derive(Default)]
pub struct InMemoryMetrics {
    windows: RwLock<WindowsByModel>,
}

impl InMemoryMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON export keyed by model id, then window (`"7d"`, `"30d"`).
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        let windows: WindowsByModel = serde_json::from_str(json)?;
        Ok(Self {
            windows: RwLock::new(windows),
        })
    }

    pub fn with_window(
        self,
        model_id: impl Into<String>,
        window: MetricsWindow,
        performance: PerformanceWindow,
    ) -> Self {
        if let Ok(mut windows) = self.windows.write() {
            windows
                .entry(model_id.into())
                .or_default()
                .insert(window, performance);
        }
        self
    }

    /// Store the latest window for a model, replacing any previous one.
    pub fn insert(
        &self,
        model_id: impl Into<String>,
        window: MetricsWindow,
        performance: PerformanceWindow,
    ) -> Result<(), MetricsError> {
        let mut windows = self
            .windows
            .write()
            .map_err(|_| MetricsError::Unavailable("metrics lock poisoned".to_string()))?;
        windows
            .entry(model_id.into())
            .or_default()
            .insert(window, performance);
        Ok(())
    }

    /// Number of models with at least one window.
    pub fn model_count(&self) -> usize {
        self.windows.read().map(|w| w.len()).unwrap_or(0)
    }
}

#[async_trait]
impl MetricsSource for InMemoryMetrics {
    async fn get_window(
        &self,
        model_id: &str,
        window: MetricsWindow,
    ) -> Result<Option<PerformanceWindow>, MetricsError> {
        let windows = self
            .windows
            .read()
            .map_err(|_| MetricsError::Unavailable("metrics lock poisoned".to_string()))?;
        Ok(windows
            .get(model_id)
            .and_then(|by_window| by_window.get(&window))
            .cloned())
    }
}
