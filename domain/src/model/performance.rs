//! Historical performance aggregates for a model.
//!
//! Windows are produced by an external metrics pipeline and are read-only
//! here. Only the latest window per (model, length) is ever consulted.

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Length of an aggregation window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MetricsWindow {
    #[serde(rename = "7d")]
    SevenDays,
    #[serde(rename = "30d")]
    ThirtyDays,
}

impl MetricsWindow {
    /// Windows in lookup order: shorter (fresher) first
    pub const PREFERENCE: [MetricsWindow; 2] = [MetricsWindow::SevenDays, MetricsWindow::ThirtyDays];

    pub fn as_str(&self) -> &'static str {
        match self {
            MetricsWindow::SevenDays => "7d",
            MetricsWindow::ThirtyDays => "30d",
        }
    }
}

impl std::fmt::Display for MetricsWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for MetricsWindow {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "7d" => Ok(MetricsWindow::SevenDays),
            "30d" => Ok(MetricsWindow::ThirtyDays),
            other => Err(DomainError::UnknownWindow(other.to_string())),
        }
    }
}

/// Per (model, window) aggregate of task outcomes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerformanceWindow {
    /// Fraction of runs that succeeded, in [0, 1]
    pub success_rate: f64,
    /// Mean self-reported confidence, in [0, 1]
    pub avg_confidence: f64,
    /// Fraction of runs that needed a human correction, in [0, 1]
    pub correction_rate: f64,
    /// Mean cost per run in currency units
    pub cost_per_run: f64,
    /// Mean time from failure to fix, in milliseconds
    pub mean_time_to_fix_ms: f64,
    /// Number of runs aggregated into this window
    pub total_runs: u64,
}

impl Default for PerformanceWindow {
    fn default() -> Self {
        Self {
            success_rate: 0.0,
            avg_confidence: 0.0,
            correction_rate: 0.0,
            cost_per_run: 0.0,
            mean_time_to_fix_ms: 0.0,
            total_runs: 0,
        }
    }
}

impl PerformanceWindow {
    pub fn new(success_rate: f64, avg_confidence: f64, correction_rate: f64) -> Self {
        Self {
            success_rate,
            avg_confidence,
            correction_rate,
            ..Default::default()
        }
    }

    pub fn with_cost(mut self, cost_per_run: f64) -> Self {
        self.cost_per_run = cost_per_run;
        self
    }

    pub fn with_time_to_fix_ms(mut self, mean_time_to_fix_ms: f64) -> Self {
        self.mean_time_to_fix_ms = mean_time_to_fix_ms;
        self
    }

    pub fn with_total_runs(mut self, total_runs: u64) -> Self {
        self.total_runs = total_runs;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_preference_order() {
        assert_eq!(MetricsWindow::PREFERENCE[0], MetricsWindow::SevenDays);
        assert_eq!(MetricsWindow::PREFERENCE[1], MetricsWindow::ThirtyDays);
    }

    #[test]
    fn test_window_parse() {
        assert_eq!("30d".parse::<MetricsWindow>().unwrap(), MetricsWindow::ThirtyDays);
        assert!("1d".parse::<MetricsWindow>().is_err());
    }

    #[test]
    fn test_window_serde_uses_short_names() {
        let json = serde_json::to_string(&MetricsWindow::SevenDays).unwrap();
        assert_eq!(json, "\"7d\"");
    }

    #[test]
    fn test_builder() {
        let window = PerformanceWindow::new(0.9, 0.8, 0.1)
            .with_cost(0.02)
            .with_time_to_fix_ms(1500.0)
            .with_total_runs(42);

        assert_eq!(window.success_rate, 0.9);
        assert_eq!(window.cost_per_run, 0.02);
        assert_eq!(window.total_runs, 42);
    }
}
