//! Per-member execution results

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Outcome of running the task on one panel member
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelMemberResult {
    pub model_id: String,
    pub model_name: String,
    pub success: bool,
    /// Opaque result payload (only on success)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    pub execution_time_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PanelMemberResult {
    pub fn success(
        model_id: impl Into<String>,
        model_name: impl Into<String>,
        result: Value,
        execution_time_ms: u64,
    ) -> Self {
        Self {
            model_id: model_id.into(),
            model_name: model_name.into(),
            success: true,
            result: Some(result),
            execution_time_ms,
            error: None,
        }
    }

    pub fn failure(
        model_id: impl Into<String>,
        model_name: impl Into<String>,
        error: impl Into<String>,
        execution_time_ms: u64,
    ) -> Self {
        Self {
            model_id: model_id.into(),
            model_name: model_name.into(),
            success: false,
            result: None,
            execution_time_ms,
            error: Some(error.into()),
        }
    }

    /// The payload, if this member succeeded
    pub fn output(&self) -> Option<&Value> {
        if self.success {
            self.result.as_ref()
        } else {
            None
        }
    }
}

/// Successful outputs in panel order
pub fn successful_outputs(results: &[PanelMemberResult]) -> Vec<&Value> {
    results.iter().filter_map(PanelMemberResult::output).collect()
}
