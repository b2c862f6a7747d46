//! Replay executor for dry runs.
//!
//! Serves canned per-model responses instead of calling a backend, so a
//! verification can be replayed from recorded outputs:
//!
//! ```json
//! {
//!   "claude-sonnet": { "result": { "kind": "migration", "sql": "..." } },
//!   "gpt-next":      { "error": "rate limited" },
//!   "slow-model":    { "result": { "plan": "..." }, "delay_ms": 1500 }
//! }
//! ```

use async_trait::async_trait;
use ensemble_application::ports::task_executor::{ExecutionError, TaskExecutor};
use ensemble_domain::{ModelDescriptor, OperationKind};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

/// Recorded behavior of one model
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct FixtureResponse {
    pub result: Option<Value>,
    pub error: Option<String>,
    pub delay_ms: Option<u64>,
}

impl FixtureResponse {
    pub fn ok(result: Value) -> Self {
        Self {
            result: Some(result),
            ..Default::default()
        }
    }

    pub fn failing(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Default::default()
        }
    }

    pub fn with_delay_ms(mut self, delay_ms: u64) -> Self {
        self.delay_ms = Some(delay_ms);
        self
    }
}

/// Executor that replays [`FixtureResponse`]s keyed by model id
#[derive(Debug, Clone, Default)]
pub struct FixtureExecutor {
    responses: HashMap<String, FixtureResponse>,
}

impl FixtureExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        Ok(Self {
            responses: serde_json::from_str(json)?,
        })
    }

    pub fn with_response(mut self, model_id: impl Into<String>, response: FixtureResponse) -> Self {
        self.responses.insert(model_id.into(), response);
        self
    }

    /// Model ids with a recorded response
    pub fn model_ids(&self) -> impl Iterator<Item = &str> {
        self.responses.keys().map(String::as_str)
    }
}

#[async_trait]
impl TaskExecutor for FixtureExecutor {
    async fn run(
        &self,
        model: &ModelDescriptor,
        operation: OperationKind,
        _inputs: &Value,
    ) -> Result<Value, ExecutionError> {
        let response = self
            .responses
            .get(&model.id)
            .ok_or_else(|| ExecutionError::ModelNotAvailable(model.id.clone()))?;

        debug!("Replaying fixture for {} ({})", model.id, operation);
        if let Some(delay_ms) = response.delay_ms {
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
        }

        match (&response.error, &response.result) {
            (Some(error), _) => Err(ExecutionError::RequestFailed(error.clone())),
            (None, Some(result)) => Ok(result.clone()),
            (None, None) => Err(ExecutionError::InvalidResponse(format!(
                "fixture for {} has neither result nor error",
                model.id
            ))),
        }
    }
}
