//! Audit configuration from TOML (`[audit]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Audit trail configuration
///
/// # Example
///
/// ```toml
/// [audit]
/// enabled = true
/// log_path = "~/.local/share/model-ensemble/audit.jsonl"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAuditConfig {
    pub enabled: bool,
    /// JSONL file to append events to. Without one, events go to the log only.
    pub log_path: Option<String>,
}

impl Default for FileAuditConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            log_path: None,
        }
    }
}

impl FileAuditConfig {
    /// The audit file path with a leading `~` expanded.
    pub fn resolved_log_path(&self) -> Option<PathBuf> {
        let raw = self.log_path.as_deref()?.trim();
        if raw.is_empty() {
            return None;
        }
        match raw.strip_prefix("~/") {
            Some(rest) => dirs::home_dir().map(|home| home.join(rest)),
            None => Some(PathBuf::from(raw)),
        }
    }
}
