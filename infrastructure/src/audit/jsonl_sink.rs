//! JSONL file writer for verification audit events.
//!
//! Each [`AuditEvent`] is serialized as a single JSON line with an `event`
//! field and `timestamp`, appended to the file via a buffered writer.

use ensemble_application::ports::audit_sink::{AuditError, AuditEvent, AuditSink};
use serde_json::Value;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

/// Audit sink that appends one JSON object per line.
///
/// Thread-safe via `Mutex<BufWriter<File>>`. Every record is flushed, so a
/// crash loses at most the event being written.
pub struct JsonlAuditSink {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl JsonlAuditSink {
    /// Open the audit file for appending.
    ///
    /// Creates the file (and parent directories) if they don't exist.
    /// Returns `None` if the file cannot be opened.
    pub fn new(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            warn!(
                "Could not create audit log directory {}: {}",
                parent.display(),
                e
            );
            return None;
        }

        let file = match OpenOptions::new().create(true).append(true).open(path) {
            Ok(f) => f,
            Err(e) => {
                warn!("Could not open audit log file {}: {}", path.display(), e);
                return None;
            }
        };

        Some(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
        })
    }

    /// Get the path to the audit file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Merge the payload with `event` + `timestamp`
fn build_record(event: &AuditEvent) -> Value {
    let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);

    match &event.payload {
        Value::Object(map) => {
            let mut map = map.clone();
            map.insert("event".to_string(), Value::String(event.kind.to_string()));
            map.insert("timestamp".to_string(), Value::String(timestamp));
            Value::Object(map)
        }
        other => serde_json::json!({
            "event": event.kind.as_str(),
            "timestamp": timestamp,
            "data": other,
        }),
    }
}

impl AuditSink for JsonlAuditSink {
    fn record(&self, event: &AuditEvent) -> Result<(), AuditError> {
        let line = serde_json::to_string(&build_record(event))
            .map_err(|e| AuditError::Serialization(e.to_string()))?;

        let mut writer = self
            .writer
            .lock()
            .map_err(|_| AuditError::WriteFailed("audit writer lock poisoned".to_string()))?;
        writeln!(writer, "{}", line).map_err(|e| AuditError::WriteFailed(e.to_string()))?;
        writer
            .flush()
            .map_err(|e| AuditError::WriteFailed(e.to_string()))
    }
}

impl Drop for JsonlAuditSink {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}
