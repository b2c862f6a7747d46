//! Audit sink adapters
//!
//! - [`JsonlAuditSink`] appends one JSON object per event to a file
//! - [`TracingAuditSink`] emits events through `tracing`

mod jsonl_sink;
mod tracing_sink;

pub use jsonl_sink::JsonlAuditSink;
pub use tracing_sink::TracingAuditSink;
