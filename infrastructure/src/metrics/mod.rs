//! Metrics source adapters

mod in_memory;

pub use in_memory::InMemoryMetrics;
