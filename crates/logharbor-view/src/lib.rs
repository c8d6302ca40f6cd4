//! Retention, filtering, and aggregation for logharbor
//!
//! This crate holds the client-side pipeline state: the bounded retention
//! window, the filter engine, the aggregate counter, and the view state
//! that keeps the derived values consistent with their sources.

mod buffer;
mod filter;
mod state;
mod stats;

pub use buffer::{DEFAULT_CAPACITY, RetentionBuffer};
pub use filter::FilterEngine;
pub use state::{Snapshot, ViewState};
pub use stats::AggregateCounter;

// Re-export types used in our public API
pub use logharbor_types::{
    AggregateStats, ConnectionState, FilterCriteria, LevelFilter, LogEvent, LogLevel,
};
