//! Feed connection and frame parsing for logharbor
//!
//! This crate manages the persistent connection to a log-event source and
//! turns newline-delimited JSON frames into typed events.

mod connection;
mod parse;

pub use connection::{FeedConnection, FeedEvent};
pub use parse::{FeedError, parse_event};

// Re-export types used in our public API
pub use logharbor_types::LogEvent;
