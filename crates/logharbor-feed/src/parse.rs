use logharbor_types::LogEvent;

/// Errors surfaced by the feed layer.
///
/// None of these are fatal to the pipeline: a malformed frame is discarded
/// and a connection failure degrades to a disconnected state.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("failed to connect to {endpoint}: {source}")]
    Connect {
        endpoint: String,
        source: std::io::Error,
    },

    #[error("feed read failed: {0}")]
    Read(#[from] std::io::Error),

    #[error("malformed log event: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Parse one feed frame into a log event.
///
/// Each frame must carry exactly one serialized event; anything else is a
/// `Malformed` error and never reaches the buffer.
pub fn parse_event(payload: &str) -> Result<LogEvent, FeedError> {
    Ok(serde_json::from_str(payload.trim())?)
}
