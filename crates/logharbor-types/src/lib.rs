//! Shared types for logharbor
//!
//! This crate contains the data model used across the feed, view, and
//! binary crates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Log Events
// ============================================================================

/// Log severity level as reported by the feed.
///
/// The four known levels match the producer's fixed vocabulary. Anything
/// else passes through verbatim in `Other` so the original tag is never
/// lost; such events are retained and counted in totals but have no named
/// aggregate bucket.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LogLevel {
    Info,
    Warn,
    Error,
    Debug,
    Other(String),
}

impl LogLevel {
    /// Display string, matching the wire tag for the known levels.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
            Self::Debug => "DEBUG",
            Self::Other(tag) => tag,
        }
    }
}

impl From<&str> for LogLevel {
    fn from(s: &str) -> Self {
        match s {
            "INFO" => Self::Info,
            "WARN" => Self::Warn,
            "ERROR" => Self::Error,
            "DEBUG" => Self::Debug,
            _ => Self::Other(s.to_string()),
        }
    }
}

impl From<String> for LogLevel {
    fn from(s: String) -> Self {
        match s.as_str() {
            "INFO" => Self::Info,
            "WARN" => Self::Warn,
            "ERROR" => Self::Error,
            "DEBUG" => Self::Debug,
            _ => Self::Other(s),
        }
    }
}

impl From<LogLevel> for String {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Other(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single structured log event received from the feed.
///
/// Immutable once parsed; the wire format is one JSON object per frame with
/// `timestamp`, `level`, `service`, and `message` required and the rest
/// optional.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LogEvent {
    /// Source-supplied timestamp (RFC 3339 on the wire)
    pub timestamp: DateTime<Utc>,

    /// Detected severity level
    pub level: LogLevel,

    /// Emitting service name
    pub service: String,

    /// Log message body
    pub message: String,

    /// User the event is attributed to, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,

    /// Request correlation id, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,

    /// Client IP address, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,

    /// Operation duration in milliseconds, if measured
    #[serde(default, rename = "duration_ms", skip_serializing_if = "Option::is_none")]
    pub duration: Option<u64>,
}

impl LogEvent {
    /// Create a new event with only the required fields.
    pub fn new(level: LogLevel, service: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            level,
            service: service.into(),
            message: message.into(),
            user_id: None,
            request_id: None,
            ip: None,
            duration: None,
        }
    }
}

// ============================================================================
// Filtering
// ============================================================================

/// Error returned when a level-filter selector cannot be parsed.
#[derive(Debug, thiserror::Error)]
#[error("unknown level filter '{0}', expected ALL, INFO, WARN, ERROR, or DEBUG")]
pub struct ParseLevelFilterError(String);

/// Level selector for the filtered view.
///
/// Only the four known levels are selectable, matching the fixed set the
/// operator can pick from; `Other` levels are reachable only through `All`.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum LevelFilter {
    #[default]
    All,
    Level(LogLevel),
}

impl LevelFilter {
    /// Whether an event with the given level passes this selector.
    pub fn matches(&self, level: &LogLevel) -> bool {
        match self {
            Self::All => true,
            Self::Level(selected) => selected == level,
        }
    }

    /// Display label for the current selection.
    pub fn label(&self) -> &str {
        match self {
            Self::All => "ALL",
            Self::Level(level) => level.as_str(),
        }
    }
}

impl std::str::FromStr for LevelFilter {
    type Err = ParseLevelFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "ALL" => Ok(Self::All),
            "INFO" => Ok(Self::Level(LogLevel::Info)),
            "WARN" => Ok(Self::Level(LogLevel::Warn)),
            "ERROR" => Ok(Self::Level(LogLevel::Error)),
            "DEBUG" => Ok(Self::Level(LogLevel::Debug)),
            _ => Err(ParseLevelFilterError(s.to_string())),
        }
    }
}

/// Current filter selection applied to the retention window.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FilterCriteria {
    /// Free-text search term, matched case-insensitively (empty = no search)
    pub search_term: String,

    /// Level selector
    pub level: LevelFilter,
}

impl FilterCriteria {
    /// No active filtering: empty term, all levels.
    pub fn is_empty(&self) -> bool {
        self.search_term.is_empty() && self.level == LevelFilter::All
    }
}

// ============================================================================
// Aggregates
// ============================================================================

/// Per-level and total counts derived from the full retention window.
///
/// Always a pure function of buffer contents, independent of the active
/// filter. Events with an `Other` level count toward `total` only.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AggregateStats {
    pub total: usize,
    pub info: usize,
    pub warn: usize,
    pub error: usize,
    pub debug: usize,
}

impl AggregateStats {
    /// Count for one of the four named buckets; `None` for `Other` levels.
    pub fn bucket(&self, level: &LogLevel) -> Option<usize> {
        match level {
            LogLevel::Info => Some(self.info),
            LogLevel::Warn => Some(self.warn),
            LogLevel::Error => Some(self.error),
            LogLevel::Debug => Some(self.debug),
            LogLevel::Other(_) => None,
        }
    }

    /// Display proportion for a level bucket: `count / max(info, warn,
    /// error, debug, 1)`. This is the exact contract the chart collaborator
    /// consumes; the floor of 1 keeps an all-zero window well defined.
    pub fn proportion(&self, level: &LogLevel) -> f64 {
        let max = self
            .info
            .max(self.warn)
            .max(self.error)
            .max(self.debug)
            .max(1);
        let count = self.bucket(level).unwrap_or(0);
        count as f64 / max as f64
    }
}

// ============================================================================
// Connection
// ============================================================================

/// Feed connection state, driven only by connection lifecycle events.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connected,
}

impl ConnectionState {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Disconnected => "disconnected",
            Self::Connected => "connected",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_known_tags() {
        assert_eq!(LogLevel::from("INFO"), LogLevel::Info);
        assert_eq!(LogLevel::from("WARN"), LogLevel::Warn);
        assert_eq!(LogLevel::from("ERROR"), LogLevel::Error);
        assert_eq!(LogLevel::from("DEBUG"), LogLevel::Debug);
    }

    #[test]
    fn test_level_passthrough_preserves_tag() {
        let level = LogLevel::from("TRACE");
        assert_eq!(level, LogLevel::Other("TRACE".to_string()));
        assert_eq!(level.as_str(), "TRACE");

        // Known tags are matched exactly as produced, not case-folded
        assert_eq!(LogLevel::from("info"), LogLevel::Other("info".to_string()));
    }

    #[test]
    fn test_event_deserializes_producer_shape() {
        let payload = r#"{"level":"INFO","message":"User login successful",
            "timestamp":"2026-08-25T10:30:00Z","service":"api-gateway",
            "user_id":"user_123","request_id":"req_abc",
            "ip":"192.168.1.10","duration_ms":245}"#;

        let event: LogEvent = serde_json::from_str(payload).unwrap();
        assert_eq!(event.level, LogLevel::Info);
        assert_eq!(event.service, "api-gateway");
        assert_eq!(event.duration, Some(245));
        assert_eq!(event.ip.as_deref(), Some("192.168.1.10"));
    }

    #[test]
    fn test_event_optionals_default_to_none() {
        let payload = r#"{"level":"WARN","message":"High memory usage",
            "timestamp":"2026-08-25T10:30:00Z","service":"worker"}"#;

        let event: LogEvent = serde_json::from_str(payload).unwrap();
        assert_eq!(event.user_id, None);
        assert_eq!(event.request_id, None);
        assert_eq!(event.ip, None);
        assert_eq!(event.duration, None);
    }

    #[test]
    fn test_event_serializes_unknown_level_verbatim() {
        let mut event = LogEvent::new(LogLevel::from("NOTICE"), "svc", "msg");
        event.timestamp = "2026-08-25T10:30:00Z".parse().unwrap();

        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains(r#""level":"NOTICE""#));
        // Absent optionals are omitted, matching the producer
        assert!(!json.contains("user_id"));
    }

    #[test]
    fn test_level_filter_parse() {
        assert_eq!("ALL".parse::<LevelFilter>().unwrap(), LevelFilter::All);
        assert_eq!(
            "error".parse::<LevelFilter>().unwrap(),
            LevelFilter::Level(LogLevel::Error)
        );
        assert!("TRACE".parse::<LevelFilter>().is_err());
    }

    #[test]
    fn test_level_filter_matches() {
        assert!(LevelFilter::All.matches(&LogLevel::Info));
        assert!(LevelFilter::All.matches(&LogLevel::Other("NOTICE".into())));

        let errors = LevelFilter::Level(LogLevel::Error);
        assert!(errors.matches(&LogLevel::Error));
        assert!(!errors.matches(&LogLevel::Warn));
    }

    #[test]
    fn test_default_criteria_are_empty() {
        assert!(FilterCriteria::default().is_empty());
        let criteria = FilterCriteria {
            search_term: "db".into(),
            ..Default::default()
        };
        assert!(!criteria.is_empty());
    }

    #[test]
    fn test_proportion_scales_against_largest_bucket() {
        let stats = AggregateStats {
            total: 100,
            info: 50,
            warn: 20,
            error: 5,
            debug: 25,
        };
        assert_eq!(stats.proportion(&LogLevel::Info), 1.0);
        assert_eq!(stats.proportion(&LogLevel::Warn), 0.4);
        assert_eq!(stats.proportion(&LogLevel::Error), 0.1);
    }

    #[test]
    fn test_proportion_of_empty_stats_is_zero() {
        let stats = AggregateStats::default();
        assert_eq!(stats.proportion(&LogLevel::Error), 0.0);
    }
}
