use logharbor_types::{AggregateStats, ConnectionState, FilterCriteria, LogEvent};

use crate::buffer::RetentionBuffer;
use crate::filter::FilterEngine;
use crate::stats::AggregateCounter;

/// Read-only view handed to the presentation layer.
#[derive(Clone, Debug)]
pub struct Snapshot {
    pub connection_state: ConnectionState,
    pub stats: AggregateStats,
    pub filtered: Vec<LogEvent>,
    pub total_buffered: usize,
}

/// Single authoritative coordinator for the monitoring view.
///
/// Owns the buffer, the criteria, and both derived values. Every operation
/// that touches a source of truth recomputes the affected derived values
/// before returning, so a caller can never observe `filtered` or `stats`
/// out of step with `buffer` and `criteria`.
pub struct ViewState {
    connection_state: ConnectionState,
    buffer: RetentionBuffer,
    criteria: FilterCriteria,
    filtered: Vec<LogEvent>,
    stats: AggregateStats,
}

impl ViewState {
    /// Create a view over an empty retention window of the given capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            connection_state: ConnectionState::Disconnected,
            buffer: RetentionBuffer::new(capacity),
            criteria: FilterCriteria::default(),
            filtered: Vec::new(),
            stats: AggregateStats::default(),
        }
    }

    /// Admit one feed event and bring both derived values up to date.
    pub fn on_feed_event(&mut self, event: LogEvent) {
        let buffer = std::mem::take(&mut self.buffer);
        self.buffer = buffer.push(event);
        self.refresh();
    }

    /// Replace the filter criteria. Stats are a function of the buffer
    /// only, so only the filtered view is recomputed.
    pub fn set_criteria(&mut self, criteria: FilterCriteria) {
        self.criteria = criteria;
        self.filtered = FilterEngine::apply(&self.buffer, &self.criteria);
    }

    /// Drop all retained events; derived values collapse to empty/zero.
    pub fn clear(&mut self) {
        self.buffer = RetentionBuffer::new(self.buffer.capacity());
        self.refresh();
    }

    /// Record a connection-state transition. Buffer-derived values are
    /// untouched; a disconnect never discards retained events.
    pub fn connection_changed(&mut self, state: ConnectionState) {
        self.connection_state = state;
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.connection_state
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn stats(&self) -> AggregateStats {
        self.stats
    }

    pub fn filtered(&self) -> &[LogEvent] {
        &self.filtered
    }

    pub fn total_buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Clone out a consistent snapshot for rendering.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            connection_state: self.connection_state,
            stats: self.stats,
            filtered: self.filtered.clone(),
            total_buffered: self.buffer.len(),
        }
    }

    fn refresh(&mut self) {
        self.filtered = FilterEngine::apply(&self.buffer, &self.criteria);
        self.stats = AggregateCounter::compute(&self.buffer);
    }
}
