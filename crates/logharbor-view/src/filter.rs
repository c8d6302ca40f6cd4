use logharbor_types::{FilterCriteria, LogEvent};

use crate::buffer::RetentionBuffer;

/// Pure filter over the retention window.
///
/// Recomputed in full whenever the buffer or the criteria change; output
/// order always equals buffer order (newest-first).
pub struct FilterEngine;

impl FilterEngine {
    /// Produce the subset of the buffer matching the criteria.
    pub fn apply(buffer: &RetentionBuffer, criteria: &FilterCriteria) -> Vec<LogEvent> {
        let needle = criteria.search_term.to_lowercase();
        buffer
            .iter()
            .filter(|event| {
                criteria.level.matches(&event.level)
                    && (criteria.search_term.is_empty()
                        || Self::matches_term(event, &needle, &criteria.search_term))
            })
            .cloned()
            .collect()
    }

    /// Substring match across the searchable fields. `needle` is the
    /// lowercased term; `raw` the original, used for the IP field which is
    /// matched literally (still substring, never exact).
    fn matches_term(event: &LogEvent, needle: &str, raw: &str) -> bool {
        event.message.to_lowercase().contains(needle)
            || event.service.to_lowercase().contains(needle)
            || event
                .user_id
                .as_deref()
                .is_some_and(|v| v.to_lowercase().contains(needle))
            || event
                .request_id
                .as_deref()
                .is_some_and(|v| v.to_lowercase().contains(needle))
            || event.ip.as_deref().is_some_and(|v| v.contains(raw))
    }
}
