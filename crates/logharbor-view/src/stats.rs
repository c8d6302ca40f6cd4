use logharbor_types::{AggregateStats, LogLevel};

use crate::buffer::RetentionBuffer;

/// Derives per-level counts from the full retention window.
///
/// Always recomputed from scratch on a buffer change, never patched
/// incrementally. `Other` levels count toward `total` but have no named
/// bucket (preserved behavior of the original view).
pub struct AggregateCounter;

impl AggregateCounter {
    /// Count events per level across the whole buffer.
    pub fn compute(buffer: &RetentionBuffer) -> AggregateStats {
        let mut stats = AggregateStats {
            total: buffer.len(),
            ..Default::default()
        };

        for event in buffer.iter() {
            match &event.level {
                LogLevel::Info => stats.info += 1,
                LogLevel::Warn => stats.warn += 1,
                LogLevel::Error => stats.error += 1,
                LogLevel::Debug => stats.debug += 1,
                LogLevel::Other(_) => {}
            }
        }

        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use logharbor_types::LogEvent;

    fn buffer_of(levels: &[LogLevel]) -> RetentionBuffer {
        levels.iter().fold(RetentionBuffer::new(100), |buf, level| {
            buf.push(LogEvent::new(level.clone(), "svc", "msg"))
        })
    }

    #[test]
    fn test_empty_buffer_is_all_zero() {
        let stats = AggregateCounter::compute(&RetentionBuffer::new(10));
        assert_eq!(stats, AggregateStats::default());
    }

    #[test]
    fn test_counts_per_level() {
        let stats = AggregateCounter::compute(&buffer_of(&[
            LogLevel::Info,
            LogLevel::Error,
            LogLevel::Info,
            LogLevel::Warn,
            LogLevel::Debug,
        ]));

        assert_eq!(stats.total, 5);
        assert_eq!(stats.info, 2);
        assert_eq!(stats.warn, 1);
        assert_eq!(stats.error, 1);
        assert_eq!(stats.debug, 1);
    }

    #[test]
    fn test_total_always_equals_buffer_length() {
        let buffer = buffer_of(&[LogLevel::Info, LogLevel::Other("NOTICE".into())]);
        let stats = AggregateCounter::compute(&buffer);
        assert_eq!(stats.total, buffer.len());
    }

    #[test]
    fn test_unknown_levels_have_no_bucket() {
        let stats = AggregateCounter::compute(&buffer_of(&[
            LogLevel::Other("NOTICE".into()),
            LogLevel::Other("FATAL".into()),
            LogLevel::Warn,
        ]));

        assert_eq!(stats.total, 3);
        assert_eq!(stats.warn, 1);
        assert_eq!(stats.info + stats.error + stats.debug, 0);
    }
}
