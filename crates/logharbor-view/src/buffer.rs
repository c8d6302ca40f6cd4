use std::collections::VecDeque;

use logharbor_types::LogEvent;

/// Default retention window size.
pub const DEFAULT_CAPACITY: usize = 1000;

/// Fixed-capacity window over the most recently seen events, newest-first.
///
/// Order is strictly by arrival: a late-arriving event with an old timestamp
/// still lands at the front. `push` is the only mutation and is expressed as
/// a value transformation, so a buffer handed to a consumer is never changed
/// underneath it.
#[derive(Clone, Debug, PartialEq)]
pub struct RetentionBuffer {
    events: VecDeque<LogEvent>,
    capacity: usize,
}

impl RetentionBuffer {
    /// Create an empty buffer with the given capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            events: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Admit an event at the front, evicting from the back past capacity.
    pub fn push(mut self, event: LogEvent) -> Self {
        self.events.push_front(event);
        self.events.truncate(self.capacity);
        self
    }

    /// Number of retained events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Check if the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Configured capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Iterate newest-first.
    pub fn iter(&self) -> impl Iterator<Item = &LogEvent> {
        self.events.iter()
    }

    /// Event at the given position (0 = newest).
    pub fn get(&self, index: usize) -> Option<&LogEvent> {
        self.events.get(index)
    }
}

impl Default for RetentionBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
