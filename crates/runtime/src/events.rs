//! Bounded in-memory log of resolved world events.

use std::collections::VecDeque;

use game_core::WorldEvent;

/// Ring buffer of [`WorldEvent`]s kept for clients that poll less often
/// than they tick. Once full, the oldest entries are evicted.
#[derive(Debug)]
pub struct EventLog {
    entries: VecDeque<WorldEvent>,
    capacity: usize,
}

impl EventLog {
    /// A zero capacity is clamped to one so the log never rejects a push.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    pub fn push(&mut self, event: WorldEvent) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(event);
    }

    pub fn extend(&mut self, events: impl IntoIterator<Item = WorldEvent>) {
        for event in events {
            self.push(event);
        }
    }

    /// Removes and returns every logged event, oldest first.
    pub fn drain(&mut self) -> Vec<WorldEvent> {
        self.entries.drain(..).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &WorldEvent> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use game_core::EntityId;

    use super::*;

    fn waited(id: u32) -> WorldEvent {
        WorldEvent::Waited {
            entity: EntityId(id),
        }
    }

    #[test]
    fn overflow_drops_the_oldest_entries() {
        let mut log = EventLog::with_capacity(3);
        for id in 0..5 {
            log.push(waited(id));
        }

        assert_eq!(log.len(), 3);
        assert_eq!(log.drain(), vec![waited(2), waited(3), waited(4)]);
    }

    #[test]
    fn drain_empties_in_arrival_order() {
        let mut log = EventLog::with_capacity(8);
        log.extend([waited(1), waited(2)]);

        assert_eq!(log.drain(), vec![waited(1), waited(2)]);
        assert!(log.is_empty());
        assert_eq!(log.drain(), Vec::new());
    }

    #[test]
    fn zero_capacity_still_keeps_the_latest_event() {
        let mut log = EventLog::with_capacity(0);
        log.push(waited(1));
        log.push(waited(2));

        assert_eq!(log.drain(), vec![waited(2)]);
    }
}
