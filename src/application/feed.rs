//! Bounded, most-recent-first activity feed.

use chrono::{DateTime, Utc};
use std::collections::VecDeque;

use crate::domain::{ActivityEntry, ActivityEvent, DEFAULT_FEED_CAPACITY};

/// Fixed-capacity log of backend pushes, ordered by client arrival.
#[derive(Debug, Clone)]
pub struct ActivityFeed {
    capacity: usize,
    entries: VecDeque<ActivityEntry>,
    last_id: i64,
}

impl Default for ActivityFeed {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_FEED_CAPACITY)
    }
}

impl ActivityFeed {
    /// Capacity is clamped to at least one entry.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            entries: VecDeque::with_capacity(capacity),
            last_id: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn push(&mut self, event: ActivityEvent) -> &ActivityEntry {
        self.push_at(event, Utc::now())
    }

    /// Prepends an entry stamped with `arrived_at` and drops whatever falls past capacity.
    pub fn push_at(&mut self, event: ActivityEvent, arrived_at: DateTime<Utc>) -> &ActivityEntry {
        let id = arrived_at.timestamp_millis().max(self.last_id + 1);
        self.last_id = id;

        self.entries.push_front(ActivityEntry {
            id,
            message: event.message,
            timestamp: arrived_at,
            kind: event.kind,
            reported_at: event.reported_at,
        });
        while self.entries.len() > self.capacity {
            if let Some(dropped) = self.entries.pop_back() {
                log::trace!("activity feed full, dropping entry {}", dropped.id);
            }
        }
        &self.entries[0]
    }

    /// Newest first.
    pub fn snapshot(&self) -> Vec<ActivityEntry> {
        self.entries.iter().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActivityEntry> {
        self.entries.iter()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
