//! Bounded log of crossing events fetched incrementally from the backend.

use serde::Deserialize;
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum EventKind {
    #[serde(rename = "IN")]
    In,
    #[serde(rename = "OUT")]
    Out,
}

impl EventKind {
    pub fn delta(self) -> i64 {
        match self {
            EventKind::In => 1,
            EventKind::Out => -1,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            EventKind::In => "Entry",
            EventKind::Out => "Exit",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CountEvent {
    pub id: u64,
    pub kind: EventKind,
    /// Epoch seconds.
    pub ts: i64,
}

/// Display list for crossing events: newest first, bounded, with the
/// incremental-fetch cursor advanced to the highest id seen.
pub struct EventFeed {
    entries: VecDeque<CountEvent>,
    last_id: u64,
    limit: usize,
}

impl EventFeed {
    pub fn new(limit: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            last_id: 0,
            limit: limit.max(1),
        }
    }

    /// Cursor for the next `after=` query.
    pub fn last_id(&self) -> u64 {
        self.last_id
    }

    /// Absorb a batch from the backend (oldest first, as served): prepend
    /// each entry and trim the tail to the display limit.
    pub fn absorb(&mut self, events: Vec<CountEvent>) {
        for ev in events {
            if ev.id > self.last_id {
                self.last_id = ev.id;
            }
            self.entries.push_front(ev);
            while self.entries.len() > self.limit {
                self.entries.pop_back();
            }
        }
    }

    /// Newest-first iteration for display.
    pub fn iter(&self) -> impl Iterator<Item = &CountEvent> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
