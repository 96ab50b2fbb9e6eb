//! Realtime adjustments to the static timetable.
//!
//! The explorer asks the overlay for every HOP/DWELL traversal and before
//! boarding or alighting. [`StaticSchedule`] changes nothing.

use std::collections::{HashMap, HashSet};

use crate::domain::EdgeId;

/// Source of realtime changes to scheduled edges.
pub trait RealtimeOverlay: Send + Sync {
    /// Returns the travel time of `edge` given its scheduled time.
    fn adjusted_seconds(&self, edge: EdgeId, scheduled: u32) -> u32 {
        let _ = edge;
        scheduled
    }

    /// Returns true if `edge` must not be traversed (cancelled stop or trip).
    fn is_blocked(&self, edge: EdgeId) -> bool {
        let _ = edge;
        false
    }
}

/// The static timetable.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticSchedule;

impl RealtimeOverlay for StaticSchedule {}

/// Per-edge delays and cancellations.
#[derive(Debug, Clone, Default)]
pub struct DelayOverlay {
    delays: HashMap<EdgeId, u32>,
    blocked: HashSet<EdgeId>,
}

impl DelayOverlay {
    /// Create an overlay with no changes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `seconds` to the travel time of `edge`.
    pub fn delay(mut self, edge: EdgeId, seconds: u32) -> Self {
        *self.delays.entry(edge).or_default() += seconds;
        self
    }

    /// Forbid traversing `edge`.
    pub fn block(mut self, edge: EdgeId) -> Self {
        self.blocked.insert(edge);
        self
    }
}

impl RealtimeOverlay for DelayOverlay {
    fn adjusted_seconds(&self, edge: EdgeId, scheduled: u32) -> u32 {
        scheduled.saturating_add(self.delays.get(&edge).copied().unwrap_or(0))
    }

    fn is_blocked(&self, edge: EdgeId) -> bool {
        self.blocked.contains(&edge)
    }
}
