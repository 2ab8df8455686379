//! Bounded action log.
//!
//! Fixed capacity; appending to a full log evicts the oldest entry first.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::Tick;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionLogEntry {
    pub text:       String,
    pub sim_time:   Tick,
    pub wall_clock: DateTime<Utc>,
    /// `event_type_name` of the event that produced this entry.
    pub kind:       String,
}

#[derive(Debug, Clone)]
pub struct ActionLog {
    entries:  VecDeque<ActionLogEntry>,
    capacity: usize,
}

impl ActionLog {
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(capacity > 0, "action log capacity must be > 0");
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn append(&mut self, text: String, sim_time: Tick, kind: &str) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(ActionLogEntry {
            text,
            sim_time,
            wall_clock: Utc::now(),
            kind: kind.to_string(),
        });
    }

    /// Oldest to newest.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &ActionLogEntry> {
        self.entries.iter()
    }

    /// Newest first, at most `limit` entries whose text contains `filter`
    /// (all entries when `filter` is `None`).
    pub fn recent(&self, filter: Option<&str>, limit: usize) -> Vec<&ActionLogEntry> {
        self.entries
            .iter()
            .rev()
            .filter(|e| filter.map_or(true, |f| e.text.contains(f)))
            .take(limit)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evicts_oldest_first() {
        let mut log = ActionLog::with_capacity(3);
        for i in 0..5 {
            log.append(format!("action {i}"), i, "action_recorded");
        }
        assert_eq!(log.len(), 3);
        let texts: Vec<_> = log.iter().map(|e| e.text.as_str()).collect();
        assert_eq!(texts, ["action 2", "action 3", "action 4"]);
    }

    #[test]
    fn recent_filters_and_limits_newest_first() {
        let mut log = ActionLog::with_capacity(10);
        log.append("Team Alpha dispatched".into(), 0, "team_dispatched");
        log.append("Team Beta dispatched".into(), 1, "team_dispatched");
        log.append("Team Alpha completed".into(), 2, "mission_completed");

        let alpha: Vec<_> = log.recent(Some("Alpha"), 10).iter().map(|e| e.sim_time).collect();
        assert_eq!(alpha, [2, 0]);

        let last = log.recent(None, 1);
        assert_eq!(last.len(), 1);
        assert_eq!(last[0].text, "Team Alpha completed");
    }
}
