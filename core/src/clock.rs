//! Simulation clock. Owns the logical tick counter.
//!
//! Time only moves forward through `advance()`. Nothing in the core is
//! driven by wall-clock time; wall-clock stamps are informational.

use crate::types::{RunId, Tick};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimClock {
    pub run_id:       RunId,
    pub current_tick: Tick,
}

impl SimClock {
    pub fn new(run_id: RunId) -> Self {
        Self {
            run_id,
            current_tick: 0,
        }
    }

    /// Advance one tick. Returns the new tick number.
    pub fn advance(&mut self) -> Tick {
        self.current_tick += 1;
        self.current_tick
    }

    /// Ticks elapsed since `since`. Saturates at zero for future ticks.
    pub fn elapsed_since(&self, since: Tick) -> Tick {
        self.current_tick.saturating_sub(since)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_is_monotonic() {
        let mut clock = SimClock::new("clock-test".into());
        assert_eq!(clock.current_tick, 0);
        assert_eq!(clock.advance(), 1);
        assert_eq!(clock.advance(), 2);
        assert_eq!(clock.elapsed_since(0), 2);
        assert_eq!(clock.elapsed_since(5), 0);
    }
}
