//! Tick clock with delta-time capping.
//!
//! Host timestamps arrive in milliseconds (the frame scheduler's time base).
//! The clock turns consecutive timestamps into a simulated-seconds delta,
//! capped at [`MAX_DELTA_SECS`] so a single long gap between ticks (a
//! backgrounded tab, a stalled host) bounds the integration error instead
//! of producing an unphysical jump.

use serde::{Deserialize, Serialize};

/// Upper bound on the per-tick delta (s).
pub const MAX_DELTA_SECS: f64 = 0.05;

/// Capped delta-time source for the animation driver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TickClock {
    /// Timestamp of the last observed tick (ms); `None` after a re-arm.
    last_ms: Option<f64>,
    /// Delta cap (s).
    max_delta: f64,
}

impl TickClock {
    /// Create a clock with the standard delta cap.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            last_ms: None,
            max_delta: MAX_DELTA_SECS,
        }
    }

    /// Create a clock with a custom delta cap (s).
    #[must_use]
    pub fn with_cap(max_delta: f64) -> Self {
        Self {
            last_ms: None,
            max_delta: if max_delta.is_finite() && max_delta > 0.0 {
                max_delta
            } else {
                MAX_DELTA_SECS
            },
        }
    }

    /// Forget the last timestamp.
    ///
    /// Called on `start()` and `reset()` so the next delta is measured from
    /// the moment of (re)starting, never from a stale previous run.
    pub fn rearm(&mut self) {
        self.last_ms = None;
    }

    /// Delta in simulated seconds between `now_ms` and the last tick.
    ///
    /// The first call after a re-arm only records the timestamp and yields
    /// zero. A timestamp that goes backwards also yields zero.
    pub fn delta(&mut self, now_ms: f64) -> f64 {
        let dt = match self.last_ms {
            Some(last) => ((now_ms - last) / 1000.0).clamp(0.0, self.max_delta),
            None => 0.0,
        };
        self.last_ms = Some(now_ms);
        dt
    }

    /// The configured delta cap (s).
    #[must_use]
    pub const fn max_delta(&self) -> f64 {
        self.max_delta
    }

    /// Whether the clock is waiting for its first tick since re-arm.
    #[must_use]
    pub const fn is_armed(&self) -> bool {
        self.last_ms.is_none()
    }
}

impl Default for TickClock {
    fn default() -> Self {
        Self::new()
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Deltas are always within [0, cap] whatever timestamps arrive.
        #[test]
        fn prop_delta_bounded(timestamps in prop::collection::vec(0.0f64..1e9, 1..100)) {
            let mut clock = TickClock::new();
            for ts in timestamps {
                let dt = clock.delta(ts);
                prop_assert!(dt >= 0.0);
                prop_assert!(dt <= MAX_DELTA_SECS);
            }
        }
    }
}
