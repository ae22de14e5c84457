use std::sync::Arc;

use chrono::{Duration, Utc};
use economy_core::Timestamp;
use economy_ports::Clock;
use parking_lot::{RwLock, RwLockUpgradableReadGuard};

/// How a [`SimulationClock`] moves between readings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeScale {
    /// Follows the wall clock from the anchor
    #[default]
    RealTime,
    /// Frozen until `advance()`/`set_time()`
    Fixed,
    /// Every reading returns the anchor, then moves it forward by the step
    Stepped(Duration),
}

/// Controllable clock for tests and replays
///
/// Clones share state, so the clock handed to a market can still be moved
/// from the test driving it.
#[derive(Debug, Clone)]
pub struct SimulationClock {
    state: Arc<RwLock<ClockState>>,
}

#[derive(Debug)]
struct ClockState {
    /// Simulated time at `anchored_at`
    anchor: Timestamp,
    /// Wall-clock time the anchor was last moved
    anchored_at: Timestamp,
    scale: TimeScale,
}

impl ClockState {
    fn current(&self) -> Timestamp {
        match self.scale {
            TimeScale::RealTime => self.anchor + (Utc::now() - self.anchored_at),
            TimeScale::Fixed | TimeScale::Stepped(_) => self.anchor,
        }
    }

    fn reanchor(&mut self, anchor: Timestamp) {
        self.anchor = anchor;
        self.anchored_at = Utc::now();
    }
}

impl SimulationClock {
    fn with_scale(anchor: Timestamp, scale: TimeScale) -> Self {
        Self {
            state: Arc::new(RwLock::new(ClockState {
                anchor,
                anchored_at: Utc::now(),
                scale,
            })),
        }
    }

    /// Clock ticking with the wall clock, starting now
    pub fn new() -> Self {
        Self::with_scale(Utc::now(), TimeScale::RealTime)
    }

    /// Clock frozen at `time`
    pub fn at(time: Timestamp) -> Self {
        Self::with_scale(time, TimeScale::Fixed)
    }

    /// Clock frozen at the current time
    pub fn fixed() -> Self {
        Self::at(Utc::now())
    }

    /// Clock that starts at `start` and moves `step` forward on every reading
    ///
    /// Gives every trade a distinct, predictable timestamp.
    pub fn stepped(start: Timestamp, step: Duration) -> Self {
        Self::with_scale(start, TimeScale::Stepped(step))
    }

    pub fn scale(&self) -> TimeScale {
        self.state.read().scale
    }

    /// Switch scale without losing the simulated time reached so far
    pub fn set_scale(&self, scale: TimeScale) {
        let mut state = self.state.write();
        let current = state.current();
        state.reanchor(current);
        state.scale = scale;
    }

    pub fn advance(&self, by: Duration) {
        let mut state = self.state.write();
        let current = state.current();
        state.reanchor(current + by);
    }

    pub fn set_time(&self, time: Timestamp) {
        self.state.write().reanchor(time);
    }
}

impl Default for SimulationClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SimulationClock {
    fn now(&self) -> Timestamp {
        let state = self.state.upgradable_read();
        let TimeScale::Stepped(step) = state.scale else {
            return state.current();
        };
        let mut state = RwLockUpgradableReadGuard::upgrade(state);
        let now = state.anchor;
        state.anchor = now + step;
        now
    }

    fn name(&self) -> &str {
        "SimulationClock"
    }
}
