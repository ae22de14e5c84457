use chrono::{SubsecRound, Utc};
use economy_core::Timestamp;
use economy_ports::Clock;

/// Wall-clock time source
///
/// [`SystemClock::millis`] drops sub-millisecond digits so trade timestamps
/// survive the snapshot format unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock {
    millis: bool,
}

impl SystemClock {
    /// Full-precision wall clock
    pub fn new() -> Self {
        Self { millis: false }
    }

    /// Wall clock truncated to whole milliseconds
    pub fn millis() -> Self {
        Self { millis: true }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        let now = Utc::now();
        if self.millis { now.trunc_subsecs(3) } else { now }
    }

    fn name(&self) -> &str {
        if self.millis { "SystemClock(ms)" } else { "SystemClock" }
    }
}
