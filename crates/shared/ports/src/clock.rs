use economy_core::Timestamp;

/// Port for time abstraction
///
/// This allows the engine to use different time sources:
/// - Real system time for production
/// - Simulated time for testing and replays
/// - Any closure returning a timestamp
pub trait Clock: Send + Sync {
    /// Get the current time according to this clock
    fn now(&self) -> Timestamp;

    /// Get the clock's name/identifier for debugging
    fn name(&self) -> &str {
        "Clock"
    }
}

impl<F> Clock for F
where
    F: Fn() -> Timestamp + Send + Sync,
{
    fn now(&self) -> Timestamp {
        self()
    }

    fn name(&self) -> &str {
        "FnClock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    #[test]
    fn test_closure_is_a_clock() {
        let fixed = DateTime::<Utc>::from_timestamp_millis(1_700_000_000_000).unwrap();
        let clock = move || fixed;

        assert_eq!(Clock::now(&clock), fixed);
        assert_eq!(Clock::name(&clock), "FnClock");
    }
}
