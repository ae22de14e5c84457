//! Economy Clock Infrastructure
//!
//! Time sources that can be injected into the market:
//!
//! - [`SystemClock`]: wall-clock time for production use
//! - [`SimulationClock`]: controllable time for tests and replays
//!
//! ## Usage
//!
//! ```ignore
//! use economy_clock::{SimulationClock, TimeScale};
//! use chrono::Duration;
//!
//! let clock = SimulationClock::fixed();
//! clock.advance(Duration::minutes(5)); // Jump forward
//! clock.set_scale(TimeScale::RealTime); // Resume ticking
//! ```

mod simulation;
mod system;

pub use simulation::{SimulationClock, TimeScale};
pub use system::SystemClock;

// Re-export the Clock trait for convenience
pub use economy_ports::Clock;
