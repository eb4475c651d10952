//! # ArenaTicket Testing
//!
//! Testing utilities for ArenaTicket reducers.
//!
//! This crate provides:
//! - [`ReducerTest`], a Given-When-Then harness for reducers
//! - Assertion helpers for returned effects
//! - A deterministic [`FixedClock`]
//!
//! ## Example
//!
//! ```ignore
//! use arenaticket_testing::{ReducerTest, assertions};
//!
//! ReducerTest::new(CheckInReducer::new())
//!     .with_env(test_environment())
//!     .given_state(CheckInState::default())
//!     .when_action(CheckInAction::Clear)
//!     .then_state(|state| assert!(state.phase.is_idle()))
//!     .then_effects(assertions::assert_no_effects)
//!     .run();
//! ```

use arenaticket_core::environment::Clock;
use chrono::{DateTime, Utc};


/// Deterministic stand-ins for environment services.
pub mod mocks {
    use super::{Clock, DateTime, Utc};

    /// Clock frozen at one instant.
    ///
    /// # Example
    ///
    /// ```
    /// use arenaticket_testing::mocks::FixedClock;
    /// use arenaticket_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// assert_eq!(clock.now(), clock.now());
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Clock frozen at `time`
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Clock frozen at 2025-06-01 18:00 UTC, an evening of an event weekend.
    ///
    /// # Panics
    ///
    /// Panics if the hardcoded timestamp fails to parse, which cannot happen.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-06-01T18:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }
}

pub use mocks::{test_clock, FixedClock};
pub use reducer_test::{assertions, ReducerTest};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_is_frozen() {
        let clock = test_clock();
        assert_eq!(clock.now(), clock.now());
        assert_eq!(clock.now().to_rfc3339(), "2025-06-01T18:00:00+00:00");
    }
}
