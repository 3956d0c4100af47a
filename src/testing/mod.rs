//! Testing infrastructure.
//!
//! Deterministic clocks implementing the substitution contract of
//! [`Clock`](crate::clock::Clock): a fixed instant, or one advanced
//! manually to walk a task through days and weeks.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};

use crate::clock::Clock;

/// Controllable clock for tests.
///
/// Starts at a fixed instant and only moves when told to, so streak
/// continuation and rollup windows can be asserted against exact days.
///
/// # Example
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use ritual::habit::Task;
/// use ritual::testing::ManualClock;
///
/// let clock = ManualClock::starting_at(
///     Utc.with_ymd_and_hms(2023, 10, 3, 15, 33, 0).unwrap(),
/// );
/// let mut task = Task::with_clock("walk", "", clock.clone());
///
/// task.mark_completed();
/// clock.advance_days(1);
/// task.mark_completed();
///
/// assert_eq!(task.current_streak(), 2);
/// ```
#[derive(Debug)]
pub struct ManualClock {
    current: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    /// Create a clock frozen at `instant`, ready to share with tasks.
    #[must_use]
    pub fn starting_at(instant: DateTime<Utc>) -> Arc<Self> {
        Arc::new(Self {
            current: Mutex::new(instant),
        })
    }

    /// Jump to an exact instant.
    pub fn set(&self, instant: DateTime<Utc>) {
        *self.current.lock().expect("clock poisoned") = instant;
    }

    /// Move forward by whole days, keeping the time of day.
    pub fn advance_days(&self, days: u64) {
        let mut current = self.current.lock().expect("clock poisoned");
        *current += Duration::days(days as i64);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.current.lock().expect("clock poisoned")
    }
}
