//! Day-streak state machine.
//!
//! [`StreakCounter`] is the one canonical streak abstraction:
//! consecutive-day runs with an optional continuity window that caps a
//! run at a month or ISO-week boundary. [`StreakTracker`] layers the
//! per-year/month best bookkeeping a task needs on top of an unbounded
//! counter.
//!
//! A counter is deliberately lazy about broken streaks: the stored
//! count goes stale when more than one day passes without a completion
//! and reads as zero through [`StreakCounter::current`], but is only
//! rewritten by the next [`StreakCounter::record`].

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::same_day;

/// Continuity window limiting how far a streak may run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContinuityWindow {
    /// A streak runs as long as completions stay day-adjacent.
    #[default]
    Unbounded,
    /// A streak additionally breaks at a calendar-month boundary.
    Monthly,
    /// A streak additionally breaks at an ISO-week boundary.
    Weekly,
}

/// Counter for an in-progress consecutive-day run.
///
/// # Example
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use ritual::habit::{ContinuityWindow, StreakCounter};
///
/// let mut streak = StreakCounter::new(ContinuityWindow::Unbounded);
/// let day1 = Utc.with_ymd_and_hms(2024, 4, 1, 9, 0, 0).unwrap();
/// let day2 = Utc.with_ymd_and_hms(2024, 4, 2, 21, 0, 0).unwrap();
///
/// streak.record(day1);
/// streak.record(day2);
/// assert_eq!(streak.current(day2), 2);
///
/// // Two missed days later the run reads as broken.
/// let day4 = Utc.with_ymd_and_hms(2024, 4, 4, 9, 0, 0).unwrap();
/// assert_eq!(streak.current(day4), 0);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakCounter {
    window: ContinuityWindow,
    count: u32,
    last_completed: Option<DateTime<Utc>>,
}

impl StreakCounter {
    /// Create an empty counter with the given continuity window.
    #[must_use]
    pub fn new(window: ContinuityWindow) -> Self {
        Self {
            window,
            count: 0,
            last_completed: None,
        }
    }

    /// Rebuild a counter from persisted state.
    #[must_use]
    pub fn from_parts(
        window: ContinuityWindow,
        count: u32,
        last_completed: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            window,
            count,
            last_completed,
        }
    }

    /// The stored run length, valid only while the streak is continued.
    #[must_use]
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Instant of the most recent completion, `None` when never.
    #[must_use]
    pub fn last_completed(&self) -> Option<DateTime<Utc>> {
        self.last_completed
    }

    /// Whether the streak is still continued as of `at`.
    ///
    /// True iff `at` shares a calendar day with the last completion or
    /// the day before `at` does (one missed day is still recoverable),
    /// and the continuity window has not been crossed.
    #[must_use]
    pub fn is_continued(&self, at: DateTime<Utc>) -> bool {
        let Some(last) = self.last_completed else {
            return false;
        };

        let adjacent = same_day(at, last) || same_day(at - Duration::days(1), last);

        match self.window {
            ContinuityWindow::Unbounded => adjacent,
            ContinuityWindow::Monthly => {
                adjacent && (at.year(), at.month()) == (last.year(), last.month())
            }
            ContinuityWindow::Weekly => adjacent && at.iso_week() == last.iso_week(),
        }
    }

    /// The run length as of `at`: the stored count while continued,
    /// zero once broken. Pure read; stale counts are only rewritten by
    /// the next [`StreakCounter::record`].
    #[must_use]
    pub fn current(&self, at: DateTime<Utc>) -> u32 {
        if self.is_continued(at) {
            self.count
        } else {
            0
        }
    }

    /// Register a completion at `now`.
    ///
    /// A second completion on the same calendar day is a no-op and
    /// returns false. Otherwise the run either extends by one (when
    /// `now` is exactly one day after the last completion, inside the
    /// window) or restarts at one.
    pub fn record(&mut self, now: DateTime<Utc>) -> bool {
        if self
            .last_completed
            .is_some_and(|last| same_day(last, now))
        {
            return false;
        }

        if self.is_continued(now) {
            // Same-day was handled above, so continued means `now` is
            // exactly one day after the last completion.
            self.count += 1;
        } else {
            if self.count > 0 {
                debug!(stale = self.count, "streak broken, restarting at 1");
            }
            self.count = 1;
        }

        self.last_completed = Some(now);
        true
    }

    /// Reverse the most recent [`StreakCounter::record`].
    ///
    /// Decrements the run and points the counter back at
    /// `restored_last`, the completion preceding the undone one.
    pub fn rollback(&mut self, restored_last: Option<DateTime<Utc>>) {
        self.count = self.count.saturating_sub(1);
        self.last_completed = restored_last;
    }
}

/// Best streak values keyed by year and month.
///
/// A month's entry is the longest run ever recorded while a completion
/// fell inside that month; missing entries read as zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BestByMonth {
    years: BTreeMap<i32, BTreeMap<u32, u32>>,
}

impl BestByMonth {
    /// Create an empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Best value for the given month, 0 when absent.
    #[must_use]
    pub fn get(&self, year: i32, month: u32) -> u32 {
        self.years
            .get(&year)
            .and_then(|months| months.get(&month))
            .copied()
            .unwrap_or(0)
    }

    /// Best value across all months of the given year, 0 when absent.
    #[must_use]
    pub fn year_best(&self, year: i32) -> u32 {
        self.years
            .get(&year)
            .map_or(0, |months| months.values().copied().max().unwrap_or(0))
    }

    /// Store `value` for the given month, creating buckets on first
    /// use. Overwrites unconditionally; comparison is the caller's job.
    pub fn set(&mut self, year: i32, month: u32, value: u32) {
        self.years.entry(year).or_default().insert(month, value);
    }

    /// Whether no best value was ever recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.years.values().all(BTreeMap::is_empty)
    }
}

/// Task-level streak state: an unbounded counter plus the per-month
/// best record and the instant that produced the current best.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreakTracker {
    counter: StreakCounter,
    best: BestByMonth,
    best_achieved_at: Option<DateTime<Utc>>,
}

impl StreakTracker {
    /// Create an empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a tracker from persisted state.
    #[must_use]
    pub fn from_parts(
        count: u32,
        last_completed: Option<DateTime<Utc>>,
        best: BestByMonth,
        best_achieved_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            counter: StreakCounter::from_parts(ContinuityWindow::Unbounded, count, last_completed),
            best,
            best_achieved_at,
        }
    }

    /// The underlying counter.
    #[must_use]
    pub fn counter(&self) -> &StreakCounter {
        &self.counter
    }

    /// The per-month best record.
    #[must_use]
    pub fn best(&self) -> &BestByMonth {
        &self.best
    }

    /// Instant of the completion that set the current best value.
    #[must_use]
    pub fn best_achieved_at(&self) -> Option<DateTime<Utc>> {
        self.best_achieved_at
    }

    /// Register a completion at `now`, updating the month's best value
    /// when the run surpasses it. Returns false on a same-day no-op.
    pub fn on_completed(&mut self, now: DateTime<Utc>) -> bool {
        if !self.counter.record(now) {
            return false;
        }

        if self.counter.count() > self.best.get(now.year(), now.month()) {
            self.best.set(now.year(), now.month(), self.counter.count());
            self.best_achieved_at = Some(now);
        }

        true
    }

    /// Reverse the completion made at `undone`.
    ///
    /// `restored_last` is the completion that preceded it, if any. When
    /// the undone completion is the one that set the current best, the
    /// month's best is overwritten with the decremented run.
    pub fn on_uncompleted(
        &mut self,
        undone: DateTime<Utc>,
        restored_last: Option<DateTime<Utc>>,
    ) {
        self.counter.rollback(restored_last);

        if self.best_achieved_at == Some(undone) {
            self.best
                .set(undone.year(), undone.month(), self.counter.count());
        }
    }
}
