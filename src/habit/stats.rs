//! Rollup queries over a task's ledger and streak state.
//!
//! All queries are pure reads evaluated against an explicit date or the
//! task clock's current date; none of them mutate engine state.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::Task;

/// Completion counts for the week, month and year around one date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionSummary {
    /// Completions since the most recent Monday.
    pub week: usize,
    /// Completions in the calendar month.
    pub month: usize,
    /// Completions in the calendar year.
    pub year: usize,
}

/// Streak figures around one date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakSummary {
    /// The in-progress consecutive-day run, zero when broken.
    pub current: u32,
    /// Best run recorded while a completion fell in the month.
    pub month_best: u32,
    /// Best run recorded across the year.
    pub year_best: u32,
}

impl Task {
    /// Number of completions over the given year.
    #[must_use]
    pub fn year_completion_count(&self, year: i32) -> usize {
        self.ledger().year_count(year)
    }

    /// Number of completions over the given month.
    #[must_use]
    pub fn month_completion_count(&self, year: i32, month: u32) -> usize {
        self.ledger().month_count(year, month)
    }

    /// Number of completions over the week containing the given day.
    ///
    /// The week runs from the most recent Monday at or before the day
    /// up to the day itself; Sunday counts as the seventh day, not the
    /// first. When that Monday falls in the previous calendar month the
    /// previous month's bucket is consulted too, so the count does not
    /// truncate at the month boundary.
    #[must_use]
    pub fn week_completion_count(&self, year: i32, month: u32, day: u32) -> usize {
        let Some(end_day) = NaiveDate::from_ymd_opt(year, month, day) else {
            return 0;
        };

        let days_from_monday = i64::from(end_day.weekday().number_from_monday()) - 1;
        let week_start = end_day - Duration::days(days_from_monday);

        let in_window = |instant: &&DateTime<Utc>| {
            let date = instant.date_naive();
            date >= week_start && date <= end_day
        };

        let mut count = self
            .ledger()
            .completions_in_month(year, month)
            .iter()
            .filter(in_window)
            .count();

        if (week_start.year(), week_start.month()) != (year, month) {
            count += self
                .ledger()
                .completions_in_month(week_start.year(), week_start.month())
                .iter()
                .filter(in_window)
                .count();
        }

        count
    }

    /// Completions this week, evaluated at the clock's date.
    #[must_use]
    pub fn current_week_completion_count(&self) -> usize {
        let now = self.clock().now();
        self.week_completion_count(now.year(), now.month(), now.day())
    }

    /// Completions this month, evaluated at the clock's date.
    #[must_use]
    pub fn current_month_completion_count(&self) -> usize {
        let now = self.clock().now();
        self.month_completion_count(now.year(), now.month())
    }

    /// Completions this year, evaluated at the clock's date.
    #[must_use]
    pub fn current_year_completion_count(&self) -> usize {
        self.year_completion_count(self.clock().now().year())
    }

    /// Best streak across all months of the given year, 0 when absent.
    #[must_use]
    pub fn year_best_streak(&self, year: i32) -> u32 {
        self.streak_tracker().best().year_best(year)
    }

    /// Best streak recorded for the given month, 0 when absent.
    #[must_use]
    pub fn month_best_streak(&self, year: i32, month: u32) -> u32 {
        self.streak_tracker().best().get(year, month)
    }

    /// Best streak this month, evaluated at the clock's date.
    #[must_use]
    pub fn current_month_best_streak(&self) -> u32 {
        let now = self.clock().now();
        self.month_best_streak(now.year(), now.month())
    }

    /// Best streak this year, evaluated at the clock's date.
    #[must_use]
    pub fn current_year_best_streak(&self) -> u32 {
        self.year_best_streak(self.clock().now().year())
    }

    /// Week, month and year completion counts at the clock's date.
    #[must_use]
    pub fn completion_summary(&self) -> CompletionSummary {
        CompletionSummary {
            week: self.current_week_completion_count(),
            month: self.current_month_completion_count(),
            year: self.current_year_completion_count(),
        }
    }

    /// Current, month-best and year-best streaks at the clock's date.
    #[must_use]
    pub fn streak_summary(&self) -> StreakSummary {
        StreakSummary {
            current: self.current_streak(),
            month_best: self.current_month_best_streak(),
            year_best: self.current_year_best_streak(),
        }
    }
}
