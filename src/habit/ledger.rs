//! Per-task completion ledger.
//!
//! The ledger is a two-level ordered mapping of year to month to the
//! chronological sequence of completion instants. Within one month at
//! most one entry exists per calendar day; the same-day check is the
//! task's responsibility so the ledger stays a plain append structure.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::same_day;

/// Ordered record of completion instants, bucketed by year and month.
///
/// Reads on absent buckets yield empty results, never errors; writes
/// create buckets on first use. Months are keyed 1 through 12.
///
/// # Example
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use ritual::habit::CompletionLedger;
///
/// let mut ledger = CompletionLedger::new();
/// ledger.record(Utc.with_ymd_and_hms(2024, 4, 2, 8, 30, 0).unwrap());
///
/// assert_eq!(ledger.month_count(2024, 4), 1);
/// assert_eq!(ledger.month_count(2024, 5), 0);
/// assert!(ledger.was_completed_on(2024, 4, 2));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompletionLedger {
    years: BTreeMap<i32, BTreeMap<u32, Vec<DateTime<Utc>>>>,
}

impl CompletionLedger {
    /// Create an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `instant` to its year/month bucket.
    ///
    /// The caller must have verified the calendar day is not already
    /// recorded; entries within a month stay monotonically increasing.
    pub fn record(&mut self, instant: DateTime<Utc>) {
        let bucket = self
            .years
            .entry(instant.year())
            .or_default()
            .entry(instant.month())
            .or_default();

        debug_assert!(
            bucket.last().map_or(true, |last| *last < instant),
            "completion recorded out of order"
        );

        bucket.push(instant);
    }

    /// All completions of the given month, oldest first.
    #[must_use]
    pub fn completions_in_month(&self, year: i32, month: u32) -> &[DateTime<Utc>] {
        self.years
            .get(&year)
            .and_then(|months| months.get(&month))
            .map_or(&[], |bucket| bucket.as_slice())
    }

    /// The most recent completion of the given month, if any.
    #[must_use]
    pub fn last_in_month(&self, year: i32, month: u32) -> Option<&DateTime<Utc>> {
        self.completions_in_month(year, month).last()
    }

    /// Pop the most recent completion of the given month.
    ///
    /// Used exclusively by undo.
    pub fn remove_last(&mut self, year: i32, month: u32) -> Option<DateTime<Utc>> {
        self.years
            .get_mut(&year)
            .and_then(|months| months.get_mut(&month))
            .and_then(Vec::pop)
    }

    /// Whether a completion was recorded on the given calendar day.
    #[must_use]
    pub fn was_completed_on(&self, year: i32, month: u32, day: u32) -> bool {
        let Some(date) = NaiveDate::from_ymd_opt(year, month, day) else {
            return false;
        };

        self.completions_in_month(year, month)
            .iter()
            .any(|instant| instant.date_naive() == date)
    }

    /// Number of completions in the given month, 0 when absent.
    #[must_use]
    pub fn month_count(&self, year: i32, month: u32) -> usize {
        self.completions_in_month(year, month).len()
    }

    /// Number of completions across the given year, 0 when absent.
    #[must_use]
    pub fn year_count(&self, year: i32) -> usize {
        self.years
            .get(&year)
            .map_or(0, |months| months.values().map(Vec::len).sum())
    }

    /// Whether the ledger holds no completions at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.years
            .values()
            .all(|months| months.values().all(Vec::is_empty))
    }
}

/// Whether the ledger's newest entry for the month containing `instant`
/// already falls on the same calendar day.
pub(super) fn has_same_day_tail(ledger: &CompletionLedger, instant: DateTime<Utc>) -> bool {
    ledger
        .last_in_month(instant.year(), instant.month())
        .is_some_and(|last| same_day(*last, instant))
}
