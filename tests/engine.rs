//! Integration tests for the habit engine: completion idempotence,
//! streak continuation and undo, and the rollup queries.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use ritual::habit::Task;
use ritual::testing::ManualClock;

fn clock_at(year: i32, month: u32, day: u32) -> Arc<ManualClock> {
    ManualClock::starting_at(Utc.with_ymd_and_hms(year, month, day, 15, 33, 0).unwrap())
}

#[test]
fn test_same_day_completion_is_idempotent() {
    let clock = clock_at(2023, 10, 3);
    let mut task = Task::with_clock("test", "test description", clock.clone());

    task.mark_completed();
    let after_first = (
        task.current_streak(),
        task.current_month_completion_count(),
        task.last_completed(),
    );

    task.mark_completed();

    assert_eq!(
        (
            task.current_streak(),
            task.current_month_completion_count(),
            task.last_completed(),
        ),
        after_first
    );
    assert_eq!(task.current_month_completion_count(), 1);
}

#[test]
fn test_streak_counts_consecutive_days_then_breaks() {
    let clock = clock_at(2000, 1, 1);
    let mut task = Task::with_clock("hit the gym", "test description", clock.clone());

    for _ in 0..3 {
        clock.advance_days(1);
        task.mark_completed();
    }

    assert_eq!(task.current_streak(), 3);
    assert_eq!(task.current_month_completion_count(), 3);

    // Two days later with no completion the streak reads zero.
    clock.advance_days(2);
    assert_eq!(task.current_streak(), 0);
}

#[test]
fn test_streak_resumes_at_one_after_gap() {
    let clock = clock_at(2024, 4, 1);
    let mut task = Task::with_clock("read", "ten pages", clock.clone());

    task.mark_completed();
    clock.advance_days(4);
    task.mark_completed();

    assert_eq!(task.current_streak(), 1);
    assert_eq!(task.current_month_completion_count(), 2);
}

#[test]
fn test_one_missed_day_is_recoverable() {
    let clock = clock_at(2024, 4, 1);
    let mut task = Task::with_clock("read", "", clock.clone());

    task.mark_completed();
    clock.advance_days(1);
    task.mark_completed();

    // The day after the last completion the streak still shows.
    clock.advance_days(1);
    assert_eq!(task.current_streak(), 2);

    // Completing on that day continues the run.
    task.mark_completed();
    assert_eq!(task.current_streak(), 3);
}

#[test]
fn test_undo_symmetry_after_six_day_run() {
    let clock = clock_at(2023, 10, 3);
    let mut task = Task::with_clock("hit the gym", "test description", clock.clone());

    for _ in 0..5 {
        clock.advance_days(1);
        task.mark_completed();
    }
    let day_five = task.last_completed().unwrap();

    clock.advance_days(1);
    task.mark_completed();

    assert_eq!(task.current_month_completion_count(), 6);
    assert_eq!(task.current_month_best_streak(), 6);

    task.mark_uncompleted();

    assert_eq!(task.current_month_completion_count(), 5);
    assert_eq!(task.current_month_best_streak(), 5);
    assert_eq!(task.last_completed(), Some(day_five));
}

#[test]
fn test_undo_before_any_completion_today_is_noop() {
    let clock = clock_at(2023, 10, 3);
    let mut task = Task::with_clock("walk", "", clock.clone());

    task.mark_uncompleted();
    assert_eq!(task.current_month_completion_count(), 0);

    task.mark_completed();
    clock.advance_days(1);

    // Yesterday's completion is not undoable.
    task.mark_uncompleted();
    assert_eq!(task.current_month_completion_count(), 1);
}

#[test]
fn test_week_window_spans_month_boundary() {
    // Daily completions March 30 through April 7; 2021-03-29 is a
    // Monday, so early-April windows reach back into March.
    let clock = clock_at(2021, 3, 30);
    let mut task = Task::with_clock("walk", "", clock.clone());

    for _ in 0..9 {
        task.mark_completed();
        clock.advance_days(1);
    }

    assert_eq!(task.week_completion_count(2021, 4, 1), 3);
    assert_eq!(task.week_completion_count(2021, 4, 4), 6);
    assert_eq!(task.week_completion_count(2021, 4, 7), 3);

    assert_eq!(task.month_completion_count(2021, 3), 2);
    assert_eq!(task.month_completion_count(2021, 4), 7);
    assert_eq!(task.year_completion_count(2021), 9);
}

#[test]
fn test_streak_and_ledger_span_year_boundary() {
    let clock = clock_at(2023, 12, 30);
    let mut task = Task::with_clock("walk", "", clock.clone());

    for _ in 0..4 {
        task.mark_completed();
        clock.advance_days(1);
    }

    // Completions: Dec 30, Dec 31, Jan 1, Jan 2; clock is on Jan 3.
    assert_eq!(task.current_streak(), 4);
    assert_eq!(task.year_completion_count(2023), 2);
    assert_eq!(task.year_completion_count(2024), 2);
    assert_eq!(task.year_best_streak(2023), 2);
    assert_eq!(task.year_best_streak(2024), 4);
    assert_eq!(task.month_best_streak(2023, 12), 2);
    assert_eq!(task.month_best_streak(2024, 1), 4);
}

#[test]
fn test_best_streak_remembers_longest_run() {
    let clock = clock_at(2024, 4, 1);
    let mut task = Task::with_clock("gym", "", clock.clone());

    for _ in 0..4 {
        task.mark_completed();
        clock.advance_days(1);
    }

    // Skip two days, run again for two.
    clock.advance_days(2);
    task.mark_completed();
    clock.advance_days(1);
    task.mark_completed();

    assert_eq!(task.current_streak(), 2);
    assert_eq!(task.current_month_best_streak(), 4);
}
