//! Habit completion and streak engine.
//!
//! A [`Task`] is the aggregate root: it owns a [`CompletionLedger`] of
//! per-day completion instants, a [`StreakTracker`] for run statistics,
//! identity fields and an injected [`Clock`](crate::clock::Clock). The
//! two owned structures are always mutated together and only through
//! [`Task::mark_completed`] and [`Task::mark_uncompleted`]; every query
//! is a pure read.
//!
//! The engine assumes exclusive access during any single call. It never
//! blocks, performs no I/O and holds no locks; hosts that share a task
//! across request handlers serialize access themselves.

pub mod codec;
pub mod ledger;
pub mod stats;
pub mod streak;

pub use codec::{decode_task, decode_tasks, encode_task, encode_tasks, SNAPSHOT_VERSION};
pub use ledger::CompletionLedger;
pub use stats::{CompletionSummary, StreakSummary};
pub use streak::{BestByMonth, ContinuityWindow, StreakCounter, StreakTracker};

use chrono::{DateTime, Datelike, Utc};
use tracing::debug;

use crate::clock::{system_clock, SharedClock};
use ledger::has_same_day_tail;

/// Whether two instants fall on the same calendar day.
#[must_use]
pub fn same_day(one: DateTime<Utc>, other: DateTime<Utc>) -> bool {
    one.date_naive() == other.date_naive()
}

/// A list of tasks, the unit the snapshot store works with.
pub type TaskList = Vec<Task>;

/// A recurring habit that can be completed once per calendar day.
///
/// # Example
///
/// ```
/// use ritual::habit::Task;
///
/// let mut task = Task::new("go for a walk", "walking is relaxing");
/// task.mark_completed();
///
/// assert!(task.was_completed_today());
/// assert_eq!(task.current_streak(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct Task {
    /// Identity name; the engine enforces no uniqueness.
    pub name: String,
    /// Free-form description.
    pub description: String,
    creation_date: DateTime<Utc>,
    version: String,
    clock: SharedClock,
    ledger: CompletionLedger,
    streak: StreakTracker,
}

impl Task {
    /// Create a task tracking the system clock.
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::with_clock(name, description, system_clock())
    }

    /// Create a task reading time from the given clock.
    ///
    /// The creation date is read from the clock once, here, and is
    /// immutable afterwards.
    #[must_use]
    pub fn with_clock(
        name: impl Into<String>,
        description: impl Into<String>,
        clock: SharedClock,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            creation_date: clock.now(),
            version: SNAPSHOT_VERSION.to_string(),
            clock,
            ledger: CompletionLedger::new(),
            streak: StreakTracker::new(),
        }
    }

    /// Instant the task was created.
    #[must_use]
    pub fn creation_date(&self) -> DateTime<Utc> {
        self.creation_date
    }

    /// Schema tag this task was decoded from (or the latest for new
    /// tasks).
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Replace the clock, e.g. after decoding a snapshot.
    pub fn set_clock(&mut self, clock: SharedClock) {
        self.clock = clock;
    }

    /// The completion ledger, for read-only inspection.
    #[must_use]
    pub fn ledger(&self) -> &CompletionLedger {
        &self.ledger
    }

    /// Instant of the most recent completion, `None` when never.
    #[must_use]
    pub fn last_completed(&self) -> Option<DateTime<Utc>> {
        self.streak.counter().last_completed()
    }

    /// Record a completion for the clock's current day.
    ///
    /// Idempotent within a calendar day: the second call on the same
    /// day changes nothing. Extends or restarts the streak, updates the
    /// month's best value when surpassed and appends to the ledger.
    pub fn mark_completed(&mut self) {
        let now = self.clock.now();

        if self.was_completed_today() {
            return;
        }

        self.streak.on_completed(now);

        // The tracker already refused a same-day repeat; this guards
        // the ledger independently against a tail entry on `now`'s day.
        if !has_same_day_tail(&self.ledger, now) {
            self.ledger.record(now);
        }

        debug!(task = %self.name, streak = self.streak.counter().count(), "completed");
    }

    /// Undo today's completion.
    ///
    /// A no-op unless the task was completed on the clock's current
    /// day. Pops the ledger entry, restores the previous completion as
    /// the streak's last one and decrements the run; when the undone
    /// completion had set the month's best value, that value is
    /// overwritten with the decremented run.
    ///
    /// # Panics
    ///
    /// Panics when the ledger's newest entry does not match the streak
    /// state. That means the single-writer contract was violated
    /// upstream; it is a programming fault, not a recoverable error.
    pub fn mark_uncompleted(&mut self) {
        if !self.was_completed_today() {
            return;
        }

        let undone = self
            .streak
            .counter()
            .last_completed()
            .expect("completed today implies a last completion");

        let removed = self.ledger.remove_last(undone.year(), undone.month());
        assert_eq!(
            removed,
            Some(undone),
            "ledger tail out of sync with streak state for task '{}'",
            self.name
        );

        let restored = self
            .ledger
            .last_in_month(undone.year(), undone.month())
            .copied();

        self.streak.on_uncompleted(undone, restored);

        debug!(task = %self.name, "uncompleted");
    }

    /// Whether the task was completed on the clock's current day.
    #[must_use]
    pub fn was_completed_today(&self) -> bool {
        self.streak
            .counter()
            .last_completed()
            .is_some_and(|last| same_day(self.clock.now(), last))
    }

    /// Whether the task was completed on the given calendar day.
    #[must_use]
    pub fn was_completed_on(&self, year: i32, month: u32, day: u32) -> bool {
        self.ledger.was_completed_on(year, month, day)
    }

    /// Whether the streak is still continued as of the clock's day.
    #[must_use]
    pub fn is_streak_continued(&self) -> bool {
        self.streak.counter().is_continued(self.clock.now())
    }

    /// Length of the in-progress consecutive-day run, zero once more
    /// than one day has passed without a completion.
    #[must_use]
    pub fn current_streak(&self) -> u32 {
        self.streak.counter().current(self.clock.now())
    }

    pub(crate) fn clock(&self) -> &SharedClock {
        &self.clock
    }

    pub(crate) fn streak_tracker(&self) -> &StreakTracker {
        &self.streak
    }
}

/// Find a task by name.
#[must_use]
pub fn find_task<'a>(tasks: &'a TaskList, name: &str) -> Option<&'a Task> {
    tasks.iter().find(|task| task.name == name)
}

/// Find a task by name for mutation.
pub fn find_task_mut<'a>(tasks: &'a mut TaskList, name: &str) -> Option<&'a mut Task> {
    tasks.iter_mut().find(|task| task.name == name)
}
