//! Time source capability.
//!
//! Every engine operation that needs "now" reads it from an injected
//! [`Clock`] rather than the ambient system time, so tests can drive a
//! task through days and weeks deterministically. The clock is read,
//! never mutated, and is not part of any persisted state.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};

/// A capability yielding the current instant on demand.
///
/// Implementations must be side-effect-free. The engine only ever calls
/// [`Clock::now`]; it never stores returned instants longer than the
/// operation that read them, except as completion dates.
pub trait Clock: fmt::Debug + Send + Sync {
    /// Return the current instant.
    fn now(&self) -> DateTime<Utc>;
}

/// Shared clock handle, cheap to clone into every task.
pub type SharedClock = Arc<dyn Clock>;

/// The real system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Convenience constructor for the default clock handle.
#[must_use]
pub fn system_clock() -> SharedClock {
    Arc::new(SystemClock)
}
