use chrono::{Local, NaiveDate, NaiveDateTime};

/// Source of "now" for imputed timestamps and signup dates.
pub trait Clock {
    fn now(&self) -> NaiveDateTime;

    /// Current date, i.e. `now` normalized to midnight.
    fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

/// Wall clock in the local timezone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// A clock frozen at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}
