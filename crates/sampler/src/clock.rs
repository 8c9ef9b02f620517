use chrono::{Duration, Local, NaiveDateTime};
use dash_core::{DashError, Result, Timestamp};

/// Wall-clock source for reading timestamps.
///
/// Reading the clock may fail for non-system clocks; the sampler then abandons
/// that tick and leaves its window untouched.
pub trait Clock: Send + std::fmt::Debug {
    fn now(&mut self) -> Result<Timestamp>;
}

/// Local system time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&mut self) -> Result<Timestamp> {
        Ok(Timestamp::new(Local::now().naive_local()))
    }
}

/// Deterministic clock that starts at a fixed instant and advances by `step`
/// on every read.
#[derive(Debug, Clone)]
pub struct SteppingClock {
    next: NaiveDateTime,
    step: Duration,
}

impl SteppingClock {
    pub fn new(start: NaiveDateTime, step: Duration) -> Self {
        Self { next: start, step }
    }

    /// Parse `start` in the reading timestamp format.
    pub fn starting_at(start: &str, step: Duration) -> Result<Self> {
        let start = Timestamp::parse(start)
            .ok_or_else(|| DashError::Clock(format!("invalid start time '{start}'")))?;
        Ok(Self::new(start.as_datetime(), step))
    }
}

impl Clock for SteppingClock {
    fn now(&mut self) -> Result<Timestamp> {
        let now = self.next;
        self.next = now
            .checked_add_signed(self.step)
            .ok_or_else(|| DashError::Clock("clock overflowed".into()))?;
        Ok(Timestamp::new(now))
    }
}
