//! Exam countdown.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Outcome of a single countdown tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Still running, with this many seconds left.
    Running { remaining_secs: u64 },
    /// Reached zero on this tick. Reported exactly once.
    Expired,
    /// Already expired on an earlier tick.
    AlreadyExpired,
}

/// A one-shot countdown.
///
/// Each tick removes one `step` (one second unless built with
/// [`Countdown::with_step`]). The tick that reaches zero reports
/// [`TickOutcome::Expired`]; every later tick reports
/// [`TickOutcome::AlreadyExpired`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Countdown {
    remaining: Duration,
    step: Duration,
    expired: bool,
}

impl Countdown {
    pub fn new(duration_secs: u64) -> Self {
        Self::with_step(duration_secs, Duration::from_secs(1))
    }

    /// A countdown that loses `step` on every tick.
    pub fn with_step(duration_secs: u64, step: Duration) -> Self {
        Self {
            remaining: Duration::from_secs(duration_secs),
            step,
            expired: false,
        }
    }

    /// Whole seconds left, rounded up so `0` only shows once expired.
    pub fn remaining_secs(&self) -> u64 {
        let secs = self.remaining.as_secs();
        if self.remaining.subsec_nanos() > 0 {
            secs + 1
        } else {
            secs
        }
    }

    pub fn tick(&mut self) -> TickOutcome {
        if self.expired {
            return TickOutcome::AlreadyExpired;
        }
        self.remaining = self.remaining.saturating_sub(self.step);
        if self.remaining.is_zero() {
            self.expired = true;
            TickOutcome::Expired
        } else {
            TickOutcome::Running {
                remaining_secs: self.remaining_secs(),
            }
        }
    }

    /// Remaining time as `m:ss`.
    pub fn clock(&self) -> String {
        format_clock(self.remaining_secs())
    }
}

/// Format seconds as `m:ss` (minutes are not wrapped into hours).
pub fn format_clock(secs: u64) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_second_timer_expires_once_after_two_ticks() {
        let mut c = Countdown::new(2);
        assert_eq!(c.tick(), TickOutcome::Running { remaining_secs: 1 });
        assert_eq!(c.tick(), TickOutcome::Expired);
        assert_eq!(c.tick(), TickOutcome::AlreadyExpired);
        assert_eq!(c.tick(), TickOutcome::AlreadyExpired);
        assert_eq!(c.remaining_secs(), 0);
    }

    #[test]
    fn zero_duration_expires_on_first_tick() {
        let mut c = Countdown::new(0);
        assert_eq!(c.tick(), TickOutcome::Expired);
        assert_eq!(c.tick(), TickOutcome::AlreadyExpired);
    }

    #[test]
    fn half_second_steps_take_the_full_duration() {
        let mut c = Countdown::with_step(2, Duration::from_millis(500));
        assert_eq!(c.tick(), TickOutcome::Running { remaining_secs: 2 });
        assert_eq!(c.tick(), TickOutcome::Running { remaining_secs: 1 });
        assert_eq!(c.tick(), TickOutcome::Running { remaining_secs: 1 });
        assert_eq!(c.clock(), "0:01");
        assert_eq!(c.tick(), TickOutcome::Expired);
        assert_eq!(c.tick(), TickOutcome::AlreadyExpired);
        assert_eq!(c.clock(), "0:00");
    }

    #[test]
    fn step_larger_than_remaining_saturates() {
        let mut c = Countdown::with_step(1, Duration::from_millis(1500));
        assert_eq!(c.tick(), TickOutcome::Expired);
        assert_eq!(c.remaining_secs(), 0);
    }

    #[test]
    fn clock_format() {
        assert_eq!(format_clock(5400), "90:00");
        assert_eq!(format_clock(61), "1:01");
        assert_eq!(format_clock(9), "0:09");
        assert_eq!(Countdown::new(125).clock(), "2:05");
    }
}
