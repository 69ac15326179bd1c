//! Time source abstraction.
//!
//! Every component that compares against "now" receives a [`Clock`] instead of
//! reading the wall clock, so scheduling decisions are reproducible in tests
//! and in scenario replay.
//!
//! # Example
//!
//! ```
//! use arrivalseq::time::{Clock, ManualClock};
//! use chrono::{Duration, TimeZone, Utc};
//!
//! let start = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
//! let clock = ManualClock::new(start);
//! clock.advance(Duration::minutes(5));
//! assert_eq!(clock.now(), start + Duration::minutes(5));
//! ```

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;

/// Source of the current time.
pub trait Clock: Send + Sync {
    /// Returns the current time.
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time source used in production.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually driven clock for tests and scenario replay.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    /// Create a clock frozen at `now`.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    /// Set the current time.
    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.lock() = now;
    }

    /// Move the clock forward by `delta`.
    pub fn advance(&self, delta: Duration) {
        let mut now = self.now.lock();
        *now += delta;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock()
    }
}

/// Format a duration as signed `mm:ss`, e.g. `-03:00`.
pub fn format_delay(delay: Duration) -> String {
    let total = delay.num_seconds();
    let sign = if total < 0 { "-" } else { "" };
    let total = total.abs();
    format!("{}{:02}:{:02}", sign, total / 60, total % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap()
    }

    #[test]
    fn manual_clock_returns_set_time() {
        let clock = ManualClock::new(start());
        assert_eq!(clock.now(), start());

        let later = start() + Duration::hours(1);
        clock.set(later);
        assert_eq!(clock.now(), later);
    }

    #[test]
    fn manual_clock_advances() {
        let clock = ManualClock::new(start());
        clock.advance(Duration::seconds(90));
        clock.advance(Duration::seconds(30));
        assert_eq!(clock.now(), start() + Duration::minutes(2));
    }

    #[test]
    fn system_clock_is_close_to_utc_now() {
        let before = Utc::now();
        let now = SystemClock.now();
        assert!(now >= before);
        assert!(now - before < Duration::seconds(1));
    }

    #[test]
    fn format_delay_handles_sign() {
        assert_eq!(format_delay(Duration::minutes(5)), "05:00");
        assert_eq!(format_delay(Duration::seconds(-180)), "-03:00");
        assert_eq!(format_delay(Duration::seconds(75)), "01:15");
        assert_eq!(format_delay(Duration::zero()), "00:00");
    }
}
