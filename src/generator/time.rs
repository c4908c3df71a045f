//! Time sources and elapsed-time arithmetic
//!
//! The engine reads wall-clock time through [`Clock`] so tests can drive it
//! with a [`ManualClock`]. [`TimeBase`] converts Unix milliseconds into
//! elapsed units since the configured base time and back.

use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Utc};

use crate::config::{GeneratorOptions, TimestampUnit};

/// Source of wall-clock time in milliseconds since the Unix epoch
pub trait Clock: Send + Sync + fmt::Debug {
    fn unix_millis(&self) -> i64;
}

/// Reads the system clock
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    #[inline(always)]
    fn unix_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// A clock that only moves when told to
#[derive(Debug, Default)]
pub struct ManualClock {
    millis: AtomicI64,
}

impl ManualClock {
    pub fn new(unix_millis: i64) -> Self {
        Self {
            millis: AtomicI64::new(unix_millis),
        }
    }

    pub fn starting_at(time: DateTime<Utc>) -> Self {
        Self::new(time.timestamp_millis())
    }

    pub fn set(&self, unix_millis: i64) {
        self.millis.store(unix_millis, Ordering::Release);
    }

    /// Move the clock by `delta_ms`, which may be negative
    pub fn advance(&self, delta_ms: i64) {
        self.millis.fetch_add(delta_ms, Ordering::AcqRel);
    }
}

impl Clock for ManualClock {
    #[inline(always)]
    fn unix_millis(&self) -> i64 {
        self.millis.load(Ordering::Acquire)
    }
}

/// Base time plus unit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TimeBase {
    base_ms: i64,
    unit_ms: i64,
}

impl TimeBase {
    pub(crate) fn new(base_time: DateTime<Utc>, unit: TimestampUnit) -> Self {
        Self {
            base_ms: base_time.timestamp_millis(),
            unit_ms: unit.millis(),
        }
    }

    pub(crate) fn for_options(options: &GeneratorOptions) -> Self {
        Self::new(options.base_time(), options.timestamp_unit())
    }

    #[inline(always)]
    pub(crate) fn unit_ms(&self) -> i64 {
        self.unit_ms
    }

    /// Elapsed whole units since the base time; negative before it
    #[inline(always)]
    pub(crate) fn elapsed(&self, unix_millis: i64) -> i64 {
        (unix_millis - self.base_ms).div_euclid(self.unit_ms)
    }

    /// Unix milliseconds at which `units` begins, saturating on overflow
    #[inline(always)]
    pub(crate) fn to_unix_millis(&self, units: i64) -> i64 {
        units.saturating_mul(self.unit_ms).saturating_add(self.base_ms)
    }

    /// Instant at which `units` begins, clamped to the range chrono can represent
    pub(crate) fn to_datetime(&self, units: i64) -> DateTime<Utc> {
        let millis = self.to_unix_millis(units);
        DateTime::from_timestamp_millis(millis).unwrap_or(if millis < 0 {
            DateTime::<Utc>::MIN_UTC
        } else {
            DateTime::<Utc>::MAX_UTC
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_is_reasonable() {
        let now = SystemClock.unix_millis();
        // Should be after 2024-01-01
        assert!(now > 1704067200000);
        // Should be before 2100-01-01
        assert!(now < 4102444800000);
    }

    #[test]
    fn test_manual_clock_moves_both_ways() {
        let clock = ManualClock::new(1_000);
        clock.advance(500);
        assert_eq!(clock.unix_millis(), 1_500);
        clock.advance(-2_000);
        assert_eq!(clock.unix_millis(), -500);
        clock.set(42);
        assert_eq!(clock.unix_millis(), 42);
    }

    #[test]
    fn test_elapsed_in_seconds_rounds_down() {
        let base = DateTime::from_timestamp_millis(10_000).unwrap();
        let tb = TimeBase::new(base, TimestampUnit::Seconds);

        assert_eq!(tb.elapsed(10_000), 0);
        assert_eq!(tb.elapsed(10_999), 0);
        assert_eq!(tb.elapsed(11_000), 1);
        assert_eq!(tb.elapsed(9_999), -1);
        assert_eq!(tb.to_unix_millis(3), 13_000);
    }

    #[test]
    fn test_to_datetime_saturates() {
        let tb = TimeBase::new(DateTime::<Utc>::default(), TimestampUnit::Seconds);
        assert_eq!(tb.to_datetime(i64::MAX), DateTime::<Utc>::MAX_UTC);
        assert_eq!(tb.to_datetime(2).timestamp_millis(), 2_000);
    }
}
