//! ID generation logic
//!
//! Every attempt runs under the engine lock: read the clock, clamp it
//! against backward jumps, then let the algorithm pick the next
//! (timestamp, sequence) pair. When the sequence is exhausted the lock is
//! dropped before waiting for the clock.

use tracing::{error, trace, warn};

use super::algorithm::{Step, Strategy};
use super::state::EngineState;
use super::{wait, SnowflakeEngine};
use crate::error::{Error, Result};

/// Upper bound on the up-front allocation of a batch; larger batches grow
pub(crate) const MAX_BATCH_PREALLOC: usize = 4096;

/// Validate a batch size and turn it into an iteration count
#[inline]
pub(crate) fn checked_count(count: i64) -> Result<usize> {
    if count <= 0 {
        return Err(Error::InvalidCount { count });
    }
    usize::try_from(count).map_err(|_| Error::InvalidCount { count })
}

/// Empty buffer for a batch of `count` items
#[inline]
pub(crate) fn batch_buffer<T>(count: usize) -> Vec<T> {
    Vec::with_capacity(count.min(MAX_BATCH_PREALLOC))
}

impl SnowflakeEngine {
    /// Generate a new unique id
    ///
    /// Blocks while the sequence of the current time unit is exhausted and
    /// no future unit may be borrowed.
    ///
    /// # Errors
    ///
    /// Fails when the clock moved back beyond the tolerance, reads before
    /// the base time, or the timestamp field overflowed.
    pub fn next_id(&self) -> Result<i64> {
        loop {
            match self.try_next_id()? {
                Step::Ready(id) => return Ok(id),
                Step::Pending { until } => self.wait_for(until),
            }
        }
    }

    /// Generate `count` ids, one lock acquisition per id
    pub fn next_ids(&self, count: i64) -> Result<Vec<i64>> {
        let count = checked_count(count)?;
        let mut ids = batch_buffer(count);
        for _ in 0..count {
            ids.push(self.next_id()?);
        }
        Ok(ids)
    }

    /// One attempt under the lock
    pub(crate) fn try_next_id(&self) -> Result<Step> {
        let mut state = self.state.lock();
        let now = self.observe_clock(&mut state)?;
        let step = self.algorithm.advance(&mut state, now)?;
        if let Step::Ready(_) = step {
            state.issued += 1;
        }
        Ok(step)
    }

    /// Read the clock and clamp it to the highest reading seen so far
    fn observe_clock(&self, state: &mut EngineState) -> Result<i64> {
        let unix_ms = self.clock.unix_millis();
        let now = self.time_base.elapsed(unix_ms);
        if now < 0 {
            return Err(Error::ClockBeforeBaseTime {
                delta_ms: self.time_base.to_unix_millis(0).saturating_sub(unix_ms),
            });
        }

        if now >= state.last_wall_timestamp {
            state.last_wall_timestamp = now;
            state.clock_behind = false;
            return Ok(now);
        }

        let delta_ms = (state.last_wall_timestamp - now).saturating_mul(self.time_base.unit_ms());
        if delta_ms > i64::from(self.tolerance_ms) {
            error!(
                delta_ms,
                tolerance_ms = self.tolerance_ms,
                "Clock moved backwards beyond tolerance"
            );
            return Err(Error::ClockMovedBackwards {
                delta_ms,
                tolerance_ms: self.tolerance_ms,
            });
        }

        if !state.clock_behind {
            state.clock_behind = true;
            state.clock_backward_events += 1;
            warn!(
                delta_ms,
                tolerance_ms = self.tolerance_ms,
                "Clock moved backwards, holding last timestamp until it catches up"
            );
        }
        Ok(state.last_wall_timestamp)
    }

    /// Block the current thread until the clock reaches `until` units
    fn wait_for(&self, until: i64) {
        trace!(until, "Sequence exhausted, waiting for next time unit");
        wait::wait_until(until, &self.spin, || self.now_units());
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::config::{GeneratorOptions, Method};
    use crate::generator::ManualClock;

    const BASE_MS: i64 = 1_582_165_202_020;

    fn engine(method: Method, tolerance: u32) -> (SnowflakeEngine, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(BASE_MS + 10_000));
        let options = GeneratorOptions::builder()
            .method(method)
            .worker_id(1)
            .unwrap()
            .max_backward_tolerance_ms(tolerance)
            .unwrap()
            .build()
            .unwrap();
        let engine = SnowflakeEngine::with_clock(options, clock.clone()).unwrap();
        (engine, clock)
    }

    #[test]
    fn test_checked_count() {
        assert_eq!(checked_count(1).unwrap(), 1);
        assert_eq!(checked_count(0), Err(Error::InvalidCount { count: 0 }));
        assert_eq!(checked_count(-1), Err(Error::InvalidCount { count: -1 }));
    }

    #[test]
    fn test_batch_buffer_capacity_is_bounded() {
        assert!(batch_buffer::<i64>(3).capacity() >= 3);
        let huge = batch_buffer::<i64>(usize::MAX);
        assert!(huge.capacity() >= MAX_BATCH_PREALLOC);
        assert!(huge.capacity() < 2 * MAX_BATCH_PREALLOC);
    }

    #[test]
    fn test_issued_counts_minted_ids() {
        let (engine, _clock) = engine(Method::Drift, 1000);
        engine.next_ids(10).unwrap();
        assert_eq!(engine.state.lock().issued, 10);
    }

    #[test]
    fn test_small_regression_is_absorbed() {
        let (engine, clock) = engine(Method::Classic, 1000);
        let first = engine.next_id().unwrap();

        clock.advance(-500);
        let second = engine.next_id().unwrap();
        let third = engine.next_id().unwrap();

        assert!(second > first && third > second);
        assert_eq!(engine.extract.timestamp(second), engine.extract.timestamp(first));
        // One regression episode, however many ids were minted during it
        assert_eq!(engine.state.lock().clock_backward_events, 1);
    }

    #[test]
    fn test_large_regression_is_rejected() {
        let (engine, clock) = engine(Method::Classic, 1000);
        engine.next_id().unwrap();

        clock.advance(-1001);
        assert_eq!(
            engine.next_id(),
            Err(Error::ClockMovedBackwards {
                delta_ms: 1001,
                tolerance_ms: 1000
            })
        );

        // Recovers once the clock is back within tolerance
        clock.advance(1001);
        assert!(engine.next_id().is_ok());
    }

    #[test]
    fn test_zero_tolerance_rejects_any_regression() {
        let (engine, clock) = engine(Method::Drift, 0);
        engine.next_id().unwrap();
        clock.advance(-1);
        assert!(matches!(
            engine.next_id(),
            Err(Error::ClockMovedBackwards { delta_ms: 1, .. })
        ));
    }

    #[test]
    fn test_clock_before_base_time() {
        let (engine, clock) = engine(Method::Drift, 1000);
        clock.set(BASE_MS - 250);
        assert_eq!(
            engine.next_id(),
            Err(Error::ClockBeforeBaseTime { delta_ms: 250 })
        );
    }

    #[test]
    fn test_drift_lead_is_not_a_regression() {
        let (engine, _clock) = engine(Method::Drift, 0);
        // Default sequence space is 5..=63, so this borrows several units
        // while the clock stands still
        let ids = engine.next_ids(500).unwrap();
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
        let state = engine.state.lock();
        assert!(state.over_cost_count > 0);
        assert_eq!(state.clock_backward_events, 0);
    }
}
