//! Wait and backoff strategies for sequence exhaustion
//!
//! Implements spin-wait and exponential backoff for waiting until the clock
//! reaches a target time unit. Callers never hold the engine lock while
//! waiting.

use std::thread;
use std::time::Duration;

use crate::config::GeneratorOptions;

/// Maximum backoff duration in milliseconds
pub const MAX_BACKOFF_MS: u64 = 100;

/// Spin tuning copied out of the options
#[derive(Debug, Clone, Copy)]
pub(crate) struct SpinConfig {
    enabled: bool,
    loops: u32,
    yield_every: u32,
}

impl SpinConfig {
    pub(crate) fn for_options(options: &GeneratorOptions) -> Self {
        Self {
            enabled: options.spin_enabled(),
            loops: options.spin_loops(),
            yield_every: options.spin_yield_every(),
        }
    }
}

/// Perform spin-wait loop, checking whether the clock reached `until`
///
/// Returns Some(now) if it did, None if spin loops exhausted
#[inline]
pub(crate) fn spin_wait<F>(until: i64, spin: &SpinConfig, get_time: F) -> Option<i64>
where
    F: Fn() -> i64,
{
    if !spin.enabled || spin.loops == 0 {
        return None;
    }

    for i in 0..spin.loops {
        let now = get_time();
        if now >= until {
            return Some(now);
        }

        std::hint::spin_loop();

        if spin.yield_every != 0 && i % spin.yield_every == spin.yield_every - 1 {
            thread::yield_now();
        }
    }

    None
}

/// Sleep with exponential backoff, returning the clock once it reached `until`
#[inline]
pub(crate) fn sleep_until<F>(until: i64, mut backoff_ms: u64, get_time: F) -> i64
where
    F: Fn() -> i64,
{
    loop {
        thread::sleep(Duration::from_millis(backoff_ms));
        let now = get_time();
        if now >= until {
            return now;
        }
        backoff_ms = next_backoff(backoff_ms);
    }
}

/// Block until the clock reaches `until`, spinning briefly before sleeping
pub(crate) fn wait_until<F>(until: i64, spin: &SpinConfig, get_time: F) -> i64
where
    F: Fn() -> i64,
{
    if let Some(now) = spin_wait(until, spin, &get_time) {
        return now;
    }
    sleep_until(until, 1, get_time)
}

/// Calculate next backoff duration with exponential growth capped at MAX_BACKOFF_MS
#[inline(always)]
pub const fn next_backoff(current: u64) -> u64 {
    let next = current.saturating_mul(2);
    if next > MAX_BACKOFF_MS {
        MAX_BACKOFF_MS
    } else {
        next
    }
}
