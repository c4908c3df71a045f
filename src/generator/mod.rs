//! Core snowflake engine implementation
//!
//! Split into modules for testability:
//! - `state` - Mutex-guarded timestamp, sequence and drift bookkeeping
//! - `algorithm` - Classic and drift packing strategies
//! - `time` - Clock sources and elapsed-time arithmetic
//! - `wait` - Spin and backoff strategies
//! - `generate` - ID generation logic
//! - `string_methods` - String form of generated ids
//! - `stats` - Diagnostic snapshot
//! - `async_methods` - Cancellable async variants

mod algorithm;
#[cfg(feature = "async-tokio")]
mod async_methods;
mod generate;
mod state;
mod stats;
mod string_methods;
pub(crate) mod time;
mod wait;

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use crate::config::{ConfigError, GeneratorOptions, Method};
use crate::error::Result;
use crate::extractor::SnowflakeExtractor;
use crate::format::IdFormatter;

use algorithm::Algorithm;
use state::EngineState;
use time::TimeBase;
use wait::SpinConfig;

pub use stats::GeneratorStats;
pub use time::{Clock, ManualClock, SystemClock};

/// Snowflake id engine for one (worker id, data center id) pair
///
/// Share it between threads through an [`Arc`]; every id is minted under
/// one internal lock.
#[derive(Debug)]
pub struct SnowflakeEngine {
    // === Hot path fields ===
    state: Mutex<EngineState>,
    algorithm: Algorithm,
    time_base: TimeBase,
    clock: Arc<dyn Clock>,
    tolerance_ms: u32,

    // === Cold path fields ===
    spin: SpinConfig,
    formatter: IdFormatter,
    options: GeneratorOptions,
    pub extract: SnowflakeExtractor,
}

impl SnowflakeEngine {
    /// Create an engine reading the system clock
    pub fn new(options: GeneratorOptions) -> Result<Self> {
        Self::with_clock(options, Arc::new(SystemClock))
    }

    /// Create with default options apart from the worker id
    pub fn for_worker(worker_id: u16) -> Result<Self> {
        let options = GeneratorOptions::builder().worker_id(worker_id)?.build()?;
        Self::new(options)
    }

    /// Create an engine reading time from `clock`
    pub fn with_clock(options: GeneratorOptions, clock: Arc<dyn Clock>) -> Result<Self> {
        options.validate()?;
        let engine = Self::build(options, clock);
        engine.check_timestamp_fits()?;
        debug!(
            generator_id = engine.options.generator_id(),
            method = %engine.method(),
            worker_id = engine.options.worker_id(),
            data_center_id = engine.options.data_center_id(),
            timestamp_bits = engine.options.layout().timestamp_bits(),
            "Snowflake engine ready"
        );
        Ok(engine)
    }

    fn build(options: GeneratorOptions, clock: Arc<dyn Clock>) -> Self {
        Self {
            state: Mutex::new(EngineState::new(options.min_seq_number())),
            algorithm: Algorithm::for_options(&options),
            time_base: TimeBase::for_options(&options),
            clock,
            tolerance_ms: options.max_backward_tolerance_ms(),
            spin: SpinConfig::for_options(&options),
            formatter: IdFormatter::for_options(&options),
            extract: SnowflakeExtractor::for_options(&options),
            options,
        }
    }

    /// Reject layouts whose timestamp field is already too narrow for the
    /// current clock reading
    fn check_timestamp_fits(&self) -> Result<()> {
        let layout = self.options.layout();
        let elapsed = self.time_base.elapsed(self.clock.unix_millis());
        if elapsed > layout.max_timestamp() {
            return Err(ConfigError::TimestampFieldTooNarrow {
                worker_id_bit_length: layout.worker_bits(),
                seq_bit_length: layout.seq_bits(),
                data_center_id_bit_length: layout.data_center_bits(),
                timestamp_bits: layout.timestamp_bits(),
                elapsed,
            }
            .into());
        }
        Ok(())
    }

    /// The engine's own copy of its options
    #[inline(always)]
    pub fn options(&self) -> &GeneratorOptions {
        &self.options
    }

    #[inline(always)]
    pub fn method(&self) -> Method {
        self.algorithm.method()
    }

    #[inline(always)]
    pub fn formatter(&self) -> &IdFormatter {
        &self.formatter
    }

    /// Current clock reading in elapsed units
    #[inline(always)]
    pub(crate) fn now_units(&self) -> i64 {
        self.time_base.elapsed(self.clock.unix_millis())
    }
}
