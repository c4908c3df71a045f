//! GeneratorOptions builder for constructing validated configuration

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};

use super::{ConfigError, GeneratorOptions, Method, TimestampUnit};

/// Default configuration values
pub(super) const DEFAULT_BASE_TIME_MS: i64 = 1_582_165_202_020; // 2020-02-20 02:20:02.020 UTC
pub(super) const DEFAULT_WORKER_ID_BIT_LENGTH: u8 = 6;
pub(super) const DEFAULT_DATA_CENTER_ID_BIT_LENGTH: u8 = 5;
pub(super) const DEFAULT_SEQ_BIT_LENGTH: u8 = 6;
pub(super) const DEFAULT_MIN_SEQ_NUMBER: u32 = 5;
pub(super) const DEFAULT_TOP_OVER_COST_COUNT: u32 = 2000;
pub(super) const DEFAULT_MAX_BACKWARD_TOLERANCE_MS: u32 = 1000;
pub(super) const DEFAULT_SPIN_ENABLED: bool = true;
pub(super) const DEFAULT_SPIN_LOOPS: u32 = 64;
pub(super) const DEFAULT_SPIN_YIELD_EVERY: u32 = 16;

/// Legal bounds
pub(crate) const MAX_WORKER_ID_BIT_LENGTH: u8 = 15;
pub(crate) const MAX_DATA_CENTER_ID_BIT_LENGTH: u8 = 10;
pub(crate) const MIN_SEQ_BIT_LENGTH: u8 = 3;
pub(crate) const MAX_SEQ_BIT_LENGTH: u8 = 21;
pub(crate) const MAX_WORKER_AND_SEQ_BITS: u8 = 22;
pub(crate) const MAX_MIN_SEQ_NUMBER: u32 = 127;
pub(crate) const MAX_TOP_OVER_COST_COUNT: u32 = 10_000;
pub(crate) const MAX_BACKWARD_TOLERANCE_MS: u32 = 60_000;
const MIN_FIXED_ID_LENGTH: u8 = 10;
const MAX_FIXED_ID_LENGTH: u8 = 20;

static GENERATOR_COUNTER: AtomicU64 = AtomicU64::new(0);

fn default_base_time() -> DateTime<Utc> {
    DateTime::from_timestamp_millis(DEFAULT_BASE_TIME_MS).unwrap_or_default()
}

fn auto_generator_id() -> String {
    let n = GENERATOR_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("snowflake-{}-{}", std::process::id(), n)
}

/// Builder for GeneratorOptions
///
/// Every fallible setter validates its own range and any cross-field
/// invariant it participates in against the values set so far, so a
/// conflicting combination is reported by whichever setter completes it.
#[derive(Debug, Clone)]
pub struct GeneratorOptionsBuilder {
    options: GeneratorOptions,
}

impl GeneratorOptionsBuilder {
    /// Create a new GeneratorOptionsBuilder with default values
    pub fn new() -> Self {
        Self {
            options: GeneratorOptions {
                base_time: default_base_time(),
                timestamp_unit: TimestampUnit::Milliseconds,
                method: Method::Drift,
                worker_id: 0,
                worker_id_bit_length: DEFAULT_WORKER_ID_BIT_LENGTH,
                data_center_id: 0,
                data_center_id_bit_length: DEFAULT_DATA_CENTER_ID_BIT_LENGTH,
                seq_bit_length: DEFAULT_SEQ_BIT_LENGTH,
                max_seq_number: None,
                min_seq_number: DEFAULT_MIN_SEQ_NUMBER,
                top_over_cost_count: DEFAULT_TOP_OVER_COST_COUNT,
                max_backward_tolerance_ms: DEFAULT_MAX_BACKWARD_TOLERANCE_MS,
                looped_sequence: false,
                id_length: 0,
                id_prefix: String::new(),
                generator_id: String::new(),
                spin_enabled: DEFAULT_SPIN_ENABLED,
                spin_loops: DEFAULT_SPIN_LOOPS,
                spin_yield_every: DEFAULT_SPIN_YIELD_EVERY,
            },
        }
    }

    pub(super) fn from_options(options: GeneratorOptions) -> Self {
        Self { options }
    }

    /// Set the epoch the timestamp field is measured from
    pub fn base_time(mut self, base_time: DateTime<Utc>) -> Result<Self, ConfigError> {
        check_base_time(base_time)?;
        self.options.base_time = base_time;
        Ok(self)
    }

    /// Set the epoch as milliseconds since the Unix epoch
    pub fn base_time_millis(self, millis: i64) -> Result<Self, ConfigError> {
        match DateTime::from_timestamp_millis(millis) {
            Some(base_time) => self.base_time(base_time),
            None if millis < 0 => Err(ConfigError::BaseTimeBeforeUnixEpoch {
                base_time: DateTime::<Utc>::MIN_UTC,
            }),
            None => Err(ConfigError::BaseTimeInFuture {
                base_time: DateTime::<Utc>::MAX_UTC,
            }),
        }
    }

    pub const fn timestamp_unit(mut self, unit: TimestampUnit) -> Self {
        self.options.timestamp_unit = unit;
        self
    }

    pub const fn method(mut self, method: Method) -> Self {
        self.options.method = method;
        self
    }

    /// Set the worker id; must fit the current worker id bit length
    pub fn worker_id(mut self, worker_id: u16) -> Result<Self, ConfigError> {
        check_worker_id(worker_id, self.options.worker_id_bit_length)?;
        self.options.worker_id = worker_id;
        Ok(self)
    }

    /// Set the number of bits for the worker id (1-15)
    pub fn worker_id_bit_length(mut self, bits: u8) -> Result<Self, ConfigError> {
        check_worker_id_bit_length(bits)?;
        check_bit_length_sum(bits, self.options.seq_bit_length)?;
        check_worker_id(self.options.worker_id, bits)?;
        self.options.worker_id_bit_length = bits;
        Ok(self)
    }

    /// Set the data center id; must fit the current data center id bit length
    pub fn data_center_id(mut self, data_center_id: u16) -> Result<Self, ConfigError> {
        check_data_center_id(data_center_id, self.options.data_center_id_bit_length)?;
        self.options.data_center_id = data_center_id;
        Ok(self)
    }

    /// Set the number of bits for the data center id (1-10)
    pub fn data_center_id_bit_length(mut self, bits: u8) -> Result<Self, ConfigError> {
        check_data_center_id_bit_length(bits)?;
        check_data_center_id(self.options.data_center_id, bits)?;
        self.options.data_center_id_bit_length = bits;
        Ok(self)
    }

    /// Set the number of bits for the sequence (3-21)
    ///
    /// Unless a max sequence number was set explicitly, the max follows the
    /// new bit length.
    pub fn seq_bit_length(mut self, bits: u8) -> Result<Self, ConfigError> {
        check_seq_bit_length(bits)?;
        check_bit_length_sum(self.options.worker_id_bit_length, bits)?;
        match self.options.max_seq_number {
            Some(max) => check_max_seq_number(max, bits, self.options.min_seq_number)?,
            None => check_min_seq_number(
                self.options.min_seq_number,
                GeneratorOptions::max_for_bits(bits),
            )?,
        }
        self.options.seq_bit_length = bits;
        Ok(self)
    }

    /// Set the highest sequence used within one time unit
    pub fn max_seq_number(mut self, value: u32) -> Result<Self, ConfigError> {
        check_max_seq_number(
            value,
            self.options.seq_bit_length,
            self.options.min_seq_number,
        )?;
        self.options.max_seq_number = Some(value);
        Ok(self)
    }

    /// Set the sequence every new time unit starts from (0-127)
    pub fn min_seq_number(mut self, value: u32) -> Result<Self, ConfigError> {
        check_min_seq_number(value, self.options.max_seq_number())?;
        self.options.min_seq_number = value;
        Ok(self)
    }

    /// Set how many time units drift may borrow ahead of the clock (0-10000)
    pub fn top_over_cost_count(mut self, value: u32) -> Result<Self, ConfigError> {
        if value > MAX_TOP_OVER_COST_COUNT {
            return Err(ConfigError::TopOverCostCountOutOfRange { value });
        }
        self.options.top_over_cost_count = value;
        Ok(self)
    }

    /// Set the largest backward clock jump absorbed silently (0-60000ms)
    pub fn max_backward_tolerance_ms(mut self, value: u32) -> Result<Self, ConfigError> {
        if value > MAX_BACKWARD_TOLERANCE_MS {
            return Err(ConfigError::BackwardToleranceOutOfRange { value });
        }
        self.options.max_backward_tolerance_ms = value;
        Ok(self)
    }

    /// Wrap the sequence inside the same time unit instead of advancing time
    pub const fn looped_sequence(mut self, looped: bool) -> Self {
        self.options.looped_sequence = looped;
        self
    }

    /// Set the fixed width of string ids; 0 disables padding
    pub fn id_length(mut self, value: u8) -> Result<Self, ConfigError> {
        check_id_length(value)?;
        self.options.id_length = value;
        Ok(self)
    }

    /// Set the literal prefix of string ids; blank input clears it
    pub fn id_prefix(mut self, prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        self.options.id_prefix = if prefix.trim().is_empty() {
            String::new()
        } else {
            prefix
        };
        self
    }

    /// Set the diagnostic label; blank input falls back to a generated label
    pub fn generator_id(mut self, id: impl Into<String>) -> Self {
        let id = id.into();
        self.options.generator_id = if id.trim().is_empty() {
            String::new()
        } else {
            id
        };
        self
    }

    /// Enable or disable micro spin before sleep on exhaustion
    pub const fn enable_spin(mut self, enable: bool) -> Self {
        self.options.spin_enabled = enable;
        self
    }

    /// Set number of spin loops attempted before falling back to sleep
    pub const fn spin_loops(mut self, loops: u32) -> Self {
        self.options.spin_loops = loops;
        self
    }

    /// Set spin yield cadence. Yield every N spin iterations; 0 disables yielding
    pub const fn spin_yield_every(mut self, n: u32) -> Self {
        self.options.spin_yield_every = n;
        self
    }

    /// Build the final GeneratorOptions
    pub fn build(self) -> Result<GeneratorOptions, ConfigError> {
        let options = self.into_options();
        validate(&options)?;
        Ok(options)
    }

    /// Finish without the final check; only sound for values assembled by
    /// the validating setters
    pub(super) fn into_options(mut self) -> GeneratorOptions {
        if self.options.generator_id.is_empty() {
            self.options.generator_id = auto_generator_id();
        }
        self.options
    }
}

impl Default for GeneratorOptionsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Full check of an assembled options value
pub(super) fn validate(options: &GeneratorOptions) -> Result<(), ConfigError> {
    check_base_time(options.base_time)?;
    check_worker_id_bit_length(options.worker_id_bit_length)?;
    check_data_center_id_bit_length(options.data_center_id_bit_length)?;
    check_seq_bit_length(options.seq_bit_length)?;
    check_bit_length_sum(options.worker_id_bit_length, options.seq_bit_length)?;
    check_worker_id(options.worker_id, options.worker_id_bit_length)?;
    check_data_center_id(options.data_center_id, options.data_center_id_bit_length)?;
    if let Some(max) = options.max_seq_number {
        check_max_seq_number(max, options.seq_bit_length, options.min_seq_number)?;
    }
    check_min_seq_number(options.min_seq_number, options.max_seq_number())?;
    if options.top_over_cost_count > MAX_TOP_OVER_COST_COUNT {
        return Err(ConfigError::TopOverCostCountOutOfRange {
            value: options.top_over_cost_count,
        });
    }
    if options.max_backward_tolerance_ms > MAX_BACKWARD_TOLERANCE_MS {
        return Err(ConfigError::BackwardToleranceOutOfRange {
            value: options.max_backward_tolerance_ms,
        });
    }
    check_id_length(options.id_length)
}

fn check_base_time(base_time: DateTime<Utc>) -> Result<(), ConfigError> {
    if base_time.timestamp_millis() < 0 {
        return Err(ConfigError::BaseTimeBeforeUnixEpoch { base_time });
    }
    if base_time > Utc::now() {
        return Err(ConfigError::BaseTimeInFuture { base_time });
    }
    Ok(())
}

fn check_worker_id_bit_length(bits: u8) -> Result<(), ConfigError> {
    if !(1..=MAX_WORKER_ID_BIT_LENGTH).contains(&bits) {
        return Err(ConfigError::WorkerIdBitLengthOutOfRange { bits });
    }
    Ok(())
}

fn check_data_center_id_bit_length(bits: u8) -> Result<(), ConfigError> {
    if !(1..=MAX_DATA_CENTER_ID_BIT_LENGTH).contains(&bits) {
        return Err(ConfigError::DataCenterIdBitLengthOutOfRange { bits });
    }
    Ok(())
}

fn check_seq_bit_length(bits: u8) -> Result<(), ConfigError> {
    if !(MIN_SEQ_BIT_LENGTH..=MAX_SEQ_BIT_LENGTH).contains(&bits) {
        return Err(ConfigError::SeqBitLengthOutOfRange { bits });
    }
    Ok(())
}

fn check_bit_length_sum(worker_id_bit_length: u8, seq_bit_length: u8) -> Result<(), ConfigError> {
    if worker_id_bit_length + seq_bit_length > MAX_WORKER_AND_SEQ_BITS {
        return Err(ConfigError::BitLengthSumExceeded {
            worker_id_bit_length,
            seq_bit_length,
        });
    }
    Ok(())
}

fn check_worker_id(worker_id: u16, bits: u8) -> Result<(), ConfigError> {
    let max = GeneratorOptions::max_for_bits(bits) as u16;
    if worker_id > max {
        return Err(ConfigError::WorkerIdOutOfRange { worker_id, max });
    }
    Ok(())
}

fn check_data_center_id(data_center_id: u16, bits: u8) -> Result<(), ConfigError> {
    let max = GeneratorOptions::max_for_bits(bits) as u16;
    if data_center_id > max {
        return Err(ConfigError::DataCenterIdOutOfRange {
            data_center_id,
            max,
        });
    }
    Ok(())
}

fn check_max_seq_number(value: u32, seq_bit_length: u8, min: u32) -> Result<(), ConfigError> {
    let max = GeneratorOptions::max_for_bits(seq_bit_length);
    if value < min || value > max {
        return Err(ConfigError::MaxSeqNumberOutOfRange { value, min, max });
    }
    Ok(())
}

fn check_min_seq_number(value: u32, max_seq_number: u32) -> Result<(), ConfigError> {
    let max = MAX_MIN_SEQ_NUMBER.min(max_seq_number);
    if value > max {
        return Err(ConfigError::MinSeqNumberOutOfRange { value, max });
    }
    Ok(())
}

fn check_id_length(value: u8) -> Result<(), ConfigError> {
    if value != 0 && !(MIN_FIXED_ID_LENGTH..=MAX_FIXED_ID_LENGTH).contains(&value) {
        return Err(ConfigError::IdLengthOutOfRange { value });
    }
    Ok(())
}
