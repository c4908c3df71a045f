//! Configuration for the snowflake engine
//!
//! [`GeneratorOptions`] is only obtainable through [`GeneratorOptionsBuilder`]
//! (or deserialization, which goes through the builder), so an engine can
//! treat a value of this type as already validated.

mod builder;
mod layout;
#[cfg(feature = "serde")]
mod file;

use std::fmt;

use chrono::{DateTime, Utc};
use thiserror::Error;

pub use builder::GeneratorOptionsBuilder;
pub use layout::Layout;
#[cfg(feature = "serde")]
pub use file::OptionsFile;

use builder::{
    MAX_BACKWARD_TOLERANCE_MS, MAX_DATA_CENTER_ID_BIT_LENGTH, MAX_SEQ_BIT_LENGTH,
    MAX_TOP_OVER_COST_COUNT, MAX_WORKER_AND_SEQ_BITS, MAX_WORKER_ID_BIT_LENGTH,
    MIN_SEQ_BIT_LENGTH,
};

/// Errors related to `GeneratorOptions` validation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Worker id {worker_id} is invalid. Maximum allowed value is {max}")]
    WorkerIdOutOfRange { worker_id: u16, max: u16 },

    #[error(
        "Worker id bit length {bits} must be between 1 and {}",
        MAX_WORKER_ID_BIT_LENGTH
    )]
    WorkerIdBitLengthOutOfRange { bits: u8 },

    #[error("Data center id {data_center_id} is invalid. Maximum allowed value is {max}")]
    DataCenterIdOutOfRange { data_center_id: u16, max: u16 },

    #[error(
        "Data center id bit length {bits} must be between 1 and {}",
        MAX_DATA_CENTER_ID_BIT_LENGTH
    )]
    DataCenterIdBitLengthOutOfRange { bits: u8 },

    #[error(
        "Sequence bit length {bits} must be between {} and {}",
        MIN_SEQ_BIT_LENGTH,
        MAX_SEQ_BIT_LENGTH
    )]
    SeqBitLengthOutOfRange { bits: u8 },

    #[error(
        "Worker id bit length {worker_id_bit_length} plus sequence bit length {seq_bit_length} must not exceed {}",
        MAX_WORKER_AND_SEQ_BITS
    )]
    BitLengthSumExceeded {
        worker_id_bit_length: u8,
        seq_bit_length: u8,
    },

    #[error("Max sequence number {value} must be between {min} and {max}")]
    MaxSeqNumberOutOfRange { value: u32, min: u32, max: u32 },

    #[error("Min sequence number {value} must be between 0 and {max}")]
    MinSeqNumberOutOfRange { value: u32, max: u32 },

    #[error(
        "Top over cost count {value} must be between 0 and {}",
        MAX_TOP_OVER_COST_COUNT
    )]
    TopOverCostCountOutOfRange { value: u32 },

    #[error(
        "Max backward tolerance {value}ms must be between 0 and {}ms",
        MAX_BACKWARD_TOLERANCE_MS
    )]
    BackwardToleranceOutOfRange { value: u32 },

    #[error("Id length {value} is invalid. Use 0 (disabled) or a length between 10 and 20")]
    IdLengthOutOfRange { value: u8 },

    #[error("Base time {base_time} is ahead of the current time")]
    BaseTimeInFuture { base_time: DateTime<Utc> },

    #[error("Base time {base_time} is before the Unix epoch")]
    BaseTimeBeforeUnixEpoch { base_time: DateTime<Utc> },

    #[error(
        "Timestamp field of {timestamp_bits} bits (worker id bit length {worker_id_bit_length}, \
         sequence bit length {seq_bit_length}, data center id bit length {data_center_id_bit_length}) \
         cannot hold {elapsed} elapsed units since the base time"
    )]
    TimestampFieldTooNarrow {
        worker_id_bit_length: u8,
        seq_bit_length: u8,
        data_center_id_bit_length: u8,
        timestamp_bits: u8,
        elapsed: i64,
    },
}

/// Packing algorithm used by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum Method {
    /// `[timestamp | worker | sequence]`, borrows future time units on
    /// sequence exhaustion instead of blocking
    #[default]
    Drift,
    /// `[timestamp | data center | worker | sequence]`, waits for the next
    /// time unit on sequence exhaustion
    Classic,
}

impl Method {
    pub const fn name(self) -> &'static str {
        match self {
            Method::Drift => "drift",
            Method::Classic => "classic",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Resolution of the timestamp field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum TimestampUnit {
    #[default]
    Milliseconds,
    Seconds,
}

impl TimestampUnit {
    /// Milliseconds in one unit
    #[inline(always)]
    pub const fn millis(self) -> i64 {
        match self {
            TimestampUnit::Milliseconds => 1,
            TimestampUnit::Seconds => 1000,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            TimestampUnit::Milliseconds => "milliseconds",
            TimestampUnit::Seconds => "seconds",
        }
    }
}

impl fmt::Display for TimestampUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Validated configuration for a [`SnowflakeEngine`](crate::SnowflakeEngine)
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "OptionsFile")
)]
pub struct GeneratorOptions {
    pub(crate) base_time: DateTime<Utc>,
    pub(crate) timestamp_unit: TimestampUnit,
    pub(crate) method: Method,
    pub(crate) worker_id: u16,
    pub(crate) worker_id_bit_length: u8,
    pub(crate) data_center_id: u16,
    pub(crate) data_center_id_bit_length: u8,
    pub(crate) seq_bit_length: u8,
    pub(crate) max_seq_number: Option<u32>,
    pub(crate) min_seq_number: u32,
    pub(crate) top_over_cost_count: u32,
    pub(crate) max_backward_tolerance_ms: u32,
    pub(crate) looped_sequence: bool,
    pub(crate) id_length: u8,
    pub(crate) id_prefix: String,
    pub(crate) generator_id: String,
    pub(crate) spin_enabled: bool,
    pub(crate) spin_loops: u32,
    pub(crate) spin_yield_every: u32,
}

impl GeneratorOptions {
    /// Calculate the largest value representable in `bits` bits
    #[inline]
    pub(crate) const fn max_for_bits(bits: u8) -> u32 {
        ((1u64 << bits) - 1) as u32
    }

    /// Create a new configuration builder
    pub fn builder() -> GeneratorOptionsBuilder {
        GeneratorOptionsBuilder::new()
    }

    /// Turn these options back into a builder, e.g. to derive a sibling
    /// configuration for another worker
    pub fn to_builder(&self) -> GeneratorOptionsBuilder {
        GeneratorOptionsBuilder::from_options(self.clone())
    }

    /// Re-run every field and cross-field check
    pub fn validate(&self) -> Result<(), ConfigError> {
        builder::validate(self)
    }

    /// Bit layout for the configured method
    pub fn layout(&self) -> Layout {
        Layout::for_options(self)
    }

    #[inline(always)]
    pub fn base_time(&self) -> DateTime<Utc> {
        self.base_time
    }

    #[inline(always)]
    pub fn timestamp_unit(&self) -> TimestampUnit {
        self.timestamp_unit
    }

    #[inline(always)]
    pub fn method(&self) -> Method {
        self.method
    }

    #[inline(always)]
    pub fn worker_id(&self) -> u16 {
        self.worker_id
    }

    #[inline(always)]
    pub fn worker_id_bit_length(&self) -> u8 {
        self.worker_id_bit_length
    }

    #[inline(always)]
    pub fn max_worker_id(&self) -> u16 {
        Self::max_for_bits(self.worker_id_bit_length) as u16
    }

    #[inline(always)]
    pub fn data_center_id(&self) -> u16 {
        self.data_center_id
    }

    #[inline(always)]
    pub fn data_center_id_bit_length(&self) -> u8 {
        self.data_center_id_bit_length
    }

    #[inline(always)]
    pub fn max_data_center_id(&self) -> u16 {
        Self::max_for_bits(self.data_center_id_bit_length) as u16
    }

    #[inline(always)]
    pub fn seq_bit_length(&self) -> u8 {
        self.seq_bit_length
    }

    /// Highest sequence used within one time unit
    #[inline(always)]
    pub fn max_seq_number(&self) -> u32 {
        self.max_seq_number
            .unwrap_or_else(|| Self::max_for_bits(self.seq_bit_length))
    }

    /// Sequence every new time unit starts from
    #[inline(always)]
    pub fn min_seq_number(&self) -> u32 {
        self.min_seq_number
    }

    #[inline(always)]
    pub fn top_over_cost_count(&self) -> u32 {
        self.top_over_cost_count
    }

    #[inline(always)]
    pub fn max_backward_tolerance_ms(&self) -> u32 {
        self.max_backward_tolerance_ms
    }

    #[inline(always)]
    pub fn looped_sequence(&self) -> bool {
        self.looped_sequence
    }

    #[inline(always)]
    pub fn id_length(&self) -> u8 {
        self.id_length
    }

    #[inline(always)]
    pub fn id_prefix(&self) -> &str {
        &self.id_prefix
    }

    #[inline(always)]
    pub fn generator_id(&self) -> &str {
        &self.generator_id
    }

    #[inline(always)]
    pub fn spin_enabled(&self) -> bool {
        self.spin_enabled
    }

    #[inline(always)]
    pub fn spin_loops(&self) -> u32 {
        self.spin_loops
    }

    #[inline(always)]
    pub fn spin_yield_every(&self) -> u32 {
        self.spin_yield_every
    }
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        GeneratorOptionsBuilder::new().into_options()
    }
}
