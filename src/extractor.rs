use chrono::{DateTime, Utc};

use crate::config::{GeneratorOptions, Layout};
use crate::generator::time::TimeBase;

/// Fields of an id, as returned by [`SnowflakeExtractor::decompose`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DecomposedId {
    /// Elapsed units since the base time
    pub timestamp: i64,
    pub time: DateTime<Utc>,
    pub data_center_id: u16,
    pub worker_id: u16,
    pub sequence: u32,
}

/// Id component extractor
///
/// Pure bit arithmetic over the layout of the options it was built from.
/// Any `i64` is accepted; ids minted under a different layout decode into
/// meaningless but well-defined fields.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SnowflakeExtractor {
    layout: Layout,
    time_base: TimeBase,
}

impl SnowflakeExtractor {
    /// Create an extractor for ids minted under `options`
    pub fn for_options(options: &GeneratorOptions) -> Self {
        Self {
            layout: options.layout(),
            time_base: TimeBase::for_options(options),
        }
    }

    /// Extract the timestamp field, in elapsed units since the base time
    #[inline(always)]
    pub fn timestamp(&self, id: i64) -> i64 {
        ((id as u64 >> self.layout.timestamp_shift()) & self.layout.timestamp_mask()) as i64
    }

    /// Instant at which the id's time unit began
    #[inline]
    pub fn time(&self, id: i64) -> DateTime<Utc> {
        self.time_base.to_datetime(self.timestamp(id))
    }

    #[inline(always)]
    pub fn worker_id(&self, id: i64) -> u16 {
        ((id as u64 >> self.layout.worker_shift()) & self.layout.worker_mask()) as u16
    }

    /// Always zero for drift ids, which carry no data center field
    #[inline(always)]
    pub fn data_center_id(&self, id: i64) -> u16 {
        ((id as u64 >> self.layout.data_center_shift()) & self.layout.data_center_mask()) as u16
    }

    #[inline(always)]
    pub fn sequence(&self, id: i64) -> u32 {
        (id as u64 & self.layout.seq_mask()) as u32
    }

    /// Decompose an id into all of its fields
    #[inline]
    pub fn decompose(&self, id: i64) -> DecomposedId {
        let timestamp = self.timestamp(id);
        DecomposedId {
            timestamp,
            time: self.time_base.to_datetime(timestamp),
            data_center_id: self.data_center_id(id),
            worker_id: self.worker_id(id),
            sequence: self.sequence(id),
        }
    }
}
