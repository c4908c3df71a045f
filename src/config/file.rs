//! Deserializable form of [`GeneratorOptions`]
//!
//! Every field is optional; present fields go through the same validating
//! setters as code-built options.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::{ConfigError, GeneratorOptions, GeneratorOptionsBuilder, Method, TimestampUnit};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OptionsFile {
    pub base_time: Option<DateTime<Utc>>,
    pub timestamp_unit: Option<TimestampUnit>,
    pub method: Option<Method>,
    pub worker_id: Option<u16>,
    pub worker_id_bit_length: Option<u8>,
    pub data_center_id: Option<u16>,
    pub data_center_id_bit_length: Option<u8>,
    pub seq_bit_length: Option<u8>,
    pub max_seq_number: Option<u32>,
    pub min_seq_number: Option<u32>,
    pub top_over_cost_count: Option<u32>,
    pub max_backward_tolerance_ms: Option<u32>,
    pub looped_sequence: Option<bool>,
    pub id_length: Option<u8>,
    pub id_prefix: Option<String>,
    pub generator_id: Option<String>,
    pub spin_enabled: Option<bool>,
    pub spin_loops: Option<u32>,
    pub spin_yield_every: Option<u32>,
}

impl TryFrom<OptionsFile> for GeneratorOptions {
    type Error = ConfigError;

    fn try_from(file: OptionsFile) -> Result<Self, Self::Error> {
        let mut b = GeneratorOptionsBuilder::new();

        // Bit lengths before the values bounded by them; min sequence before
        // max so a lowered pair never trips over the defaults.
        if let Some(bits) = file.worker_id_bit_length {
            b = b.worker_id_bit_length(bits)?;
        }
        if let Some(bits) = file.seq_bit_length {
            b = b.seq_bit_length(bits)?;
        }
        if let Some(bits) = file.data_center_id_bit_length {
            b = b.data_center_id_bit_length(bits)?;
        }
        if let Some(min) = file.min_seq_number {
            b = b.min_seq_number(min)?;
        }
        if let Some(max) = file.max_seq_number {
            b = b.max_seq_number(max)?;
        }
        if let Some(id) = file.worker_id {
            b = b.worker_id(id)?;
        }
        if let Some(id) = file.data_center_id {
            b = b.data_center_id(id)?;
        }
        if let Some(base_time) = file.base_time {
            b = b.base_time(base_time)?;
        }
        if let Some(unit) = file.timestamp_unit {
            b = b.timestamp_unit(unit);
        }
        if let Some(method) = file.method {
            b = b.method(method);
        }
        if let Some(count) = file.top_over_cost_count {
            b = b.top_over_cost_count(count)?;
        }
        if let Some(ms) = file.max_backward_tolerance_ms {
            b = b.max_backward_tolerance_ms(ms)?;
        }
        if let Some(looped) = file.looped_sequence {
            b = b.looped_sequence(looped);
        }
        if let Some(len) = file.id_length {
            b = b.id_length(len)?;
        }
        if let Some(prefix) = file.id_prefix {
            b = b.id_prefix(prefix);
        }
        if let Some(id) = file.generator_id {
            b = b.generator_id(id);
        }
        if let Some(enabled) = file.spin_enabled {
            b = b.enable_spin(enabled);
        }
        if let Some(loops) = file.spin_loops {
            b = b.spin_loops(loops);
        }
        if let Some(n) = file.spin_yield_every {
            b = b.spin_yield_every(n);
        }

        b.build()
    }
}
