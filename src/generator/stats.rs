//! Diagnostic snapshot of an engine

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};

use super::SnowflakeEngine;
use crate::config::{Method, TimestampUnit};

/// Point-in-time view of an engine's configuration and counters
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct GeneratorStats {
    pub generator_id: String,
    pub method: Method,
    pub worker_id: u16,
    pub data_center_id: u16,
    /// Elapsed units of the last minted id
    pub last_timestamp: i64,
    pub last_time: DateTime<Utc>,
    pub current_sequence: u32,
    /// Units currently borrowed ahead of the clock
    pub over_cost_count: u32,
    /// Ids minted in the current over-cost term
    pub term_count: u32,
    pub base_time: DateTime<Utc>,
    pub timestamp_unit: TimestampUnit,
    pub issued: u64,
    pub clock_backward_events: u64,
    pub over_cost_terms: u64,
}

impl GeneratorStats {
    /// Flat string map, keyed by field name
    pub fn to_map(&self) -> BTreeMap<&'static str, String> {
        let mut map = BTreeMap::new();
        map.insert("generator_id", self.generator_id.clone());
        map.insert("method", self.method.name().to_owned());
        map.insert("worker_id", self.worker_id.to_string());
        map.insert("data_center_id", self.data_center_id.to_string());
        map.insert("last_timestamp", self.last_timestamp.to_string());
        map.insert("last_time", rfc3339(self.last_time));
        map.insert("current_sequence", self.current_sequence.to_string());
        map.insert("over_cost_count", self.over_cost_count.to_string());
        map.insert("term_count", self.term_count.to_string());
        map.insert("base_time", rfc3339(self.base_time));
        map.insert("timestamp_unit", self.timestamp_unit.name().to_owned());
        map.insert("issued", self.issued.to_string());
        map.insert(
            "clock_backward_events",
            self.clock_backward_events.to_string(),
        );
        map.insert("over_cost_terms", self.over_cost_terms.to_string());
        map
    }
}

fn rfc3339(time: DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Millis, true)
}

impl fmt::Display for GeneratorStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}) worker={} dc={} last={} seq={} over_cost={} term={} issued={}",
            self.generator_id,
            self.method,
            self.worker_id,
            self.data_center_id,
            self.last_timestamp,
            self.current_sequence,
            self.over_cost_count,
            self.term_count,
            self.issued,
        )
    }
}

impl SnowflakeEngine {
    /// Snapshot the engine's counters
    pub fn stats(&self) -> GeneratorStats {
        let state = *self.state.lock();
        GeneratorStats {
            generator_id: self.options.generator_id().to_owned(),
            method: self.method(),
            worker_id: self.options.worker_id(),
            data_center_id: self.options.data_center_id(),
            last_timestamp: state.last_timestamp,
            last_time: self.time_base.to_datetime(state.last_timestamp),
            current_sequence: state.current_sequence,
            over_cost_count: state.over_cost_count,
            term_count: state.term_count,
            base_time: self.options.base_time(),
            timestamp_unit: self.options.timestamp_unit(),
            issued: state.issued,
            clock_backward_events: state.clock_backward_events,
            over_cost_terms: state.over_cost_terms,
        }
    }
}
