//! Common interface of id generators
//!
//! Callers that only need ids can depend on [`IdGenerator`] rather than a
//! concrete engine.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::generator::SnowflakeEngine;

pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> Result<i64>;

    fn next_id_string(&self) -> Result<String>;

    /// `count` must be positive
    fn next_ids(&self, count: i64) -> Result<Vec<i64>>;

    fn next_id_strings(&self, count: i64) -> Result<Vec<String>>;

    fn extract_time(&self, id: i64) -> DateTime<Utc>;

    fn extract_worker_id(&self, id: i64) -> u16;

    fn extract_sequence(&self, id: i64) -> u32;

    /// Zero for layouts without a data center field
    fn extract_data_center_id(&self, id: i64) -> u16;

    /// Diagnostic key/value view of the generator
    fn stats_map(&self) -> BTreeMap<&'static str, String>;
}

impl IdGenerator for SnowflakeEngine {
    #[inline]
    fn next_id(&self) -> Result<i64> {
        SnowflakeEngine::next_id(self)
    }

    #[inline]
    fn next_id_string(&self) -> Result<String> {
        SnowflakeEngine::next_id_string(self)
    }

    fn next_ids(&self, count: i64) -> Result<Vec<i64>> {
        SnowflakeEngine::next_ids(self, count)
    }

    fn next_id_strings(&self, count: i64) -> Result<Vec<String>> {
        SnowflakeEngine::next_id_strings(self, count)
    }

    fn extract_time(&self, id: i64) -> DateTime<Utc> {
        self.extract.time(id)
    }

    fn extract_worker_id(&self, id: i64) -> u16 {
        self.extract.worker_id(id)
    }

    fn extract_sequence(&self, id: i64) -> u32 {
        self.extract.sequence(id)
    }

    fn extract_data_center_id(&self, id: i64) -> u16 {
        self.extract.data_center_id(id)
    }

    fn stats_map(&self) -> BTreeMap<&'static str, String> {
        self.stats().to_map()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::config::{GeneratorOptions, Method};

    #[test]
    fn test_engine_behind_trait_object() {
        let options = GeneratorOptions::builder()
            .method(Method::Classic)
            .worker_id(12)
            .unwrap()
            .data_center_id(3)
            .unwrap()
            .build()
            .unwrap();
        let generator: Arc<dyn IdGenerator> = Arc::new(SnowflakeEngine::new(options).unwrap());

        let id = generator.next_id().unwrap();
        assert_eq!(generator.extract_worker_id(id), 12);
        assert_eq!(generator.extract_data_center_id(id), 3);
        assert!(generator.extract_sequence(id) >= 5);
        assert_eq!(generator.stats_map()["method"], "classic");
        assert_eq!(generator.next_ids(4).unwrap().len(), 4);
    }
}
