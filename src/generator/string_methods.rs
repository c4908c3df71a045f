//! String form of generated ids
//!
//! Formatting is decided by `id_length` and `id_prefix`, see [`IdFormatter`].
//!
//! [`IdFormatter`]: crate::format::IdFormatter

use super::generate::{batch_buffer, checked_count};
use super::SnowflakeEngine;
use crate::error::Result;

impl SnowflakeEngine {
    /// Generate a new id as a string
    ///
    /// # Example
    /// ```
    /// use snowdrift::{GeneratorOptions, SnowflakeEngine};
    ///
    /// let options = GeneratorOptions::builder().id_prefix("ORD-").build().unwrap();
    /// let engine = SnowflakeEngine::new(options).unwrap();
    /// let id = engine.next_id_string().unwrap();
    /// assert!(id.starts_with("ORD-"));
    /// ```
    pub fn next_id_string(&self) -> Result<String> {
        let id = self.next_id()?;
        self.formatter.format(id)
    }

    /// Generate `count` ids as strings
    pub fn next_id_strings(&self, count: i64) -> Result<Vec<String>> {
        let count = checked_count(count)?;
        let mut ids = batch_buffer(count);
        for _ in 0..count {
            ids.push(self.next_id_string()?);
        }
        Ok(ids)
    }

    /// Parse a string produced by [`next_id_string`](Self::next_id_string)
    /// back into the numeric id
    pub fn parse_id_string(&self, input: &str) -> Result<i64> {
        self.formatter.parse(input)
    }
}
