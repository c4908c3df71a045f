//! # snowdrift
//!
//! Snowflake-family distributed unique ID generator.
//!
//! Ids are positive `i64` values packed from elapsed time since a configured
//! base time, a worker id, an optional data center id and a per-unit
//! sequence. Two packing methods are available:
//! - `Drift` (default) borrows future time units when a unit's sequence is
//!   used up, so bursts never block until the borrow limit is reached
//! - `Classic` waits for the next time unit like Twitter's scheme
//!
//! ```
//! use snowdrift::{GeneratorOptions, SnowflakeEngine};
//!
//! let options = GeneratorOptions::builder().worker_id(7).unwrap().build().unwrap();
//! let engine = SnowflakeEngine::new(options).unwrap();
//!
//! let id = engine.next_id().unwrap();
//! assert_eq!(engine.extract.worker_id(id), 7);
//! ```

#![forbid(unsafe_code)]

pub mod base62;
mod config;
mod error;
mod extractor;
mod format;
mod generator;
mod interface;

#[cfg(test)]
pub mod tests;

// Re-export main types
pub use config::{
    ConfigError, GeneratorOptions, GeneratorOptionsBuilder, Layout, Method, TimestampUnit,
};
#[cfg(feature = "serde")]
pub use config::OptionsFile;
pub use error::{Error, Result};
pub use extractor::{DecomposedId, SnowflakeExtractor};
pub use format::IdFormatter;
pub use generator::{Clock, GeneratorStats, ManualClock, SnowflakeEngine, SystemClock};
pub use interface::IdGenerator;

#[cfg(feature = "async-tokio")]
pub use tokio_util::sync::CancellationToken;
