use thiserror::Error;

use crate::config::ConfigError;

/// Convenience alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Represents errors that can occur while minting or formatting identifiers
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The options handed to the engine are invalid
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Clock moved backwards further than the configured tolerance
    #[error(
        "Clock moved backwards by {delta_ms} milliseconds (tolerance is {tolerance_ms}). Refusing to generate id"
    )]
    ClockMovedBackwards { delta_ms: i64, tolerance_ms: u32 },

    /// System clock reads a time before the configured base time
    #[error("Clock is {delta_ms} milliseconds behind the configured base time")]
    ClockBeforeBaseTime { delta_ms: i64 },

    /// Elapsed time no longer fits the timestamp field
    #[error("Timestamp {timestamp} exceeds the maximum {max} representable by the id layout")]
    TimestampOverflow { timestamp: i64, max: i64 },

    /// Batch size must be positive
    #[error("Requested id count {count} is invalid. Count must be greater than zero")]
    InvalidCount { count: i64 },

    /// The id needs more characters than the configured fixed length
    #[error("Id {id} does not fit into {id_length} characters")]
    IdLengthOverflow { id: i64, id_length: u8 },

    /// A string could not be parsed back into an id
    #[error("Invalid id string {input:?}: {reason}")]
    InvalidIdString { input: String, reason: String },

    /// The operation was cancelled before it could finish
    #[error("Operation cancelled")]
    Cancelled,
}

impl Error {
    pub(crate) fn invalid_id_string(input: &str, reason: impl ToString) -> Self {
        Error::InvalidIdString {
            input: input.to_owned(),
            reason: reason.to_string(),
        }
    }
}
