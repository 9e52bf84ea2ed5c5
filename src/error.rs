//! Unified error types for chatstats.
//!
//! Every fallible operation in the crate returns [`StatsError`]. Extraction
//! errors are fatal to the current run (no partial dataset is produced),
//! while aggregation errors are returned per statistic so that callers can
//! skip one figure and still compute the rest.

use std::io;

use thiserror::Error;

/// A specialized [`Result`] type for chatstats operations.
///
/// # Example
///
/// ```rust
/// use chatstats::error::Result;
/// use chatstats::MessageDataset;
///
/// fn load_nothing() -> Result<MessageDataset> {
///     Ok(MessageDataset::default())
/// }
/// ```
pub type Result<T> = std::result::Result<T, StatsError>;

/// The error type for all chatstats operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StatsError {
    /// A timestamp or label string does not match the expected pattern.
    #[error("Invalid timestamp '{input}'. Expected format: {expected}")]
    Format {
        /// The string that failed to parse
        input: String,
        /// Human-readable description of the expected format
        expected: &'static str,
    },

    /// A chat entry in the source document is structurally malformed.
    ///
    /// `thread` and `entry` are zero-based positions in document order.
    #[error("Malformed entry {entry} in thread {thread}: {reason}")]
    Parse {
        /// Index of the thread container
        thread: usize,
        /// Index of the message entry within the thread
        entry: usize,
        /// What was wrong with the entry
        reason: String,
    },

    /// No dataset has been saved under this key.
    #[error("No stored dataset under key '{key}'")]
    NotFound {
        /// The store key that was looked up
        key: String,
    },

    /// A stored dataset exists but cannot be decoded.
    #[error("Stored dataset '{key}' is corrupt: {reason}")]
    CorruptStore {
        /// The store key that was loaded
        key: String,
        /// Description of the inconsistency
        reason: String,
    },

    /// The unit-of-time argument is not one of day, week, month, year.
    #[error("Invalid unit of time '{input}'. Expected one of: day, week, month, year")]
    InvalidUnit {
        /// The rejected unit string
        input: String,
    },

    /// The dataset holds no messages, so the statistic has no divisor.
    #[error("Cannot compute {operation} on an empty dataset")]
    EmptyDataset {
        /// Name of the statistic that was requested
        operation: &'static str,
    },

    /// The time interval between the earliest and latest message is zero.
    #[error("Interval resolves to zero {unit}s; all messages fall within one {unit}")]
    DegenerateInterval {
        /// The unit the interval was measured in
        unit: &'static str,
    },

    /// A configuration value is unusable.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// An I/O error occurred.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV writing error.
    #[cfg(feature = "csv-output")]
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

// ============================================================================
// Convenience constructors
// ============================================================================

impl StatsError {
    /// Creates a format error for an export timestamp.
    pub fn timestamp(input: impl Into<String>) -> Self {
        StatsError::Format {
            input: input.into(),
            expected: "<Weekday>, <Day> <Month> <Year> at <HH>:<MM> <Zone>",
        }
    }

    /// Creates a format error for a `dd/mm/yy` / `HH:MM` label pair.
    pub fn label(input: impl Into<String>) -> Self {
        StatsError::Format {
            input: input.into(),
            expected: "dd/mm/yy HH:MM",
        }
    }

    /// Creates a parse error for the entry at the given position.
    pub fn parse(thread: usize, entry: usize, reason: impl Into<String>) -> Self {
        StatsError::Parse {
            thread,
            entry,
            reason: reason.into(),
        }
    }

    /// Creates a store-miss error.
    pub fn not_found(key: impl Into<String>) -> Self {
        StatsError::NotFound { key: key.into() }
    }

    /// Creates a corrupt-store error.
    pub fn corrupt(key: impl Into<String>, reason: impl Into<String>) -> Self {
        StatsError::CorruptStore {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Creates an invalid configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        StatsError::InvalidConfig(message.into())
    }

    /// Returns `true` if this is a timestamp/label format error.
    pub fn is_format(&self) -> bool {
        matches!(self, StatsError::Format { .. })
    }

    /// Returns `true` if this is a malformed-entry error.
    pub fn is_parse(&self) -> bool {
        matches!(self, StatsError::Parse { .. })
    }

    /// Returns `true` if this is a store miss.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StatsError::NotFound { .. })
    }

    /// Returns `true` if this is an invalid unit error.
    pub fn is_invalid_unit(&self) -> bool {
        matches!(self, StatsError::InvalidUnit { .. })
    }

    /// Returns `true` if this is an empty dataset error.
    pub fn is_empty_dataset(&self) -> bool {
        matches!(self, StatsError::EmptyDataset { .. })
    }

    /// Returns `true` if this is a zero-interval error.
    pub fn is_degenerate_interval(&self) -> bool {
        matches!(self, StatsError::DegenerateInterval { .. })
    }

    /// Returns `true` if this is an I/O error.
    pub fn is_io(&self) -> bool {
        matches!(self, StatsError::Io(_))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_display() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err = StatsError::from(io_err);
        let display = err.to_string();
        assert!(display.contains("IO error"));
        assert!(display.contains("file not found"));
        assert!(err.is_io());
    }

    #[test]
    fn test_timestamp_error_display() {
        let err = StatsError::timestamp("yesterday at noon");
        let display = err.to_string();
        assert!(display.contains("yesterday at noon"));
        assert!(display.contains("<Weekday>"));
        assert!(err.is_format());
    }

    #[test]
    fn test_parse_error_position() {
        let err = StatsError::parse(2, 7, "missing sender");
        assert_eq!(
            err.to_string(),
            "Malformed entry 7 in thread 2: missing sender"
        );
        assert!(err.is_parse());
    }

    #[test]
    fn test_not_found_display() {
        let err = StatsError::not_found("inbox_171");
        assert!(err.to_string().contains("inbox_171"));
        assert!(err.is_not_found());
        assert!(!err.is_parse());
    }

    #[test]
    fn test_aggregation_errors() {
        let err = StatsError::EmptyDataset {
            operation: "average words per message",
        };
        assert!(err.is_empty_dataset());
        assert!(err.to_string().contains("average words per message"));

        let err = StatsError::DegenerateInterval { unit: "day" };
        assert!(err.is_degenerate_interval());
        assert!(err.to_string().contains("zero days"));

        let err = StatsError::InvalidUnit {
            input: "fortnight".into(),
        };
        assert!(err.is_invalid_unit());
        assert!(err.to_string().contains("fortnight"));
    }

    #[test]
    fn test_corrupt_store_display() {
        let err = StatsError::corrupt("chat", "column length mismatch");
        let display = err.to_string();
        assert!(display.contains("chat"));
        assert!(display.contains("column length mismatch"));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{oops").unwrap_err();
        let err: StatsError = json_err.into();
        assert!(err.to_string().starts_with("JSON error"));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<StatsError>();
    }
}
