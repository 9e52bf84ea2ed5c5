//! Configuration types for the extraction and aggregation pipeline.
//!
//! Every component receives its configuration at construction time; there
//! are no module-level format strings or hardcoded paths.
//!
//! - [`CodecConfig`] - timestamp format and export quirk suffix
//! - [`ExtractorConfig`] - document class names and attachment filtering
//! - [`AnalysisConfig`] - weekday averaging mode and rolling window
//! - [`PipelineConfig`] - store location and cache policy
//!
//! # Example
//!
//! ```rust
//! use chatstats::config::{ExtractorConfig, PipelineConfig};
//!
//! let config = PipelineConfig::new()
//!     .with_store_dir("/tmp/chatstats-cache")
//!     .with_use_cache(false)
//!     .with_extractor(ExtractorConfig::new().with_include_attachments(true));
//!
//! assert!(!config.use_cache);
//! assert!(config.extractor.include_attachments);
//! ```

use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Settings for [`DateTimeCodec`](crate::datetime::DateTimeCodec).
///
/// The export writes timestamps as
/// `"Monday, 1 January 2018 at 10:00 UTC+01"`. The weekday prefix and the
/// trailing zone token are handled by the codec itself; `timestamp_format`
/// covers the part in between.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodecConfig {
    /// Literal text removed from every raw timestamp before parsing (default: `"+01"`).
    ///
    /// This is a fixed string replacement, not offset handling. Exports using
    /// any other offset are unsupported.
    pub quirk_suffix: String,

    /// chrono format for the date/time body (default: `"%d %B %Y at %H:%M"`).
    pub timestamp_format: String,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            quirk_suffix: "+01".to_string(),
            timestamp_format: "%d %B %Y at %H:%M".to_string(),
        }
    }
}

impl CodecConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the literal suffix stripped from raw timestamps.
    #[must_use]
    pub fn with_quirk_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.quirk_suffix = suffix.into();
        self
    }

    /// Sets the chrono format for the date/time body.
    #[must_use]
    pub fn with_timestamp_format(mut self, format: impl Into<String>) -> Self {
        self.timestamp_format = format.into();
        self
    }
}

/// Settings for [`RecordExtractor`](crate::extract::RecordExtractor).
///
/// # Example
///
/// ```rust
/// use chatstats::config::ExtractorConfig;
///
/// let config = ExtractorConfig::new()
///     .with_include_attachments(true)
///     .with_thread_class("conversation");
///
/// assert_eq!(config.thread_class, "conversation");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Keep entries without a text body (default: false).
    pub include_attachments: bool,

    /// Class of conversation containers (default: `"thread"`).
    pub thread_class: String,

    /// Class of message entries (default: `"message"`).
    pub message_class: String,

    /// Class of the sender element inside an entry (default: `"user"`).
    pub user_class: String,

    /// Class of the timestamp element inside an entry (default: `"meta"`).
    pub meta_class: String,

    /// Timestamp codec settings.
    pub codec: CodecConfig,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            include_attachments: false,
            thread_class: "thread".to_string(),
            message_class: "message".to_string(),
            user_class: "user".to_string(),
            meta_class: "meta".to_string(),
            codec: CodecConfig::default(),
        }
    }
}

impl ExtractorConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Keeps or drops attachment-only entries.
    #[must_use]
    pub fn with_include_attachments(mut self, include: bool) -> Self {
        self.include_attachments = include;
        self
    }

    /// Sets the class name of conversation containers.
    #[must_use]
    pub fn with_thread_class(mut self, class: impl Into<String>) -> Self {
        self.thread_class = class.into();
        self
    }

    /// Sets the class name of message entries.
    #[must_use]
    pub fn with_message_class(mut self, class: impl Into<String>) -> Self {
        self.message_class = class.into();
        self
    }

    /// Sets the timestamp codec settings.
    #[must_use]
    pub fn with_codec(mut self, codec: CodecConfig) -> Self {
        self.codec = codec;
        self
    }
}

/// How per-weekday totals are turned into averages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekdayAveraging {
    /// Divide every weekday total by 7.
    ///
    /// Known approximation: it ignores how often each weekday actually
    /// occurs in the span. Kept as the default to match existing reports.
    #[default]
    #[serde(alias = "fixed")]
    FixedSeven,

    /// Divide each weekday total by the number of times that weekday occurs
    /// between the earliest and latest message (inclusive).
    Occurrences,
}

impl std::fmt::Display for WeekdayAveraging {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WeekdayAveraging::FixedSeven => write!(f, "fixed"),
            WeekdayAveraging::Occurrences => write!(f, "occurrences"),
        }
    }
}

impl FromStr for WeekdayAveraging {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fixed" | "fixedseven" | "seven" => Ok(WeekdayAveraging::FixedSeven),
            "occurrences" | "observed" => Ok(WeekdayAveraging::Occurrences),
            _ => Err(format!(
                "Unknown weekday averaging: '{}'. Expected one of: fixed, occurrences",
                s
            )),
        }
    }
}

/// Settings for [`AggregationEngine`](crate::stats::AggregationEngine).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Weekday averaging mode (default: [`WeekdayAveraging::FixedSeven`]).
    pub weekday_averaging: WeekdayAveraging,

    /// Window, in data points, of the daily activity rolling average (default: 30).
    pub rolling_window: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            weekday_averaging: WeekdayAveraging::FixedSeven,
            rolling_window: 30,
        }
    }
}

impl AnalysisConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the weekday averaging mode.
    #[must_use]
    pub fn with_weekday_averaging(mut self, mode: WeekdayAveraging) -> Self {
        self.weekday_averaging = mode;
        self
    }

    /// Sets the rolling average window.
    #[must_use]
    pub fn with_rolling_window(mut self, window: usize) -> Self {
        self.rolling_window = window;
        self
    }
}

/// Settings for [`Pipeline`](crate::pipeline::Pipeline).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Extraction settings.
    pub extractor: ExtractorConfig,

    /// Directory holding cached datasets (default: `.chatstats`).
    pub store_dir: PathBuf,

    /// Load a cached dataset when one exists instead of re-extracting (default: true).
    pub use_cache: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            extractor: ExtractorConfig::default(),
            store_dir: PathBuf::from(".chatstats"),
            use_cache: true,
        }
    }
}

impl PipelineConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the extraction settings.
    #[must_use]
    pub fn with_extractor(mut self, extractor: ExtractorConfig) -> Self {
        self.extractor = extractor;
        self
    }

    /// Sets the cache directory.
    #[must_use]
    pub fn with_store_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.store_dir = dir.into();
        self
    }

    /// Enables or disables reading from the cache.
    #[must_use]
    pub fn with_use_cache(mut self, use_cache: bool) -> Self {
        self.use_cache = use_cache;
        self
    }
}
