//! Timestamp parsing and label formatting.
//!
//! The export writes every timestamp as
//! `"<Weekday>, <Day> <Month> <Year> at <HH>:<MM> <Zone>"`, for example
//! `"Tuesday, 6 March 2018 at 21:14 UTC+01"`. [`DateTimeCodec`] turns these
//! strings into a [`NaiveDateTime`] and renders the fixed-width labels
//! (`dd/mm/yy`, `HH:MM`) that the rest of the pipeline groups by.
//!
//! # Known limitation
//!
//! The `+01` offset is removed by a literal string replacement before
//! parsing, and the remaining zone abbreviation is discarded. All timestamps
//! are interpreted as wall-clock time in the export's single timezone.
//! Exports written with any other offset are not supported.
//!
//! # Example
//!
//! ```rust
//! use chatstats::datetime::DateTimeCodec;
//!
//! let codec = DateTimeCodec::new();
//! let ts = codec.parse("Tuesday, 6 March 2018 at 21:14 UTC+01")?;
//!
//! assert_eq!(codec.to_date_label(&ts), "06/03/18");
//! assert_eq!(codec.to_time_label(&ts), "21:14");
//! # Ok::<(), chatstats::StatsError>(())
//! ```

use chrono::{NaiveDate, NaiveDateTime, Weekday};

use crate::config::CodecConfig;
use crate::error::{Result, StatsError};
use crate::message::{DATE_LABEL_FORMAT, TIME_LABEL_FORMAT};

/// Parses export timestamps and formats date/time labels.
#[derive(Debug, Clone, Default)]
pub struct DateTimeCodec {
    config: CodecConfig,
}

impl DateTimeCodec {
    /// Creates a codec with the default export formats.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a codec with custom formats.
    pub fn with_config(config: CodecConfig) -> Self {
        Self { config }
    }

    /// Returns the current configuration.
    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Parses a raw export timestamp.
    ///
    /// The weekday name must be a real weekday but is not checked against
    /// the calendar date.
    ///
    /// # Errors
    ///
    /// Returns [`StatsError::Format`] if the string does not match the
    /// export pattern.
    pub fn parse(&self, raw: &str) -> Result<NaiveDateTime> {
        let cleaned = if self.config.quirk_suffix.is_empty() {
            raw.to_string()
        } else {
            raw.replace(&self.config.quirk_suffix, "")
        };

        let (weekday, rest) = cleaned
            .trim()
            .split_once(',')
            .ok_or_else(|| StatsError::timestamp(raw))?;

        weekday
            .trim()
            .parse::<Weekday>()
            .map_err(|_| StatsError::timestamp(raw))?;

        let body = strip_zone_token(rest.trim());
        NaiveDateTime::parse_from_str(body, &self.config.timestamp_format)
            .map_err(|_| StatsError::timestamp(raw))
    }

    /// Formats the `dd/mm/yy` date label.
    pub fn to_date_label(&self, instant: &NaiveDateTime) -> String {
        instant.format(DATE_LABEL_FORMAT).to_string()
    }

    /// Formats the `HH:MM` time label.
    pub fn to_time_label(&self, instant: &NaiveDateTime) -> String {
        instant.format(TIME_LABEL_FORMAT).to_string()
    }

    /// Parses a date label back into a calendar date.
    ///
    /// Two-digit years follow `%y`: `00`-`69` map to 20xx, `70`-`99` to 19xx.
    pub fn parse_date_label(&self, label: &str) -> Result<NaiveDate> {
        NaiveDate::parse_from_str(label, DATE_LABEL_FORMAT)
            .map_err(|_| StatsError::label(label))
    }

    /// Rebuilds an instant from a date label and a time label.
    pub fn from_labels(&self, date_label: &str, time_label: &str) -> Result<NaiveDateTime> {
        let joined = format!("{date_label} {time_label}");
        let format = format!("{DATE_LABEL_FORMAT} {TIME_LABEL_FORMAT}");
        NaiveDateTime::parse_from_str(&joined, &format).map_err(|_| StatsError::label(joined))
    }
}

/// Drops a trailing alphabetic zone abbreviation such as `UTC` or `CET`.
fn strip_zone_token(s: &str) -> &str {
    match s.rsplit_once(char::is_whitespace) {
        Some((head, tail)) if !tail.is_empty() && tail.chars().all(|c| c.is_ascii_alphabetic()) => {
            head.trim_end()
        }
        _ => s,
    }
}
