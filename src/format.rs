//! Rendering of a [`Report`] as text, JSON or CSV.
//!
//! # Example
//!
//! ```rust
//! use chatstats::format::{ReportFormat, to_string};
//! use chatstats::report::Report;
//! use chatstats::stats::AggregationEngine;
//! use chatstats::{Message, MessageDataset};
//! use chrono::NaiveDate;
//!
//! let at = |d| NaiveDate::from_ymd_opt(2020, 1, d).unwrap().and_hms_opt(9, 0, 0).unwrap();
//! let dataset = MessageDataset::new(vec![
//!     Message::new("Alice", Some("hello there".into()), at(2)),
//!     Message::new("Bob", Some("hi".into()), at(1)),
//! ]);
//! let report = Report::build(&dataset, &AggregationEngine::new());
//!
//! let text = to_string(&report, ReportFormat::Text)?;
//! assert!(text.contains("Messages sent by Alice: 1 (50.00%)"));
//! # Ok::<(), chatstats::StatsError>(())
//! ```

use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::error::{Result, StatsError};
use crate::report::Report;

/// Output format for reports.
///
/// - [`Text`](ReportFormat::Text) - console summary, one figure per line
/// - [`Json`](ReportFormat::Json) - the whole report as pretty JSON
/// - [`Csv`](ReportFormat::Csv) - semicolon-separated `series;label;value` rows
///
/// ```rust
/// use chatstats::format::ReportFormat;
///
/// let format: ReportFormat = "json".parse().unwrap();
/// assert_eq!(format, ReportFormat::Json);
/// assert_eq!(format.extension(), "json");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
    Csv,
}

impl ReportFormat {
    /// Returns the file extension for this format (without dot).
    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Text => "txt",
            ReportFormat::Json => "json",
            ReportFormat::Csv => "csv",
        }
    }

    /// Returns all supported format names.
    pub fn all_names() -> &'static [&'static str] {
        &["text", "json", "csv"]
    }

    /// Detects the format from a file extension.
    ///
    /// ```rust
    /// use chatstats::format::ReportFormat;
    ///
    /// assert_eq!(ReportFormat::from_path("stats.csv").unwrap(), ReportFormat::Csv);
    /// assert!(ReportFormat::from_path("stats.xlsx").is_err());
    /// ```
    pub fn from_path(path: &str) -> Result<Self> {
        let ext = path.rsplit('.').next().unwrap_or("").to_lowercase();
        match ext.as_str() {
            "txt" | "text" => Ok(ReportFormat::Text),
            "json" => Ok(ReportFormat::Json),
            "csv" => Ok(ReportFormat::Csv),
            _ => Err(StatsError::invalid_config(format!(
                "Unknown file extension: '.{}'. Expected one of: txt, json, csv",
                ext
            ))),
        }
    }
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportFormat::Text => write!(f, "Text"),
            ReportFormat::Json => write!(f, "JSON"),
            ReportFormat::Csv => write!(f, "CSV"),
        }
    }
}

impl std::str::FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(ReportFormat::Text),
            "json" => Ok(ReportFormat::Json),
            "csv" => Ok(ReportFormat::Csv),
            _ => Err(format!(
                "Unknown format: '{}'. Expected one of: {}",
                s,
                ReportFormat::all_names().join(", ")
            )),
        }
    }
}

/// Writes `report` to `writer` in `format`.
///
/// # Errors
///
/// Returns an error if the format's feature is disabled or writing fails.
#[allow(unused_variables)]
pub fn write_report<W: Write>(report: &Report, format: ReportFormat, mut writer: W) -> Result<()> {
    match format {
        ReportFormat::Text => write_text(report, &mut writer),
        #[cfg(feature = "json-output")]
        ReportFormat::Json => {
            serde_json::to_writer_pretty(&mut writer, report)?;
            writeln!(writer)?;
            Ok(())
        }
        #[cfg(feature = "csv-output")]
        ReportFormat::Csv => write_csv(report, writer),
        #[allow(unreachable_patterns)]
        _ => Err(StatsError::invalid_config(format!(
            "Report format {} requires the '{}' feature to be enabled",
            format,
            match format {
                ReportFormat::Csv => "csv-output",
                _ => "json-output",
            }
        ))),
    }
}

/// Renders `report` to a string in `format`.
pub fn to_string(report: &Report, format: ReportFormat) -> Result<String> {
    let mut buf = Vec::new();
    write_report(report, format, &mut buf)?;
    String::from_utf8(buf).map_err(|err| StatsError::invalid_config(err.to_string()))
}

fn write_text<W: Write>(report: &Report, w: &mut W) -> Result<()> {
    match (report.first_date, report.last_date) {
        (Some(first), Some(last)) => writeln!(
            w,
            "Messages: {} ({} - {})",
            report.total_messages,
            first.format("%d/%m/%y"),
            last.format("%d/%m/%y")
        )?,
        _ => writeln!(w, "Messages: {}", report.total_messages)?,
    }

    for entry in &report.senders {
        writeln!(
            w,
            "Messages sent by {}: {} ({:.2}%)",
            entry.sender, entry.count, entry.percentage
        )?;
    }

    match report.average_words {
        Some(avg) => writeln!(w, "Average Words/Message: {avg:.2}")?,
        None => writeln!(w, "Average Words/Message: n/a")?,
    }

    for entry in &report.rates {
        let unit = title_case(entry.unit.name());
        match &entry.rate {
            Some(rate) => writeln!(w, "Average Messages/{unit}: {:.2}", rate.rate)?,
            None => writeln!(w, "Average Messages/{unit}: n/a")?,
        }
    }

    if let Some(day) = &report.most_active_day {
        writeln!(
            w,
            "Most active day was {} with {} messages sent. That's a message every {:.2} seconds!",
            day.date_label,
            day.count,
            day.seconds_per_message()
        )?;
    }

    if let Some(hourly) = &report.hourly {
        writeln!(w)?;
        writeln!(w, "Average Messages by Hour:")?;
        for bucket in hourly {
            writeln!(w, "  {}: {:.2}", bucket.label, bucket.value)?;
        }
    }

    if let Some(weekday) = &report.weekday {
        writeln!(w)?;
        writeln!(w, "Average Messages by Weekday ({}):", report.weekday_mode)?;
        for bucket in weekday {
            writeln!(w, "  {}: {:.2}", bucket.label, bucket.value)?;
        }
    }

    if let Some(activity) = &report.activity {
        writeln!(w)?;
        write!(w, "Daily activity: {} active days", activity.points.len())?;
        match activity.average_per_day {
            Some(avg) => writeln!(w, ", {avg:.2} messages/day on average")?,
            None => writeln!(w)?,
        }
    }

    Ok(())
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Writes the report as `series;label;value` rows.
///
/// Series: `sender`, `hour`, `weekday`, `daily` and `rolling` (the last two
/// keyed by ISO date).
#[cfg(feature = "csv-output")]
fn write_csv<W: Write>(report: &Report, writer: W) -> Result<()> {
    let mut csv = csv::WriterBuilder::new().delimiter(b';').from_writer(writer);
    csv.write_record(["series", "label", "value"])?;

    for entry in &report.senders {
        let count = entry.count.to_string();
        csv.write_record(["sender", entry.sender.as_str(), count.as_str()])?;
    }

    for (series, histogram) in [("hour", &report.hourly), ("weekday", &report.weekday)] {
        if let Some(histogram) = histogram {
            for bucket in histogram {
                let value = bucket.value.to_string();
                csv.write_record([series, bucket.label.as_str(), value.as_str()])?;
            }
        }
    }

    if let Some(activity) = &report.activity {
        for point in &activity.points {
            let date = point.date.format("%Y-%m-%d").to_string();
            let count = point.count.to_string();
            csv.write_record(["daily", date.as_str(), count.as_str()])?;
        }
        for point in &activity.points {
            let date = point.date.format("%Y-%m-%d").to_string();
            let rolling = point.rolling.to_string();
            csv.write_record(["rolling", date.as_str(), rolling.as_str()])?;
        }
    }

    csv.flush()?;
    Ok(())
}
