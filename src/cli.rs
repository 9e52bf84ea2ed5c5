//! Command-line interface definition using clap.
//!
//! [`Args`] maps one-to-one onto the library configuration types, so the
//! binary only has to wire them together:
//!
//! ```rust
//! use chatstats::cli::Args;
//! use chatstats::format::ReportFormat;
//! use clap::Parser;
//!
//! let args = Args::parse_from(["chatstats", "inbox.html", "-o", "stats.json"]);
//! assert_eq!(args.report_format().unwrap(), ReportFormat::Json);
//! assert!(args.pipeline_config().use_cache);
//! ```

use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::config::{AnalysisConfig, ExtractorConfig, PipelineConfig, WeekdayAveraging};
use crate::error::Result;
use crate::format::ReportFormat;

/// Compute message statistics from a Facebook Messenger HTML export.
#[derive(Parser, Debug, Clone)]
#[command(name = "chatstats")]
#[command(version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    chatstats messages.html
    chatstats messages.html --refresh -v
    chatstats messages.html --weekday-mode occurrences
    chatstats messages.html -f csv -o stats.csv")]
pub struct Args {
    /// Path to the exported HTML file
    pub input: PathBuf,

    /// Re-extract the export even if a cached dataset exists
    #[arg(long)]
    pub refresh: bool,

    /// Directory for cached datasets
    #[arg(long, value_name = "DIR", default_value = ".chatstats")]
    pub store_dir: PathBuf,

    /// Keep attachment-only entries (counted with zero words)
    #[arg(long)]
    pub keep_attachments: bool,

    /// How weekday totals are averaged
    #[arg(long, value_enum, default_value = "fixed")]
    pub weekday_mode: WeekdayMode,

    /// Window of the daily activity rolling average, in active days
    #[arg(long, value_name = "DAYS", default_value_t = 30)]
    pub window: usize,

    /// Report format (default: from the output extension, else text)
    #[arg(short, long, value_enum)]
    pub format: Option<FormatArg>,

    /// Write the report to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Print per-thread extraction progress to stderr
    #[arg(long)]
    pub progress: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    /// Pipeline settings for this invocation.
    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig::new()
            .with_store_dir(self.store_dir.clone())
            .with_use_cache(!self.refresh)
            .with_extractor(
                ExtractorConfig::new().with_include_attachments(self.keep_attachments),
            )
    }

    /// Statistics settings for this invocation.
    pub fn analysis_config(&self) -> AnalysisConfig {
        AnalysisConfig::new()
            .with_weekday_averaging(self.weekday_mode.into())
            .with_rolling_window(self.window)
    }

    /// Explicit `--format`, else inferred from `--output`, else text.
    pub fn report_format(&self) -> Result<ReportFormat> {
        match (self.format, &self.output) {
            (Some(format), _) => Ok(format.into()),
            (None, Some(path)) => ReportFormat::from_path(&path.to_string_lossy()),
            (None, None) => Ok(ReportFormat::Text),
        }
    }

    /// Default log filter when `RUST_LOG` is unset.
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

/// Weekday averaging options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekdayMode {
    /// Divide each weekday total by 7
    #[default]
    Fixed,

    /// Divide by how often the weekday occurs in the chat's span
    #[value(alias = "observed")]
    Occurrences,
}

impl From<WeekdayMode> for WeekdayAveraging {
    fn from(mode: WeekdayMode) -> WeekdayAveraging {
        match mode {
            WeekdayMode::Fixed => WeekdayAveraging::FixedSeven,
            WeekdayMode::Occurrences => WeekdayAveraging::Occurrences,
        }
    }
}

/// Report format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatArg {
    /// Console summary
    #[value(alias = "txt")]
    Text,

    /// Full report as JSON
    Json,

    /// `series;label;value` rows
    Csv,
}

impl From<FormatArg> for ReportFormat {
    fn from(format: FormatArg) -> ReportFormat {
        match format {
            FormatArg::Text => ReportFormat::Text,
            FormatArg::Json => ReportFormat::Json,
            FormatArg::Csv => ReportFormat::Csv,
        }
    }
}
