//! # chatstats
//!
//! A Rust library for turning Facebook Messenger HTML exports into message
//! records and computing statistics over them.
//!
//! ## Overview
//!
//! The export is one HTML document of `thread` containers holding `message`
//! entries. chatstats works in three stages:
//!
//! 1. **Extract** - [`RecordExtractor`](extract::RecordExtractor) walks the
//!    document and yields a [`MessageDataset`] of (sender, body, timestamp)
//!    records. Timestamps go through the
//!    [`DateTimeCodec`](datetime::DateTimeCodec).
//! 2. **Cache** - [`RecordStore`](store::RecordStore) saves the dataset as
//!    four parallel columns so later runs skip the HTML walk.
//!    [`Pipeline`](pipeline::Pipeline) combines both steps.
//! 3. **Aggregate** - [`AggregationEngine`](stats::AggregationEngine)
//!    computes per-sender counts, rates, most active day, histograms and the
//!    daily activity series; [`Report`](report::Report) collects them all.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use chatstats::prelude::*;
//! use std::path::Path;
//!
//! fn main() -> Result<()> {
//!     let pipeline = Pipeline::new(PipelineConfig::new());
//!     let dataset = pipeline.load_dataset(Path::new("messages.html"))?;
//!
//!     let engine = AggregationEngine::new();
//!     for entry in &engine.counts_per_sender(&dataset) {
//!         println!("{}: {} ({:.1}%)", entry.sender, entry.count, entry.percentage);
//!     }
//!     println!("{:.2} messages/day", engine.average_messages_per_unit(&dataset, TimeUnit::Day)?.rate);
//!
//!     let report = Report::build(&dataset, &engine);
//!     print!("{}", chatstats::format::to_string(&report, ReportFormat::Text)?);
//!     Ok(())
//! }
//! ```
//!
//! ## Extracting from a string
//!
//! ```rust
//! use chatstats::extract::RecordExtractor;
//!
//! let html = r#"<div class="thread">
//!   <div class="message"><span class="user">Alice</span>
//!     <span class="meta">Tuesday, 6 March 2018 at 21:14 UTC+01</span></div>
//!   <p>hello</p>
//! </div>"#;
//!
//! let dataset = RecordExtractor::new().extract_str(html)?;
//! assert_eq!(dataset.len(), 1);
//! assert_eq!(dataset.get(0).unwrap().date_label(), "06/03/18");
//! # Ok::<(), chatstats::StatsError>(())
//! ```
//!
//! ## Module Structure
//!
//! - [`extract`] - HTML walk ([`RecordExtractor`](extract::RecordExtractor))
//! - [`datetime`] - export timestamp parsing and `dd/mm/yy` / `HH:MM` labels
//! - [`message`] - [`Message`] and [`MessageDataset`]
//! - [`store`] - [`RecordStore`](store::RecordStore) and blob backends
//! - [`stats`] - aggregate statistics
//! - [`pipeline`] - extraction with a write-through cache
//! - [`report`], [`format`] - full report and its text/JSON/CSV rendering
//! - [`config`] - configuration types
//! - [`progress`] - extraction progress callbacks
//! - [`cli`] - CLI argument types (feature `cli`)
//! - [`error`] - [`StatsError`] and [`Result`]

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod datetime;
pub mod error;
pub mod extract;
pub mod format;
pub mod message;
pub mod pipeline;
pub mod progress;
pub mod report;
pub mod stats;
pub mod store;

// Re-export the main types at the crate root for convenience
pub use error::{Result, StatsError};
pub use message::{Message, MessageDataset};

/// Convenient re-exports for common usage.
///
/// ```rust
/// use chatstats::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{Result, StatsError};
    pub use crate::message::{Message, MessageDataset};

    pub use crate::config::{
        AnalysisConfig, CodecConfig, ExtractorConfig, PipelineConfig, WeekdayAveraging,
    };

    pub use crate::datetime::DateTimeCodec;
    pub use crate::extract::RecordExtractor;
    pub use crate::pipeline::Pipeline;
    pub use crate::store::{BlobStore, FileBlobStore, MemoryBlobStore, RecordStore, StoreKey};

    pub use crate::stats::{
        ActiveDay, ActivitySeries, AggregationEngine, Histogram, IntervalRate, TimeUnit,
        UserCounts,
    };

    pub use crate::format::{ReportFormat, write_report};
    pub use crate::progress::{Progress, ProgressCallback};
    pub use crate::report::Report;
}
