//! Aggregate statistics over a [`MessageDataset`].
//!
//! Every function here is pure: it reads the dataset and returns a fresh
//! aggregate. Statistics that need a divisor fail with
//! [`StatsError::EmptyDataset`] or [`StatsError::DegenerateInterval`]
//! instead of dividing by zero, so callers can skip one figure and still
//! compute the others.
//!
//! # Example
//!
//! ```rust
//! use chatstats::stats::{AggregationEngine, TimeUnit};
//! use chatstats::{Message, MessageDataset};
//! use chrono::NaiveDate;
//!
//! let at = |d| NaiveDate::from_ymd_opt(2020, 1, d).unwrap().and_hms_opt(9, 0, 0).unwrap();
//! let dataset = MessageDataset::new(vec![
//!     Message::new("Bob", Some("see you".into()), at(3)),
//!     Message::new("Alice", Some("hello there".into()), at(1)),
//!     Message::new("Alice", Some("hi".into()), at(1)),
//! ]);
//!
//! let engine = AggregationEngine::new();
//! assert_eq!(engine.counts_per_sender(&dataset).get("Alice"), Some(2));
//! assert_eq!(engine.most_active_day(&dataset)?.date_label, "01/01/20");
//! assert_eq!(engine.average_messages_per_unit(&dataset, TimeUnit::Day)?.rate, 1.5);
//! # Ok::<(), chatstats::StatsError>(())
//! ```

mod activity;
mod histogram;
mod interval;

pub use activity::{ActivityPoint, ActivitySeries, daily_activity, rolling_average};
pub use histogram::{Bucket, Histogram, histogram_by_hour, histogram_by_weekday};
pub use interval::{
    IntervalRate, TimeUnit, average_messages_per_unit, average_messages_per_unit_named,
};

pub use crate::config::{AnalysisConfig, WeekdayAveraging};

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, StatsError};
use crate::message::MessageDataset;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Messages sent by one participant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SenderCount {
    pub sender: String,
    pub count: usize,
    /// Share of all messages, 0.0 - 100.0.
    pub percentage: f64,
}

/// Per-sender message totals, sorted by sender name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserCounts {
    senders: Vec<SenderCount>,
    total: usize,
}

impl UserCounts {
    /// Total messages across all senders.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Messages sent by `sender`.
    pub fn get(&self, sender: &str) -> Option<usize> {
        self.find(sender).map(|entry| entry.count)
    }

    /// Share of all messages sent by `sender`.
    pub fn percentage(&self, sender: &str) -> Option<f64> {
        self.find(sender).map(|entry| entry.percentage)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SenderCount> {
        self.senders.iter()
    }

    /// Number of distinct senders.
    pub fn len(&self) -> usize {
        self.senders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.senders.is_empty()
    }

    fn find(&self, sender: &str) -> Option<&SenderCount> {
        self.senders
            .binary_search_by(|entry| entry.sender.as_str().cmp(sender))
            .ok()
            .map(|idx| &self.senders[idx])
    }
}

impl<'a> IntoIterator for &'a UserCounts {
    type Item = &'a SenderCount;
    type IntoIter = std::slice::Iter<'a, SenderCount>;

    fn into_iter(self) -> Self::IntoIter {
        self.senders.iter()
    }
}

/// The date with the most messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveDay {
    /// `dd/mm/yy` label of the date.
    pub date_label: String,
    pub count: usize,
}

impl ActiveDay {
    /// Average gap between messages on that day, in seconds.
    pub fn seconds_per_message(&self) -> f64 {
        SECONDS_PER_DAY / self.count as f64
    }
}

/// Counts messages per sender.
///
/// The counts always sum to the dataset length.
pub fn counts_per_sender(dataset: &MessageDataset) -> UserCounts {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for message in dataset {
        *counts.entry(message.sender()).or_insert(0) += 1;
    }

    let total = dataset.len();
    let senders = counts
        .into_iter()
        .map(|(sender, count)| SenderCount {
            sender: sender.to_string(),
            count,
            percentage: count as f64 / total as f64 * 100.0,
        })
        .collect();

    UserCounts { senders, total }
}

/// Mean number of whitespace-delimited words per message.
///
/// Attachments count as zero words.
///
/// # Errors
///
/// [`StatsError::EmptyDataset`] for a dataset without messages.
pub fn average_words_per_message(dataset: &MessageDataset) -> Result<f64> {
    if dataset.is_empty() {
        return Err(StatsError::EmptyDataset {
            operation: "average words per message",
        });
    }

    let words: usize = dataset.iter().map(|m| m.word_count()).sum();
    Ok(words as f64 / dataset.len() as f64)
}

/// Finds the date label with the most messages.
///
/// Ties go to the lexicographically smallest label.
///
/// # Errors
///
/// [`StatsError::EmptyDataset`] for a dataset without messages.
pub fn most_active_day(dataset: &MessageDataset) -> Result<ActiveDay> {
    let mut per_label: BTreeMap<String, usize> = BTreeMap::new();
    for message in dataset {
        *per_label.entry(message.date_label()).or_insert(0) += 1;
    }

    let mut best: Option<(String, usize)> = None;
    for (label, count) in per_label {
        if best.as_ref().is_none_or(|(_, top)| count > *top) {
            best = Some((label, count));
        }
    }

    best.map(|(date_label, count)| ActiveDay { date_label, count })
        .ok_or(StatsError::EmptyDataset {
            operation: "most active day",
        })
}

/// Computes statistics with a fixed [`AnalysisConfig`].
#[derive(Debug, Clone, Copy, Default)]
pub struct AggregationEngine {
    config: AnalysisConfig,
}

impl AggregationEngine {
    /// Creates an engine with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: AnalysisConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn counts_per_sender(&self, dataset: &MessageDataset) -> UserCounts {
        counts_per_sender(dataset)
    }

    pub fn average_words_per_message(&self, dataset: &MessageDataset) -> Result<f64> {
        average_words_per_message(dataset)
    }

    pub fn average_messages_per_unit(
        &self,
        dataset: &MessageDataset,
        unit: TimeUnit,
    ) -> Result<IntervalRate> {
        average_messages_per_unit(dataset, unit)
    }

    pub fn average_messages_per_unit_named(
        &self,
        dataset: &MessageDataset,
        unit: &str,
    ) -> Result<IntervalRate> {
        average_messages_per_unit_named(dataset, unit)
    }

    pub fn most_active_day(&self, dataset: &MessageDataset) -> Result<ActiveDay> {
        most_active_day(dataset)
    }

    pub fn histogram_by_hour(&self, dataset: &MessageDataset) -> Result<Histogram> {
        histogram_by_hour(dataset)
    }

    /// Weekday histogram using the configured averaging mode.
    pub fn histogram_by_weekday(&self, dataset: &MessageDataset) -> Result<Histogram> {
        debug!(mode = %self.config.weekday_averaging, "weekday histogram");
        histogram_by_weekday(dataset, self.config.weekday_averaging)
    }

    /// Daily activity using the configured rolling window.
    pub fn daily_activity(&self, dataset: &MessageDataset) -> Result<ActivitySeries> {
        daily_activity(dataset, self.config.rolling_window)
    }
}
