//! Averaged per-hour and per-weekday message counts.

use chrono::{Datelike, Timelike, Weekday};
use serde::{Deserialize, Serialize};

use super::interval::TimeUnit;
use crate::config::WeekdayAveraging;
use crate::error::{Result, StatsError};
use crate::message::MessageDataset;

const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// One labelled histogram value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bucket {
    pub label: String,
    pub value: f64,
}

/// Ordered `(label, value)` buckets.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Histogram {
    buckets: Vec<Bucket>,
}

impl Histogram {
    /// Builds a histogram from buckets in display order.
    pub fn new(buckets: Vec<Bucket>) -> Self {
        Self { buckets }
    }

    /// Returns the value of the bucket with this label.
    pub fn get(&self, label: &str) -> Option<f64> {
        self.buckets
            .iter()
            .find(|bucket| bucket.label == label)
            .map(|bucket| bucket.value)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Bucket> {
        self.buckets.iter()
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn labels(&self) -> Vec<&str> {
        self.buckets.iter().map(|b| b.label.as_str()).collect()
    }

    pub fn values(&self) -> Vec<f64> {
        self.buckets.iter().map(|b| b.value).collect()
    }
}

impl<'a> IntoIterator for &'a Histogram {
    type Item = &'a Bucket;
    type IntoIter = std::slice::Iter<'a, Bucket>;

    fn into_iter(self) -> Self::IntoIter {
        self.buckets.iter()
    }
}

/// Average number of messages sent in each hour of the day.
///
/// Always 24 buckets labelled `"00"` to `"23"`. Each value is the hour's
/// total divided by the number of days between the earliest and latest
/// message.
///
/// # Errors
///
/// - [`StatsError::EmptyDataset`] for a dataset without messages
/// - [`StatsError::DegenerateInterval`] when all messages share one date
pub fn histogram_by_hour(dataset: &MessageDataset) -> Result<Histogram> {
    let (Some(first), Some(last)) = (dataset.earliest_date(), dataset.latest_date()) else {
        return Err(StatsError::EmptyDataset {
            operation: "hourly histogram",
        });
    };

    let days = TimeUnit::Day.between(first, last);
    if days == 0 {
        return Err(StatsError::DegenerateInterval {
            unit: TimeUnit::Day.name(),
        });
    }

    let mut counts = [0usize; 24];
    for message in dataset {
        counts[message.timestamp.hour() as usize] += 1;
    }

    let buckets = counts
        .iter()
        .enumerate()
        .map(|(hour, &count)| Bucket {
            label: format!("{hour:02}"),
            value: count as f64 / days as f64,
        })
        .collect();

    Ok(Histogram::new(buckets))
}

/// Average number of messages sent on each weekday, Monday first.
///
/// See [`WeekdayAveraging`] for how totals become averages.
///
/// # Errors
///
/// [`StatsError::EmptyDataset`] for a dataset without messages.
pub fn histogram_by_weekday(dataset: &MessageDataset, mode: WeekdayAveraging) -> Result<Histogram> {
    let (Some(first), Some(last)) = (dataset.earliest_date(), dataset.latest_date()) else {
        return Err(StatsError::EmptyDataset {
            operation: "weekday histogram",
        });
    };

    let mut counts = [0usize; 7];
    for message in dataset {
        counts[message.date().weekday().num_days_from_monday() as usize] += 1;
    }

    let span_days = (last - first).num_days() + 1;
    let buckets = WEEKDAYS
        .iter()
        .zip(counts)
        .map(|(&weekday, count)| {
            let value = match mode {
                WeekdayAveraging::FixedSeven => count as f64 / 7.0,
                WeekdayAveraging::Occurrences => {
                    match occurrences(weekday, first.weekday(), span_days) {
                        0 => 0.0,
                        n => count as f64 / n as f64,
                    }
                }
            };
            Bucket {
                label: weekday_name(weekday).to_string(),
                value,
            }
        })
        .collect();

    Ok(Histogram::new(buckets))
}

/// How many times `weekday` falls in `span_days` consecutive days starting on `start`.
fn occurrences(weekday: Weekday, start: Weekday, span_days: i64) -> i64 {
    let full_weeks = span_days / 7;
    let remainder = span_days % 7;
    let offset = (i64::from(weekday.num_days_from_monday())
        - i64::from(start.num_days_from_monday()))
    .rem_euclid(7);
    full_weeks + i64::from(offset < remainder)
}

fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Message;
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(y: i32, m: u32, d: u32, hh: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(hh, 30, 0)
            .unwrap()
    }

    fn dataset(times: &[NaiveDateTime]) -> MessageDataset {
        times
            .iter()
            .map(|&ts| Message::new("A", Some("x".into()), ts))
            .collect()
    }

    #[test]
    fn test_hour_histogram_has_all_buckets() {
        let data = dataset(&[at(2020, 1, 1, 9), at(2020, 1, 3, 9), at(2020, 1, 3, 23)]);
        let hist = histogram_by_hour(&data).unwrap();

        assert_eq!(hist.len(), 24);
        assert_eq!(hist.labels()[0], "00");
        assert_eq!(hist.labels()[23], "23");
        assert_eq!(hist.get("09"), Some(1.0));
        assert_eq!(hist.get("23"), Some(0.5));
        assert_eq!(hist.get("12"), Some(0.0));
    }

    #[test]
    fn test_hour_histogram_single_day() {
        let data = dataset(&[at(2020, 1, 1, 9), at(2020, 1, 1, 10)]);
        assert!(histogram_by_hour(&data).unwrap_err().is_degenerate_interval());
    }

    #[test]
    fn test_hour_histogram_empty() {
        assert!(histogram_by_hour(&MessageDataset::default())
            .unwrap_err()
            .is_empty_dataset());
    }

    #[test]
    fn test_weekday_fixed_seven() {
        // 2020-01-06 is a Monday
        let data = dataset(&[at(2020, 1, 6, 8), at(2020, 1, 13, 8), at(2020, 1, 8, 8)]);
        let hist = histogram_by_weekday(&data, WeekdayAveraging::FixedSeven).unwrap();

        assert_eq!(
            hist.labels(),
            vec!["Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday", "Sunday"]
        );
        assert!((hist.get("Monday").unwrap() - 2.0 / 7.0).abs() < 1e-12);
        assert!((hist.get("Wednesday").unwrap() - 1.0 / 7.0).abs() < 1e-12);
        assert_eq!(hist.get("Sunday"), Some(0.0));
    }

    #[test]
    fn test_weekday_occurrences() {
        // Monday 6th to Monday 13th: two Mondays, one of every other day
        let data = dataset(&[at(2020, 1, 6, 8), at(2020, 1, 13, 8), at(2020, 1, 8, 8)]);
        let hist = histogram_by_weekday(&data, WeekdayAveraging::Occurrences).unwrap();

        assert_eq!(hist.get("Monday"), Some(1.0));
        assert_eq!(hist.get("Wednesday"), Some(1.0));
        assert_eq!(hist.get("Friday"), Some(0.0));
    }

    #[test]
    fn test_weekday_occurrences_single_day() {
        let data = dataset(&[at(2020, 1, 8, 8), at(2020, 1, 8, 9)]);
        let hist = histogram_by_weekday(&data, WeekdayAveraging::Occurrences).unwrap();
        assert_eq!(hist.get("Wednesday"), Some(2.0));
        assert_eq!(hist.get("Thursday"), Some(0.0));
    }

    #[test]
    fn test_occurrence_counting() {
        assert_eq!(occurrences(Weekday::Mon, Weekday::Mon, 8), 2);
        assert_eq!(occurrences(Weekday::Tue, Weekday::Mon, 8), 1);
        assert_eq!(occurrences(Weekday::Sun, Weekday::Wed, 3), 0);
        assert_eq!(occurrences(Weekday::Fri, Weekday::Wed, 3), 1);
        assert_eq!(occurrences(Weekday::Tue, Weekday::Sat, 4), 1);
    }
}
