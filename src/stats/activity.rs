//! Daily message totals with a centred rolling average.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::interval::{TimeUnit, average_messages_per_unit};
use crate::error::{Result, StatsError};
use crate::message::MessageDataset;

/// Messages sent on one date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityPoint {
    pub date: NaiveDate,
    pub count: usize,
    /// Rolling average centred on this point.
    pub rolling: f64,
}

/// Chronological per-date activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivitySeries {
    /// One point per date that has at least one message, oldest first.
    pub points: Vec<ActivityPoint>,

    /// Window, in points, of the rolling average.
    pub window: usize,

    /// Messages per day over the whole span, or `None` if the span is a
    /// single day.
    pub average_per_day: Option<f64>,
}

impl ActivitySeries {
    /// Dates of all points.
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.points.iter().map(|p| p.date).collect()
    }

    /// Daily totals of all points.
    pub fn counts(&self) -> Vec<usize> {
        self.points.iter().map(|p| p.count).collect()
    }

    /// Rolling averages of all points.
    pub fn rolling(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.rolling).collect()
    }
}

/// Builds the daily activity series.
///
/// Dates without messages are not filled in, so the rolling window counts
/// points rather than calendar days.
///
/// # Errors
///
/// - [`StatsError::InvalidConfig`] if `window` is zero
/// - [`StatsError::EmptyDataset`] for a dataset without messages
pub fn daily_activity(dataset: &MessageDataset, window: usize) -> Result<ActivitySeries> {
    if window == 0 {
        return Err(StatsError::invalid_config("rolling window must be at least 1"));
    }
    if dataset.is_empty() {
        return Err(StatsError::EmptyDataset {
            operation: "daily activity",
        });
    }

    let mut per_day: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for message in dataset {
        *per_day.entry(message.date()).or_insert(0) += 1;
    }

    let counts: Vec<f64> = per_day.values().map(|&c| c as f64).collect();
    let rolling = rolling_average(&counts, window);

    let points = per_day
        .into_iter()
        .zip(rolling)
        .map(|((date, count), rolling)| ActivityPoint {
            date,
            count,
            rolling,
        })
        .collect();

    let average_per_day = match average_messages_per_unit(dataset, TimeUnit::Day) {
        Ok(rate) => Some(rate.rate),
        Err(StatsError::DegenerateInterval { .. }) => None,
        Err(err) => return Err(err),
    };

    Ok(ActivitySeries {
        points,
        window,
        average_per_day,
    })
}

/// Centred moving average with zero padding, same length as `values`.
///
/// Point `i` averages `values[i - window/2 ..= i + (window-1)/2]`, treating
/// out-of-range positions as zero and always dividing by `window`.
///
/// ```rust
/// use chatstats::stats::rolling_average;
///
/// let avg = rolling_average(&[3.0, 3.0, 3.0, 3.0], 3);
/// assert_eq!(avg, vec![2.0, 3.0, 3.0, 2.0]);
/// ```
pub fn rolling_average(values: &[f64], window: usize) -> Vec<f64> {
    if window == 0 {
        return vec![0.0; values.len()];
    }

    let ahead = (window - 1) / 2;
    let behind = window - 1 - ahead;

    (0..values.len())
        .map(|i| {
            let start = i.saturating_sub(behind);
            let end = (i + ahead + 1).min(values.len());
            values[start..end].iter().sum::<f64>() / window as f64
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Message;

    fn on(day: u32, n: usize) -> Vec<Message> {
        let ts = NaiveDate::from_ymd_opt(2020, 1, day)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        (0..n).map(|_| Message::new("A", Some("x".into()), ts)).collect()
    }

    #[test]
    fn test_rolling_average_odd_window() {
        assert_eq!(rolling_average(&[1.0, 2.0, 3.0], 1), vec![1.0, 2.0, 3.0]);
        assert_eq!(
            rolling_average(&[3.0, 6.0, 9.0, 12.0], 3),
            vec![3.0, 6.0, 9.0, 7.0]
        );
    }

    #[test]
    fn test_rolling_average_even_window() {
        // Centre leans left for even windows
        assert_eq!(
            rolling_average(&[1.0, 2.0, 3.0, 4.0, 5.0], 4),
            vec![0.75, 1.5, 2.5, 3.5, 3.0]
        );
    }

    #[test]
    fn test_rolling_average_window_longer_than_series() {
        let avg = rolling_average(&[10.0, 20.0], 30);
        assert_eq!(avg.len(), 2);
        assert!((avg[0] - 1.0).abs() < 1e-12);
        assert!((avg[1] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_daily_activity_is_chronological() {
        // Most recent first, as exports are ordered
        let mut messages = on(9, 1);
        messages.extend(on(5, 3));
        messages.extend(on(1, 2));
        let dataset = MessageDataset::new(messages);

        let series = daily_activity(&dataset, 1).unwrap();
        assert_eq!(series.counts(), vec![2, 3, 1]);
        assert_eq!(series.dates()[0], NaiveDate::from_ymd_opt(2020, 1, 1).unwrap());
        assert_eq!(series.rolling(), vec![2.0, 3.0, 1.0]);
        assert_eq!(series.average_per_day, Some(6.0 / 8.0));
    }

    #[test]
    fn test_daily_activity_single_day() {
        let series = daily_activity(&MessageDataset::new(on(3, 4)), 30).unwrap();
        assert_eq!(series.counts(), vec![4]);
        assert_eq!(series.average_per_day, None);
    }

    #[test]
    fn test_daily_activity_errors() {
        let dataset = MessageDataset::new(on(3, 1));
        assert!(matches!(
            daily_activity(&dataset, 0).unwrap_err(),
            StatsError::InvalidConfig(_)
        ));
        assert!(daily_activity(&MessageDataset::default(), 30)
            .unwrap_err()
            .is_empty_dataset());
    }
}
