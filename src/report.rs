//! Full statistics report for one dataset.
//!
//! [`Report::build`] runs every statistic of the
//! [`AggregationEngine`](crate::stats::AggregationEngine). A statistic that
//! cannot be computed (for example a monthly rate over a two-week chat) is
//! left as `None` and logged; the others are still filled in.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::WeekdayAveraging;
use crate::error::Result;
use crate::message::MessageDataset;
use crate::stats::{
    ActiveDay, ActivitySeries, AggregationEngine, Histogram, IntervalRate, TimeUnit, UserCounts,
};

/// Every aggregate of a dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub total_messages: usize,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
    pub senders: UserCounts,
    pub average_words: Option<f64>,
    /// One entry per [`TimeUnit`], in `TimeUnit::ALL` order.
    pub rates: Vec<UnitRate>,
    pub most_active_day: Option<ActiveDay>,
    pub hourly: Option<Histogram>,
    pub weekday_mode: WeekdayAveraging,
    pub weekday: Option<Histogram>,
    pub activity: Option<ActivitySeries>,
}

/// Rate for one unit, `None` if it could not be computed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitRate {
    pub unit: TimeUnit,
    pub rate: Option<IntervalRate>,
}

impl Report {
    /// Computes every statistic of `dataset` with `engine`.
    pub fn build(dataset: &MessageDataset, engine: &AggregationEngine) -> Self {
        let rates = TimeUnit::ALL
            .iter()
            .map(|&unit| UnitRate {
                unit,
                rate: keep(
                    unit.name(),
                    engine.average_messages_per_unit(dataset, unit),
                ),
            })
            .collect();

        Self {
            total_messages: dataset.len(),
            first_date: dataset.earliest_date(),
            last_date: dataset.latest_date(),
            senders: engine.counts_per_sender(dataset),
            average_words: keep(
                "average words",
                engine.average_words_per_message(dataset),
            ),
            rates,
            most_active_day: keep("most active day", engine.most_active_day(dataset)),
            hourly: keep("hourly histogram", engine.histogram_by_hour(dataset)),
            weekday_mode: engine.config().weekday_averaging,
            weekday: keep("weekday histogram", engine.histogram_by_weekday(dataset)),
            activity: keep("daily activity", engine.daily_activity(dataset)),
        }
    }

    /// Returns the rate for `unit`, if it could be computed.
    pub fn rate(&self, unit: TimeUnit) -> Option<&IntervalRate> {
        self.rates
            .iter()
            .find(|entry| entry.unit == unit)
            .and_then(|entry| entry.rate.as_ref())
    }
}

fn keep<T>(statistic: &str, result: Result<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            warn!(statistic, error = %err, "statistic skipped");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalysisConfig;
    use crate::message::Message;

    fn at(d: u32, h: u32) -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2020, 1, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_build_full_report() {
        let dataset = MessageDataset::new(vec![
            Message::new("Bob", Some("later".into()), at(15, 20)),
            Message::new("Alice", Some("hello there".into()), at(1, 9)),
            Message::new("Alice", None, at(1, 9)),
        ]);
        let report = Report::build(&dataset, &AggregationEngine::new());

        assert_eq!(report.total_messages, 3);
        assert_eq!(report.first_date, NaiveDate::from_ymd_opt(2020, 1, 1));
        assert_eq!(report.senders.get("Alice"), Some(2));
        assert_eq!(report.average_words, Some(1.0));
        assert_eq!(report.rate(TimeUnit::Day).unwrap().interval, 14);
        assert_eq!(report.rate(TimeUnit::Week).unwrap().interval, 2);
        assert!(report.rate(TimeUnit::Month).is_none());
        assert!(report.rate(TimeUnit::Year).is_none());
        assert_eq!(report.most_active_day.as_ref().unwrap().date_label, "01/01/20");
        assert_eq!(report.hourly.as_ref().unwrap().len(), 24);
        assert_eq!(report.weekday.as_ref().unwrap().len(), 7);
        assert_eq!(report.activity.as_ref().unwrap().points.len(), 2);
    }

    #[test]
    fn test_build_empty_report() {
        let report = Report::build(&MessageDataset::default(), &AggregationEngine::new());
        assert_eq!(report.total_messages, 0);
        assert!(report.senders.is_empty());
        assert!(report.average_words.is_none());
        assert!(report.rates.iter().all(|r| r.rate.is_none()));
        assert!(report.most_active_day.is_none());
        assert!(report.hourly.is_none());
        assert!(report.weekday.is_none());
        assert!(report.activity.is_none());
    }

    #[test]
    fn test_report_records_weekday_mode() {
        let engine = AggregationEngine::with_config(
            AnalysisConfig::new().with_weekday_averaging(WeekdayAveraging::Occurrences),
        );
        let dataset = MessageDataset::new(vec![Message::new("A", Some("x".into()), at(1, 1))]);
        let report = Report::build(&dataset, &engine);
        assert_eq!(report.weekday_mode, WeekdayAveraging::Occurrences);
    }
}
