//! Message rates over day, week, month and year intervals.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{Result, StatsError};
use crate::message::MessageDataset;

/// Granularity of [`average_messages_per_unit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    Day,
    Week,
    Month,
    Year,
}

impl TimeUnit {
    /// All units, shortest first.
    pub const ALL: [TimeUnit; 4] = [TimeUnit::Day, TimeUnit::Week, TimeUnit::Month, TimeUnit::Year];

    /// Returns the lowercase unit name.
    pub fn name(self) -> &'static str {
        match self {
            TimeUnit::Day => "day",
            TimeUnit::Week => "week",
            TimeUnit::Month => "month",
            TimeUnit::Year => "year",
        }
    }

    /// Number of whole units between two dates (`first <= last`).
    ///
    /// - day: calendar day difference
    /// - week: day difference divided by 7, rounded up
    /// - month: calendar months, not counting a final partial month
    /// - year: whole months divided by 12
    ///
    /// ```rust
    /// use chatstats::stats::TimeUnit;
    /// use chrono::NaiveDate;
    ///
    /// let first = NaiveDate::from_ymd_opt(2020, 1, 31).unwrap();
    /// let last = NaiveDate::from_ymd_opt(2020, 3, 30).unwrap();
    /// assert_eq!(TimeUnit::Day.between(first, last), 59);
    /// assert_eq!(TimeUnit::Week.between(first, last), 9);
    /// assert_eq!(TimeUnit::Month.between(first, last), 1);
    /// assert_eq!(TimeUnit::Year.between(first, last), 0);
    /// ```
    pub fn between(self, first: NaiveDate, last: NaiveDate) -> i64 {
        match self {
            TimeUnit::Day => (last - first).num_days(),
            TimeUnit::Week => {
                let days = (last - first).num_days();
                (days + 6).div_euclid(7)
            }
            TimeUnit::Month => whole_months(first, last),
            TimeUnit::Year => whole_months(first, last) / 12,
        }
    }
}

/// Calendar month difference with end-of-month clamping.
///
/// Jan 31 + 1 month clamps to the end of February, so Jan 31 to Feb 28 of a
/// leap year is still zero whole months.
fn whole_months(first: NaiveDate, last: NaiveDate) -> i64 {
    let mut months = i64::from(last.year() - first.year()) * 12
        + (i64::from(last.month()) - i64::from(first.month()));

    while months > 0 {
        let reached = u32::try_from(months)
            .ok()
            .and_then(|m| first.checked_add_months(Months::new(m)));
        match reached {
            Some(date) if date <= last => break,
            _ => months -= 1,
        }
    }

    months.max(0)
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TimeUnit {
    type Err = StatsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "day" | "days" => Ok(TimeUnit::Day),
            "week" | "weeks" => Ok(TimeUnit::Week),
            "month" | "months" => Ok(TimeUnit::Month),
            "year" | "years" => Ok(TimeUnit::Year),
            _ => Err(StatsError::InvalidUnit {
                input: s.to_string(),
            }),
        }
    }
}

/// Average number of messages per unit of time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntervalRate {
    /// Unit the interval was measured in.
    pub unit: TimeUnit,

    /// Whole units between the earliest and latest message.
    pub interval: i64,

    /// Messages per unit.
    pub rate: f64,
}

/// Computes the message rate over the span of the dataset.
///
/// The span runs from the earliest to the latest message date, found by
/// comparison so the order of the dataset does not matter.
///
/// # Errors
///
/// - [`StatsError::EmptyDataset`] for a dataset without messages
/// - [`StatsError::DegenerateInterval`] when the span is zero units long
pub fn average_messages_per_unit(dataset: &MessageDataset, unit: TimeUnit) -> Result<IntervalRate> {
    let (Some(first), Some(last)) = (dataset.earliest_date(), dataset.latest_date()) else {
        return Err(StatsError::EmptyDataset {
            operation: "average messages per unit",
        });
    };

    let interval = unit.between(first, last);
    if interval == 0 {
        return Err(StatsError::DegenerateInterval { unit: unit.name() });
    }

    Ok(IntervalRate {
        unit,
        interval,
        rate: dataset.len() as f64 / interval as f64,
    })
}

/// Like [`average_messages_per_unit`], with the unit given by name.
///
/// # Errors
///
/// [`StatsError::InvalidUnit`] for anything other than day, week, month or
/// year, plus the errors of [`average_messages_per_unit`].
pub fn average_messages_per_unit_named(dataset: &MessageDataset, unit: &str) -> Result<IntervalRate> {
    average_messages_per_unit(dataset, unit.parse()?)
}
