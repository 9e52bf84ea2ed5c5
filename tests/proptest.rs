//! Property-based tests for chatstats.
//!
//! These tests generate random datasets to find edge cases.

use proptest::prelude::*;

use chatstats::datetime::DateTimeCodec;
use chatstats::stats::{
    TimeUnit, counts_per_sender, daily_activity, histogram_by_weekday, most_active_day,
    rolling_average,
};
use chatstats::store::{RecordStore, StoreKey};
use chatstats::config::WeekdayAveraging;
use chatstats::{Message, MessageDataset};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use tempfile::tempdir;

/// Minute-precision instants in 1970..=2069, the range labels round-trip in.
fn arb_timestamp() -> impl Strategy<Value = NaiveDateTime> {
    let start = NaiveDate::from_ymd_opt(1970, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    let minutes = (NaiveDate::from_ymd_opt(2070, 1, 1).unwrap()
        - NaiveDate::from_ymd_opt(1970, 1, 1).unwrap())
    .num_minutes();
    (0..minutes).prop_map(move |m| start + Duration::minutes(m))
}

fn arb_message() -> impl Strategy<Value = Message> {
    (
        prop::sample::select(vec![
            "Alice".to_string(),
            "Bob".to_string(),
            "Иван".to_string(),
            "村上".to_string(),
            "User;With\"Quotes".to_string(),
        ]),
        prop::option::of(prop::sample::select(vec![
            "Hello".to_string(),
            "How are you?".to_string(),
            "Привет мир".to_string(),
            String::new(),
            "   ".to_string(),
            "multi\nline\ttext".to_string(),
            "🎉🔥💀 emoji".to_string(),
        ])),
        arb_timestamp(),
    )
        .prop_map(|(sender, text, ts)| Message::new(sender, text, ts))
}

fn arb_dataset(max_len: usize) -> impl Strategy<Value = MessageDataset> {
    prop::collection::vec(arb_message(), 0..max_len).prop_map(MessageDataset::new)
}

proptest! {
    #[test]
    fn counts_sum_to_dataset_length(dataset in arb_dataset(40)) {
        let counts = counts_per_sender(&dataset);
        prop_assert_eq!(counts.iter().map(|c| c.count).sum::<usize>(), dataset.len());
        prop_assert_eq!(counts.total(), dataset.len());
    }

    #[test]
    fn memory_store_roundtrip(dataset in arb_dataset(40)) {
        let store = RecordStore::in_memory();
        let key = StoreKey::new("prop").unwrap();
        store.save(&dataset, &key).unwrap();
        prop_assert_eq!(store.load(&key).unwrap(), dataset);
    }

    #[test]
    fn label_roundtrip(ts in arb_timestamp()) {
        let codec = DateTimeCodec::new();
        let date = codec.to_date_label(&ts);
        let time = codec.to_time_label(&ts);
        prop_assert_eq!(codec.from_labels(&date, &time).unwrap(), ts);
    }

    #[test]
    fn most_active_day_is_a_maximum(dataset in arb_dataset(40)) {
        match most_active_day(&dataset) {
            Ok(day) => {
                let on_day = dataset.iter().filter(|m| m.date_label() == day.date_label).count();
                prop_assert_eq!(on_day, day.count);
                for message in &dataset {
                    let label = message.date_label();
                    let count = dataset.iter().filter(|m| m.date_label() == label).count();
                    prop_assert!(count <= day.count);
                }
            }
            Err(err) => prop_assert!(dataset.is_empty() && err.is_empty_dataset()),
        }
    }

    #[test]
    fn rate_does_not_depend_on_order(dataset in arb_dataset(30)) {
        let mut reversed: Vec<Message> = dataset.iter().cloned().collect();
        reversed.reverse();
        let reversed = MessageDataset::new(reversed);

        for unit in TimeUnit::ALL {
            let a = chatstats::stats::average_messages_per_unit(&dataset, unit).ok();
            let b = chatstats::stats::average_messages_per_unit(&reversed, unit).ok();
            prop_assert_eq!(a, b);
        }
    }

    #[test]
    fn interval_units_are_ordered(a in arb_timestamp(), b in arb_timestamp()) {
        let (first, last) = if a <= b { (a.date(), b.date()) } else { (b.date(), a.date()) };
        let days = TimeUnit::Day.between(first, last);
        let weeks = TimeUnit::Week.between(first, last);
        let months = TimeUnit::Month.between(first, last);
        let years = TimeUnit::Year.between(first, last);

        prop_assert!(weeks <= days);
        prop_assert!(weeks * 7 >= days);
        prop_assert!(months <= days / 28 + 1);
        prop_assert_eq!(years, months / 12);
    }

    #[test]
    fn weekday_histogram_totals(dataset in arb_dataset(40)) {
        if let Ok(hist) = histogram_by_weekday(&dataset, WeekdayAveraging::FixedSeven) {
            let total: f64 = hist.values().iter().sum::<f64>() * 7.0;
            prop_assert!((total - dataset.len() as f64).abs() < 1e-9);
        }
    }

    #[test]
    fn rolling_average_keeps_length(
        values in prop::collection::vec(0.0f64..1000.0, 0..50),
        window in 1usize..40,
    ) {
        let avg = rolling_average(&values, window);
        prop_assert_eq!(avg.len(), values.len());
        let sum: f64 = values.iter().sum();
        for v in &avg {
            prop_assert!(*v >= 0.0);
            prop_assert!(*v <= sum / window as f64 + 1e-9);
        }
    }

    #[test]
    fn daily_activity_is_chronological(dataset in arb_dataset(40)) {
        if let Ok(series) = daily_activity(&dataset, 7) {
            let dates = series.dates();
            prop_assert!(dates.windows(2).all(|w| w[0] < w[1]));
            prop_assert_eq!(series.counts().iter().sum::<usize>(), dataset.len());
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn file_store_roundtrip(dataset in arb_dataset(20)) {
        let dir = tempdir().unwrap();
        let store = RecordStore::open(dir.path());
        let key = StoreKey::new("prop").unwrap();
        store.save(&dataset, &key).unwrap();
        prop_assert_eq!(store.load(&key).unwrap(), dataset);
    }
}
