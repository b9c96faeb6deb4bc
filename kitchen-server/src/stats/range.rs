//! Date ranges for the statistics view, in the business timezone
//!
//! Ranges are half-open `[start, end)` in epoch millis.

use chrono::{DateTime, Datelike, Days, Months, NaiveDate, NaiveTime, TimeZone};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateRangeType {
    Today,
    /// Sunday-start week containing today
    Week,
    Month,
    Custom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// Inclusive start (epoch millis)
    pub start: i64,
    /// Exclusive end (epoch millis)
    pub end: i64,
}

/// Midnight at the start of `date` in `tz`, as epoch millis
fn start_of_day(tz: Tz, date: NaiveDate) -> i64 {
    let naive = date.and_time(NaiveTime::MIN);
    match tz.from_local_datetime(&naive).earliest() {
        Some(dt) => dt.timestamp_millis(),
        // Midnight skipped by a DST jump: fall back to the UTC reading
        None => tz.from_utc_datetime(&naive).timestamp_millis(),
    }
}

impl DateRange {
    /// Range covering the local days `first..=last`
    pub fn days(tz: Tz, first: NaiveDate, last: NaiveDate) -> Self {
        let (first, last) = if last < first { (last, first) } else { (first, last) };
        Self {
            start: start_of_day(tz, first),
            end: start_of_day(tz, last + Days::new(1)),
        }
    }

    pub fn today(now: DateTime<Tz>) -> Self {
        let date = now.date_naive();
        Self::days(now.timezone(), date, date)
    }

    pub fn week(now: DateTime<Tz>) -> Self {
        let date = now.date_naive();
        let sunday = date - Days::new(u64::from(date.weekday().num_days_from_sunday()));
        Self::days(now.timezone(), sunday, sunday + Days::new(6))
    }

    pub fn month(now: DateTime<Tz>) -> Self {
        let date = now.date_naive();
        let first = date - Days::new(u64::from(date.day0()));
        let next = first + Months::new(1);
        Self {
            start: start_of_day(now.timezone(), first),
            end: start_of_day(now.timezone(), next),
        }
    }

    pub fn custom(tz: Tz, first: NaiveDate, last: NaiveDate) -> Self {
        Self::days(tz, first, last)
    }

    /// Resolve a preset; `Custom` without dates falls back to today
    pub fn resolve(kind: DateRangeType, now: DateTime<Tz>, custom: Option<(NaiveDate, NaiveDate)>) -> Self {
        match (kind, custom) {
            (DateRangeType::Today, _) => Self::today(now),
            (DateRangeType::Week, _) => Self::week(now),
            (DateRangeType::Month, _) => Self::month(now),
            (DateRangeType::Custom, Some((first, last))) => Self::custom(now.timezone(), first, last),
            (DateRangeType::Custom, None) => Self::today(now),
        }
    }

    pub fn contains(&self, millis: i64) -> bool {
        self.start <= millis && millis < self.end
    }
}
