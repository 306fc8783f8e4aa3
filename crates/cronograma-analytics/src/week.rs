//! Monday-start week bucketing shared by the sparkline and the heatmap.

use chrono::{Datelike, Duration, NaiveDate};

/// The Monday of the week containing `date`
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

/// Whether `date` falls in the 7-day week starting at `start`
pub fn in_week(date: NaiveDate, start: NaiveDate) -> bool {
    date >= start && date < start + Duration::days(7)
}
