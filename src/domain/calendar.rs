//! Calendar attribute helpers shared by the pipeline and the inference path.

use chrono::{Datelike, NaiveDate, Weekday};

/// Full English weekday name for a date.
#[must_use]
pub fn weekday_name(date: NaiveDate) -> &'static str {
    match date.weekday() {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Weekend flag under the Monday = 0 convention: Saturday and Sunday.
#[must_use]
pub fn is_weekend(date: NaiveDate) -> bool {
    date.weekday().num_days_from_monday() >= 5
}

/// ISO-8601 week number (1-53).
#[must_use]
pub fn iso_week(date: NaiveDate) -> u32 {
    date.iso_week().week()
}

/// Day of month (1-31).
#[must_use]
pub fn day_of_month(date: NaiveDate) -> u32 {
    date.day()
}
