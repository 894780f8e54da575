
use chrono::{NaiveDate, NaiveTime};


/// This is the standard way of rendering a month period in worklog.
pub fn month_period(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

/// Decimal hours between two times of day.
pub fn hours_between(start: NaiveTime, end: NaiveTime) -> f64 {
    (end - start).num_seconds() as f64 / 3600.0
}

/// Two-decimal figure used by the summary display.
pub fn format_hours(hours: f64) -> String {
    format!("{hours:.2} h")
}
