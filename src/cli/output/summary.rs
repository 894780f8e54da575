use std::collections::HashSet;

use chrono::NaiveDate;

use crate::store::entities::{ActivityRecord, Category};

/// Aggregate figures for a set of records against a workday baseline.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub office_hours: f64,
    pub field_hours: f64,
    pub idle_hours: f64,
    pub days_worked: usize,
    pub theoretical_hours: f64,
}

/// Sums logged hours per category and derives how much of the theoretical
/// workday went unaccounted. A day with more logged than theoretical
/// hours clamps idle time at zero rather than going negative.
pub fn summarize(records: &[ActivityRecord], workday_hours: f64) -> Summary {
    let mut office_hours = 0.;
    let mut field_hours = 0.;
    let mut days = HashSet::<NaiveDate>::new();

    for record in records {
        match record.category {
            Category::Office => office_hours += record.duration,
            Category::Field => field_hours += record.duration,
        }
        days.insert(record.date);
    }

    let days_worked = days.len();
    let theoretical_hours = days_worked as f64 * workday_hours;
    let idle_hours = (theoretical_hours - (office_hours + field_hours)).max(0.);

    Summary {
        office_hours,
        field_hours,
        idle_hours,
        days_worked,
        theoretical_hours,
    }
}
