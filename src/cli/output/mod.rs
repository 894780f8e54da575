pub mod summary;
pub mod table;

use chrono::NaiveDate;

use crate::store::entities::ActivityRecord;
use crate::utils::time::month_period;

/// Record selection shared by `list`, `summary` and `delete`. A record
/// matches when its month period is selected and, if any days are
/// selected, its date is among them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PeriodFilter {
    pub months: Vec<String>,
    pub days: Vec<NaiveDate>,
}

impl PeriodFilter {
    fn matches(&self, record: &ActivityRecord) -> bool {
        self.months.contains(&month_period(record.date))
            && (self.days.is_empty() || self.days.contains(&record.date))
    }
}

/// Applies the filter without reordering the input.
pub fn filter_by_period(records: &[ActivityRecord], filter: &PeriodFilter) -> Vec<ActivityRecord> {
    records
        .iter()
        .filter(|v| filter.matches(v))
        .cloned()
        .collect()
}

/// Sorted unique month periods present in `records`. The default filter
/// selects all of them.
pub fn available_months(records: &[ActivityRecord]) -> Vec<String> {
    let mut months = records
        .iter()
        .map(|v| month_period(v.date))
        .collect::<Vec<_>>();
    months.sort();
    months.dedup();
    months
}
