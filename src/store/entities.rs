use chrono::NaiveDate;
use chrono::NaiveTime;

use clap::ValueEnum;
use thiserror::Error;

use std::fmt::Display;

use crate::utils::time::hours_between;

/// Where a logged interval was spent. The persisted table keeps the
/// original wire names `Oficina` and `Campo`.
#[derive(PartialEq, Eq, PartialOrd, Ord, Debug, Clone, Copy, Hash, ValueEnum)]
pub enum Category {
    Office,
    Field,
}

impl Category {
    pub fn wire_name(&self) -> &'static str {
        match self {
            Category::Office => "Oficina",
            Category::Field => "Campo",
        }
    }

    pub fn from_wire_name(value: &str) -> Option<Category> {
        match value {
            "Oficina" => Some(Category::Office),
            "Campo" => Some(Category::Field),
            _ => None,
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.wire_name())
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("end time {end} must be after start time {start}")]
pub struct InvalidInterval {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

/// One logged activity. `duration` is derived from the interval at
/// creation and carried as decimal hours in the persisted table.
///
/// A record has no separate id: the full field tuple is its identity, and
/// deletion matches on it.
#[derive(PartialEq, Debug, Clone)]
pub struct ActivityRecord {
    pub date: NaiveDate,
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub duration: f64,
    pub category: Category,
    pub description: String,
}

impl ActivityRecord {
    /// Validates the interval and derives the duration. Records are never
    /// constructed with `end <= start`.
    pub fn new(
        date: NaiveDate,
        start: NaiveTime,
        end: NaiveTime,
        category: Category,
        description: impl Into<String>,
    ) -> Result<Self, InvalidInterval> {
        if end <= start {
            return Err(InvalidInterval { start, end });
        }
        Ok(Self {
            date,
            start,
            end,
            duration: hours_between(start, end),
            category,
            description: description.into(),
        })
    }
}

/// Nominal workday used to compute the theoretical available hours per
/// day. Process-wide configuration, not per-user state.
#[derive(PartialEq, Debug, Clone, Copy)]
pub struct Workday {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl Workday {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Result<Self, InvalidInterval> {
        if end <= start {
            return Err(InvalidInterval { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn hours(&self) -> f64 {
        hours_between(self.start, self.end)
    }
}

impl Default for Workday {
    fn default() -> Self {
        Self {
            start: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
            end: NaiveTime::from_hms_opt(14, 30, 0).unwrap(),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveTime};

    use super::{ActivityRecord, Category, Workday};

    fn clock(hour: u32, minute: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
    }

    #[test]
    fn test_duration_is_interval_difference() {
        let record = ActivityRecord::new(
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            clock(8, 0),
            clock(12, 0),
            Category::Office,
            "reports",
        )
        .unwrap();

        assert_eq!(record.duration, 4.0);

        let record = ActivityRecord::new(
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            clock(10, 0),
            clock(14, 30),
            Category::Field,
            "",
        )
        .unwrap();

        assert_eq!(record.duration, 4.5);
    }

    #[test]
    fn test_rejects_backwards_interval() {
        let result = ActivityRecord::new(
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            clock(12, 0),
            clock(8, 0),
            Category::Office,
            "",
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_empty_interval() {
        let result = ActivityRecord::new(
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            clock(8, 0),
            clock(8, 0),
            Category::Office,
            "",
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_default_workday_hours() {
        assert_eq!(Workday::default().hours(), 6.5);
    }

    #[test]
    fn test_category_wire_names_round_trip() {
        for category in [Category::Office, Category::Field] {
            assert_eq!(Category::from_wire_name(category.wire_name()), Some(category));
        }
        assert_eq!(Category::from_wire_name("Remoto"), None);
    }
}
