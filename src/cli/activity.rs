use std::fmt::Display;

use anyhow::Result;
use chrono::{Local, NaiveDate, NaiveTime};
use chrono_english::parse_date_string;
use clap::{CommandFactory, Parser, ValueEnum};

use crate::{
    cli::output::{
        available_months, filter_by_period,
        summary::summarize,
        table::{print_records, print_summary, selector_label},
        PeriodFilter,
    },
    store::{
        entities::{ActivityRecord, Category, Workday},
        record_store::{RecordStore, StoreError},
    },
};

use super::Args;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum DateStyle {
    Uk,
    Us,
}

impl From<DateStyle> for chrono_english::Dialect {
    fn from(value: DateStyle) -> Self {
        match value {
            DateStyle::Uk => Self::Uk,
            DateStyle::Us => Self::Us,
        }
    }
}

impl Display for DateStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DateStyle::Uk => write!(f, "uk"),
            DateStyle::Us => write!(f, "us"),
        }
    }
}

#[derive(Debug, Parser)]
pub struct AddCommand {
    #[arg(
        long,
        help = "Day of the activity. Defaults to today. Examples are \"yesterday\", \"15/03/2025\""
    )]
    date: Option<String>,
    #[arg(
        long = "start",
        short,
        default_value = "08:00",
        help = "Start of the interval as HH:MM. Defaults to the workday start"
    )]
    start: String,
    #[arg(
        long = "end",
        short,
        default_value = "14:30",
        help = "End of the interval as HH:MM. Defaults to the workday end"
    )]
    end: String,
    #[arg(long, short, value_enum, help = "Where the time was spent")]
    category: Category,
    #[arg(long, short, default_value = "", help = "Free-text description")]
    description: String,
    #[arg(long, default_value_t = DateStyle::Uk, help = "Style of dates used during parsing. For Uk it's day/month/year. For Us it's month/day/year")]
    date_style: DateStyle,
}

#[derive(Debug, Clone, Parser)]
pub struct FilterArgs {
    #[arg(
        long = "month",
        help = "Restrict to month periods like 2025-03. Defaults to every month present"
    )]
    months: Vec<String>,
    #[arg(
        long = "day",
        help = "Restrict to specific days. Examples are \"yesterday\", \"15/03/2025\""
    )]
    days: Vec<String>,
    #[arg(long, default_value_t = DateStyle::Uk, help = "Style of dates used during parsing. For Uk it's day/month/year. For Us it's month/day/year")]
    date_style: DateStyle,
}

#[derive(Debug, Parser)]
pub struct ListCommand {
    #[command(flatten)]
    filter: FilterArgs,
}

#[derive(Debug, Parser)]
pub struct SummaryCommand {
    #[command(flatten)]
    filter: FilterArgs,
    #[arg(
        long,
        default_value = "08:00",
        help = "Nominal start of the workday as HH:MM"
    )]
    workday_start: String,
    #[arg(
        long,
        default_value = "14:30",
        help = "Nominal end of the workday as HH:MM"
    )]
    workday_end: String,
}

#[derive(Debug, Parser)]
pub struct DeleteCommand {
    #[arg(help = "Row number from the list output, counted over the same filters")]
    row: usize,
    #[command(flatten)]
    filter: FilterArgs,
}

pub async fn process_add_command(
    store: &impl RecordStore,
    user: &str,
    AddCommand {
        date,
        start,
        end,
        category,
        description,
        date_style,
    }: AddCommand,
) -> Result<()> {
    let date = match date {
        Some(v) => parse_day(&v, date_style)?,
        None => Local::now().date_naive(),
    };
    let start = parse_clock(&start)?;
    let end = parse_clock(&end)?;

    let record = match ActivityRecord::new(date, start, end, category, description) {
        Ok(v) => v,
        Err(e) => {
            return Err(Args::command()
                .error(clap::error::ErrorKind::ValueValidation, e.to_string())
                .into());
        }
    };

    store.append(user, record).await?;
    println!("Activity saved");

    // Re-fetch after the mutation so the user sees the row they just saved.
    print_records(&store.load(user).await?);
    Ok(())
}

pub async fn process_list_command(
    store: &impl RecordStore,
    user: &str,
    command: ListCommand,
) -> Result<()> {
    let records = store.load(user).await?;
    let filter = resolve_filter(&records, command.filter)?;
    print_records(&filter_by_period(&records, &filter));
    Ok(())
}

pub async fn process_summary_command(
    store: &impl RecordStore,
    user: &str,
    SummaryCommand {
        filter,
        workday_start,
        workday_end,
    }: SummaryCommand,
) -> Result<()> {
    let workday = match Workday::new(parse_clock(&workday_start)?, parse_clock(&workday_end)?) {
        Ok(v) => v,
        Err(e) => {
            return Err(Args::command()
                .error(clap::error::ErrorKind::ValueValidation, e.to_string())
                .into());
        }
    };

    let records = store.load(user).await?;
    let filter = resolve_filter(&records, filter)?;
    let filtered = filter_by_period(&records, &filter);

    print_summary(&summarize(&filtered, workday.hours()));
    Ok(())
}

pub async fn process_delete_command(
    store: &impl RecordStore,
    user: &str,
    DeleteCommand { row, filter }: DeleteCommand,
) -> Result<()> {
    let records = store.load(user).await?;
    let filter = resolve_filter(&records, filter)?;
    let filtered = filter_by_period(&records, &filter);

    // Rows are resolved against the filtered view the user was shown and
    // the record is then deleted by identity. An index into the unfiltered
    // table would remove the wrong record whenever a filter is active.
    let record = match row.checked_sub(1).and_then(|v| filtered.get(v)) {
        Some(v) => v.clone(),
        None => return Err(StoreError::NotFound.into()),
    };

    store.delete(user, &record).await?;
    println!("Deleted {}", selector_label(&record));

    print_records(&store.load(user).await?);
    Ok(())
}

/// Builds the filter against the loaded records, defaulting the month
/// selection to every month present.
fn resolve_filter(records: &[ActivityRecord], args: FilterArgs) -> Result<PeriodFilter> {
    let months = if args.months.is_empty() {
        available_months(records)
    } else {
        for month in &args.months {
            if NaiveDate::parse_from_str(&format!("{month}-01"), "%Y-%m-%d").is_err() {
                return Err(Args::command()
                    .error(
                        clap::error::ErrorKind::ValueValidation,
                        format!("Can't parse {month} as a month period like 2025-03"),
                    )
                    .into());
            }
        }
        args.months
    };

    let days = args
        .days
        .iter()
        .map(|v| parse_day(v, args.date_style))
        .collect::<Result<Vec<_>>>()?;

    Ok(PeriodFilter { months, days })
}

fn parse_clock(value: &str) -> Result<NaiveTime> {
    match NaiveTime::parse_from_str(value, "%H:%M") {
        Ok(v) => Ok(v),
        Err(e) => Err(Args::command()
            .error(
                clap::error::ErrorKind::ValueValidation,
                format!("Can't parse {value} as an HH:MM time: {e}"),
            )
            .into()),
    }
}

fn parse_day(value: &str, date_style: DateStyle) -> Result<NaiveDate> {
    match parse_date_string(value, Local::now(), date_style.into()) {
        Ok(v) => Ok(v.date_naive()),
        Err(e) => Err(Args::command()
            .error(
                clap::error::ErrorKind::ValueValidation,
                format!("Failed to validate day {value}: {e}"),
            )
            .into()),
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use chrono::{NaiveDate, NaiveTime};
    use tempfile::tempdir;

    use crate::store::{
        entities::{ActivityRecord, Category},
        record_store::{CsvRecordStore, RecordStore, StoreError},
    };

    use super::{
        process_delete_command, resolve_filter, DateStyle, DeleteCommand, FilterArgs,
    };

    fn record(date: (i32, u32, u32), description: &str) -> ActivityRecord {
        ActivityRecord::new(
            NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            Category::Office,
            description,
        )
        .unwrap()
    }

    fn filter_args(months: &[&str]) -> FilterArgs {
        FilterArgs {
            months: months.iter().map(|v| v.to_string()).collect(),
            days: vec![],
            date_style: DateStyle::Uk,
        }
    }

    #[test]
    fn test_resolve_filter_defaults_to_all_months() {
        let records = [record((2024, 3, 5), "a"), record((2024, 1, 2), "b")];

        let filter = resolve_filter(&records, filter_args(&[])).unwrap();

        assert_eq!(filter.months, vec!["2024-01", "2024-03"]);
        assert!(filter.days.is_empty());
    }

    #[test]
    fn test_resolve_filter_rejects_malformed_month() {
        assert!(resolve_filter(&[], filter_args(&["march"])).is_err());
        assert!(resolve_filter(&[], filter_args(&["2024-13"])).is_err());
    }

    #[tokio::test]
    async fn test_delete_row_counts_over_the_filtered_view() -> Result<()> {
        let dir = tempdir()?;
        let store = CsvRecordStore::new(dir.path().to_owned())?;

        let january = record((2024, 1, 2), "january");
        let march = record((2024, 3, 5), "march");
        store.append("ana", january.clone()).await?;
        store.append("ana", march.clone()).await?;

        // Row 1 of the January-only view is the January record, even
        // though the unfiltered table lists the March record first.
        process_delete_command(
            &store,
            "ana",
            DeleteCommand {
                row: 1,
                filter: filter_args(&["2024-01"]),
            },
        )
        .await?;

        assert_eq!(store.load("ana").await?, vec![march]);
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_out_of_range_row_is_not_found() -> Result<()> {
        let dir = tempdir()?;
        let store = CsvRecordStore::new(dir.path().to_owned())?;

        store.append("ana", record((2024, 3, 5), "only")).await?;

        for row in [0, 2] {
            let error = process_delete_command(
                &store,
                "ana",
                DeleteCommand {
                    row,
                    filter: filter_args(&[]),
                },
            )
            .await
            .unwrap_err();
            assert_eq!(
                error.downcast_ref::<StoreError>(),
                Some(&StoreError::NotFound)
            );
        }

        assert_eq!(store.load("ana").await?.len(), 1);
        Ok(())
    }
}
