use crate::store::entities::ActivityRecord;
use crate::utils::time::format_hours;

use super::summary::Summary;

/// Prints the filtered table, numbered the way `delete --row` counts.
pub fn print_records(records: &[ActivityRecord]) {
    if records.is_empty() {
        println!("No activities for the selected filters");
        return;
    }

    for (row, record) in records.iter().enumerate() {
        println!(
            "{}\t{}\t{}–{}\t{}\t{}\t{}",
            row + 1,
            record.date.format("%Y-%m-%d"),
            record.start.format("%H:%M"),
            record.end.format("%H:%M"),
            format_hours(record.duration),
            record.category,
            record.description
        );
    }
}

/// Label used when confirming a deletion.
pub fn selector_label(record: &ActivityRecord) -> String {
    format!(
        "{} | {}–{} | {}",
        record.date.format("%Y-%m-%d"),
        record.start.format("%H:%M"),
        record.end.format("%H:%M"),
        record.category
    )
}

pub fn print_summary(summary: &Summary) {
    println!("Oficina: {}", format_hours(summary.office_hours));
    println!("Campo: {}", format_hours(summary.field_hours));
    println!("Tiempo muerto: {}", format_hours(summary.idle_hours));
    println!(
        "Días trabajados: {} | Horas teóricas: {}",
        summary.days_worked,
        format_hours(summary.theoretical_hours)
    );
}
