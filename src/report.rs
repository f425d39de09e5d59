use crate::calendar::{Calendar, format_datetime};
use crate::slot::TimeSlot;
use chrono::{Duration, NaiveDate};
use polars::prelude::*;

pub const REPORT_COLUMNS: [&str; 7] = [
    "day",
    "start",
    "end",
    "task",
    "priority",
    "workload_minutes",
    "deadline",
];

/// One row per placed slot, in the order the calendar currently presents them.
pub fn slots_dataframe(calendar: &Calendar) -> PolarsResult<DataFrame> {
    let slots: Vec<&TimeSlot> = calendar.slots().collect();

    let days: Vec<i32> = slots.iter().map(|s| date_to_i32(s.day())).collect();
    let starts: Vec<String> = slots
        .iter()
        .map(|s| s.start().format("%H:%M").to_string())
        .collect();
    let ends: Vec<String> = slots
        .iter()
        .map(|s| s.end().format("%H:%M").to_string())
        .collect();
    let names: Vec<&str> = slots.iter().map(|s| s.task().name.as_str()).collect();
    let priorities: Vec<i32> = slots.iter().map(|s| s.task().priority).collect();
    let workloads: Vec<i64> = slots.iter().map(|s| s.task().workload_minutes).collect();
    let deadlines: Vec<String> = slots
        .iter()
        .map(|s| format_datetime(s.task().deadline))
        .collect();

    let columns: Vec<Column> = vec![
        Series::new(PlSmallStr::from_static("day"), days)
            .cast(&DataType::Date)?
            .into_column(),
        Series::new(PlSmallStr::from_static("start"), starts).into_column(),
        Series::new(PlSmallStr::from_static("end"), ends).into_column(),
        Series::new(PlSmallStr::from_static("task"), names).into_column(),
        Series::new(PlSmallStr::from_static("priority"), priorities).into_column(),
        Series::new(PlSmallStr::from_static("workload_minutes"), workloads).into_column(),
        Series::new(PlSmallStr::from_static("deadline"), deadlines).into_column(),
    ];

    DataFrame::new(columns)
}

pub fn render_df_as_text_table(df: &DataFrame) -> String {
    let columns = df.get_columns();
    let col_names: Vec<String> = columns.iter().map(|c| c.name().to_string()).collect();

    let mut cells: Vec<Vec<String>> = Vec::with_capacity(df.height());
    for row_idx in 0..df.height() {
        let row = columns
            .iter()
            .map(|col| match col.get(row_idx) {
                Ok(av) => cell_text(&av),
                Err(_) => String::new(),
            })
            .collect::<Vec<_>>();
        cells.push(row);
    }

    let mut widths: Vec<usize> = col_names.iter().map(|n| n.len()).collect();
    for row in &cells {
        for (ci, cell) in row.iter().enumerate() {
            widths[ci] = widths[ci].max(cell.len());
        }
    }

    let mut sep = String::from("+");
    for w in &widths {
        sep.push_str(&"-".repeat(*w + 2));
        sep.push('+');
    }

    let mut out = String::new();
    out.push_str(&sep);
    out.push('\n');
    push_row(&mut out, &col_names, &widths);
    out.push_str(&sep);
    out.push('\n');
    for row in &cells {
        push_row(&mut out, row, &widths);
    }
    out.push_str(&sep);
    out.push('\n');
    out
}

fn push_row(out: &mut String, cells: &[String], widths: &[usize]) {
    out.push('|');
    for (cell, width) in cells.iter().zip(widths) {
        out.push(' ');
        out.push_str(cell);
        out.push_str(&" ".repeat(width.saturating_sub(cell.len())));
        out.push_str(" |");
    }
    out.push('\n');
}

fn cell_text(av: &AnyValue) -> String {
    match av {
        AnyValue::Null => String::new(),
        AnyValue::Int32(v) => v.to_string(),
        AnyValue::Int64(v) => v.to_string(),
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        AnyValue::Date(days) => date_from_i32(*days).to_string(),
        other => other.to_string(),
    }
}

fn date_to_i32(date: NaiveDate) -> i32 {
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or(NaiveDate::MIN);
    (date - epoch).num_days() as i32
}

fn date_from_i32(days: i32) -> NaiveDate {
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or(NaiveDate::MIN);
    epoch + Duration::days(days as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_calendar_has_report_schema() {
        let df = slots_dataframe(&Calendar::default()).unwrap();
        assert_eq!(df.height(), 0);
        for name in REPORT_COLUMNS {
            assert!(df.column(name).is_ok(), "missing column {name}");
        }
    }

    #[test]
    fn date_conversion_is_symmetric_around_epoch() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 6).unwrap();
        assert_eq!(date_from_i32(date_to_i32(date)), date);
    }
}
