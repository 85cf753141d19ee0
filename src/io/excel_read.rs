use std::collections::HashSet;
use std::path::Path;

use calamine::{DataType, Range, Reader, open_workbook_auto};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use tracing::debug;

use crate::error::{Result, ToolError};
use crate::model::{CellValue, Table};

const SECONDS_PER_DAY: f64 = 86_400.0;
/// Keeps `serial * SECONDS_PER_DAY` well inside `i64`.
const MAX_SERIAL_DAYS: f64 = 1.0e13;

/// Lists the sheet names of the workbook at `path`.
pub fn sheet_names(path: &Path) -> Result<Vec<String>> {
    let workbook = open_workbook_auto(path)?;
    Ok(workbook.sheet_names().to_vec())
}

/// Reads one sheet into a [`Table`], treating the first row as the header.
pub fn load_sheet(path: &Path, sheet: &str) -> Result<Table> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range(sheet)
        .ok_or_else(|| ToolError::MissingSheet {
            sheet: sheet.to_string(),
            available: workbook.sheet_names().to_vec(),
        })??;
    let table = range_to_table(&range);
    debug!(
        sheet,
        columns = table.columns.len(),
        rows = table.rows.len(),
        "sheet loaded"
    );
    Ok(table)
}

fn range_to_table(range: &Range<DataType>) -> Table {
    let mut rows = range.rows();
    let raw_headers: Vec<String> = match rows.next() {
        Some(first_row) => first_row
            .iter()
            .map(|cell| cell_to_value(cell).to_string())
            .collect(),
        None => return Table::default(),
    };
    let columns = unique_headers(raw_headers);

    let body = rows
        .map(|row| {
            let mut values: Vec<CellValue> = row.iter().map(cell_to_value).collect();
            values.resize(columns.len(), CellValue::Empty);
            values
        })
        .filter(|values| !values.iter().all(CellValue::is_empty))
        .collect();

    Table::new(columns, body)
}

/// Replaces blank headers with `Unnamed: <index>` and suffixes repeated ones
/// with `.1`, `.2`, ... so every column name is unique.
fn unique_headers(raw: Vec<String>) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::with_capacity(raw.len());
    let mut headers = Vec::with_capacity(raw.len());

    for (index, header) in raw.into_iter().enumerate() {
        let base = if header.is_empty() {
            format!("Unnamed: {index}")
        } else {
            header
        };
        let mut candidate = base.clone();
        let mut suffix = 0;
        while seen.contains(&candidate) {
            suffix += 1;
            candidate = format!("{base}.{suffix}");
        }
        seen.insert(candidate.clone());
        headers.push(candidate);
    }

    headers
}

fn cell_to_value(cell: &DataType) -> CellValue {
    match cell {
        DataType::String(value) => CellValue::Text(value.clone()),
        DataType::Float(value) => CellValue::Number(*value),
        DataType::Int(value) => CellValue::Number(*value as f64),
        DataType::Bool(value) => CellValue::Bool(*value),
        DataType::DateTime(serial) => excel_serial_to_datetime(*serial)
            .map(CellValue::Date)
            .unwrap_or(CellValue::Number(*serial)),
        DataType::Empty => CellValue::Empty,
        other => CellValue::Text(other.to_string()),
    }
}

/// Converts an Excel date serial from the 1900 date system (days since
/// 1899-12-30) into a date-time rounded to the second. Serials below 60 are
/// shifted a day to undo the Lotus 1-2-3 leap-year bug. Returns `None` when
/// the serial falls outside chrono's calendar.
fn excel_serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() || serial.abs() > MAX_SERIAL_DAYS {
        return None;
    }
    let seconds = (serial * SECONDS_PER_DAY).round() as i64;
    let leap_bug = if serial < 60.0 { 1 } else { 0 };
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    epoch
        .checked_add_signed(Duration::try_days(leap_bug)?)?
        .checked_add_signed(Duration::try_seconds(seconds)?)
}
