use std::path::Path;

use chrono::NaiveTime;
use rust_xlsxwriter::{Format, Workbook, Worksheet};

use crate::error::Result;
use crate::model::{CellValue, Table};

/// Writes a single table to a new workbook at `path`.
pub fn write_table(path: &Path, sheet_name: &str, table: &Table) -> Result<()> {
    write_tables(path, &[(sheet_name, table)])
}

/// Writes each `(sheet name, table)` pair as its own worksheet.
pub fn write_tables(path: &Path, sheets: &[(&str, &Table)]) -> Result<()> {
    let mut workbook_writer = Workbook::new();
    let formats = DateFormats::new();

    for (sheet_name, table) in sheets {
        let worksheet = workbook_writer.add_worksheet();
        worksheet.set_name(*sheet_name)?;

        for (col_idx, header) in table.columns.iter().enumerate() {
            worksheet.write_string(0, col_idx as u16, header)?;
        }

        for (row_idx, row) in table.rows.iter().enumerate() {
            for (col_idx, cell) in row.iter().enumerate() {
                write_cell(worksheet, (row_idx + 1) as u32, col_idx as u16, cell, &formats)?;
            }
        }

        if !table.rows.is_empty() && !table.columns.is_empty() {
            let mut excel_table = rust_xlsxwriter::Table::new();
            excel_table.set_autofilter(true);
            let col_end = (table.columns.len() as u16).saturating_sub(1);
            worksheet.add_table(0, 0, table.rows.len() as u32, col_end, &excel_table)?;
        }
    }

    workbook_writer.save(path)?;
    Ok(())
}

/// Number formats that make Excel (and calamine) read a cell back as a date.
struct DateFormats {
    date: Format,
    datetime: Format,
}

impl DateFormats {
    fn new() -> Self {
        Self {
            date: Format::new().set_num_format("yyyy-mm-dd"),
            datetime: Format::new().set_num_format("yyyy-mm-dd hh:mm:ss"),
        }
    }
}

fn write_cell(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    cell: &CellValue,
    formats: &DateFormats,
) -> Result<()> {
    match cell {
        CellValue::Text(value) => {
            worksheet.write_string(row, col, value)?;
        }
        CellValue::Date(value) => {
            let format = if value.time() == NaiveTime::MIN {
                &formats.date
            } else {
                &formats.datetime
            };
            worksheet.write_datetime_with_format(row, col, value, format)?;
        }
        CellValue::Number(value) => {
            worksheet.write_number(row, col, *value)?;
        }
        CellValue::Bool(value) => {
            worksheet.write_boolean(row, col, *value)?;
        }
        CellValue::Empty => {}
    }
    Ok(())
}
