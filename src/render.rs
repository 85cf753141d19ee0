use std::fmt::Write as _;

use serde::Serialize;

use crate::error::Result;
use crate::inventory::{ColumnMap, Partition, SearchOutcome};
use crate::model::{Category, Table};

/// Widest a text column is allowed to grow before its cells are truncated.
const MAX_CELL_WIDTH: usize = 40;

/// Renders a table with aligned, pipe-separated columns.
pub fn table_text(table: &Table) -> String {
    let cells: Vec<Vec<String>> = table
        .rows
        .iter()
        .map(|row| row.iter().map(|cell| clip(&cell.to_string())).collect())
        .collect();

    let mut widths: Vec<usize> = table
        .columns
        .iter()
        .map(|column| clip(column).chars().count())
        .collect();
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let header: Vec<String> = table.columns.iter().map(|column| clip(column)).collect();
    push_line(&mut out, &header, &widths);
    let rule: Vec<String> = widths.iter().map(|width| "-".repeat(*width)).collect();
    push_line(&mut out, &rule, &widths);
    for row in &cells {
        push_line(&mut out, row, &widths);
    }
    out
}

/// Renders every category of a partition, or only `only` when given.
pub fn partition_text(partition: &Partition, only: Option<Category>) -> String {
    let mut out = String::new();
    for (category, table) in partition.iter() {
        if only.is_some_and(|wanted| wanted != category) {
            continue;
        }
        let _ = writeln!(out, "== {category} ({} rows) ==", table.len());
        if table.is_empty() {
            out.push_str("(no rows)\n");
        } else {
            out.push_str(&table_text(table));
        }
        out.push('\n');
    }
    out
}

pub fn search_text(outcome: &SearchOutcome) -> String {
    let mut out = String::new();
    for field in &outcome.skipped {
        let _ = writeln!(out, "warning: no '{field}' column found; filter skipped");
    }
    let _ = writeln!(out, "{} matching rows", outcome.table.len());
    if !outcome.table.is_empty() {
        out.push_str(&table_text(&outcome.table));
    }
    out
}

pub fn columns_text(columns: &ColumnMap) -> String {
    let mut out = String::new();
    for (field, column) in columns.iter() {
        let _ = match column {
            Some(column) => writeln!(out, "{:<14} -> {column}", field.label()),
            None => writeln!(out, "{:<14} -> (not found)", field.label()),
        };
    }
    out
}

/// Pretty-printed JSON for any serialisable view.
pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

fn push_line(out: &mut String, cells: &[String], widths: &[usize]) {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect();
    out.push_str(line.join(" | ").trim_end());
    out.push('\n');
}

fn clip(value: &str) -> String {
    let single_line = value.replace(['\r', '\n'], " ");
    if single_line.chars().count() <= MAX_CELL_WIDTH {
        return single_line;
    }
    let mut clipped: String = single_line.chars().take(MAX_CELL_WIDTH - 1).collect();
    clipped.push('…');
    clipped
}
