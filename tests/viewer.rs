use std::fs;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use inventory_viewer::inventory::SearchQuery;
use inventory_viewer::io::{excel_read, excel_write};
use inventory_viewer::model::{Category, CellValue, Field, Table};
use inventory_viewer::{MatchMode, ToolError, ViewerConfig, viewer};
use rust_xlsxwriter::{Format, Workbook};
use tempfile::tempdir;

fn text(value: &str) -> CellValue {
    CellValue::Text(value.to_string())
}

fn inventory_table() -> Table {
    Table::new(
        vec![
            "Item-Code ".into(),
            "Customer Name".into(),
            "Brand".into(),
            "Qty".into(),
            "Remarks".into(),
            "Check".into(),
        ],
        vec![
            vec![
                text("BG-101"),
                text("Apollo Labs"),
                text("Biogene"),
                CellValue::Number(12.0),
                text("urgent"),
                text("Local"),
            ],
            vec![
                text("BG-102"),
                text("Metro Diagnostics"),
                text("Acme"),
                CellValue::Number(4.0),
                CellValue::Empty,
                text("outstation"),
            ],
            vec![
                text("BG-103"),
                text("Apollo Hospitals"),
                text("Biogene"),
                CellValue::Number(7.5),
                text("hold"),
                text("On Stock"),
            ],
            vec![
                text("BG-104"),
                text("City Clinic"),
                text("Zenith"),
                CellValue::Number(1.0),
                text("dispatch monday"),
                text("LOCAL"),
            ],
        ],
    )
}

fn datetime(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(hour, minute, 0))
        .expect("valid date")
}

fn write_inventory(path: &Path, sheet: &str, table: &Table) {
    excel_write::write_table(path, sheet, table).expect("inventory workbook written");
}

fn config_for(path: &Path) -> ViewerConfig {
    ViewerConfig {
        inventory_path: path.to_path_buf(),
        ..ViewerConfig::default()
    }
}

#[test]
fn workbook_roundtrip_preserves_headers_and_cells() {
    let temp_dir = tempdir().expect("temporary directory");
    let path = temp_dir.path().join("stock.xlsx");
    let table = inventory_table();
    write_inventory(&path, "Current Inventory", &table);

    let loaded = excel_read::load_sheet(&path, "Current Inventory").expect("sheet loaded");
    assert_eq!(loaded.columns, table.columns);
    assert_eq!(loaded.rows, table.rows);
}

#[test]
fn show_splits_rows_by_check_column() {
    let temp_dir = tempdir().expect("temporary directory");
    let path = temp_dir.path().join("current_inventory.xlsx");
    write_inventory(&path, "Current Inventory", &inventory_table());

    let partition = viewer::show(&config_for(&path)).expect("inventory shown");

    assert_eq!(partition.local.len(), 2);
    assert_eq!(partition.outstation.len(), 1);
    assert_eq!(partition.other.len(), 1);
    assert_eq!(partition.other.rows[0][0], text("BG-103"));
}

#[test]
fn missing_sheet_is_reported_with_available_names() {
    let temp_dir = tempdir().expect("temporary directory");
    let path = temp_dir.path().join("current_inventory.xlsx");
    write_inventory(&path, "Sheet1", &inventory_table());

    let error = viewer::show(&config_for(&path)).expect_err("sheet is missing");
    match error {
        ToolError::MissingSheet { sheet, available } => {
            assert_eq!(sheet, "Current Inventory");
            assert_eq!(available, vec!["Sheet1".to_string()]);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn missing_workbook_is_reported() {
    let temp_dir = tempdir().expect("temporary directory");
    let path = temp_dir.path().join("absent.xlsx");

    let error = viewer::show(&config_for(&path)).expect_err("workbook is missing");
    assert!(matches!(error, ToolError::MissingInput(_)));
}

#[test]
fn missing_check_column_is_reported() {
    let temp_dir = tempdir().expect("temporary directory");
    let path = temp_dir.path().join("current_inventory.xlsx");
    let table = Table::new(
        vec!["Item Code".into(), "Qty".into()],
        vec![vec![text("BG-1"), CellValue::Number(1.0)]],
    );
    write_inventory(&path, "Current Inventory", &table);

    let error = viewer::show(&config_for(&path)).expect_err("check column is missing");
    assert!(matches!(error, ToolError::MissingColumn(Field::Check)));
}

#[test]
fn search_filters_within_category() {
    let temp_dir = tempdir().expect("temporary directory");
    let path = temp_dir.path().join("current_inventory.xlsx");
    write_inventory(&path, "Current Inventory", &inventory_table());
    let config = config_for(&path);

    let query = SearchQuery {
        customer: Some("apollo".into()),
        ..SearchQuery::default()
    };
    let everywhere = viewer::search(&config, &query, None).expect("search everywhere");
    assert_eq!(everywhere.table.len(), 2);

    let local = viewer::search(&config, &query, Some(Category::Local)).expect("search local");
    assert_eq!(local.table.len(), 1);
    assert_eq!(local.table.rows[0][0], text("BG-101"));
}

#[test]
fn describe_columns_uses_configured_candidates() {
    let temp_dir = tempdir().expect("temporary directory");
    let path = temp_dir.path().join("current_inventory.xlsx");
    write_inventory(&path, "Current Inventory", &inventory_table());

    let mut config = config_for(&path);
    config.fields.insert(Field::Remarks, vec!["Qty".into()]);
    config.match_mode = MatchMode::Strict;

    let columns = viewer::describe_columns(&config).expect("columns described");
    assert_eq!(columns.column(Field::ItemCode), Some("Item-Code "));
    assert_eq!(columns.column(Field::Remarks), Some("Qty"));
    assert_eq!(columns.column(Field::Check), Some("Check"));
}

#[test]
fn export_writes_only_the_requested_category() {
    let temp_dir = tempdir().expect("temporary directory");
    let path = temp_dir.path().join("current_inventory.xlsx");
    write_inventory(&path, "Current Inventory", &inventory_table());
    let output = temp_dir.path().join("local.xlsx");

    let rows = viewer::export(&config_for(&path), Category::Local, &output).expect("exported");
    assert_eq!(rows, 2);

    let exported = excel_read::load_sheet(&output, "Local").expect("export read back");
    assert_eq!(exported.len(), 2);
    assert_eq!(exported.rows[1][0], text("BG-104"));
}

#[test]
fn upload_replaces_workbook_when_password_matches() {
    let temp_dir = tempdir().expect("temporary directory");
    let path = temp_dir.path().join("current_inventory.xlsx");
    write_inventory(&path, "Current Inventory", &inventory_table());

    let replacement = temp_dir.path().join("new.xlsx");
    let table = Table::new(
        vec!["Item Code".into(), "Check".into()],
        vec![vec![text("NEW-1"), text("Outstation")]],
    );
    write_inventory(&replacement, "Current Inventory", &table);

    let mut config = config_for(&path);
    config.upload_password = Some("letmein".into());

    let rejected = viewer::upload(&config, &replacement, Some("guess"));
    assert!(matches!(rejected, Err(ToolError::Unauthorized)));
    assert_eq!(viewer::show(&config).expect("still old").local.len(), 2);

    viewer::upload(&config, &replacement, Some("letmein")).expect("upload accepted");
    let partition = viewer::show(&config).expect("new inventory shown");
    assert_eq!(partition.outstation.len(), 1);
    assert!(partition.local.is_empty());
    assert!(!temp_dir.path().join("current_inventory.xlsx.upload").exists());
}

#[test]
fn upload_rejects_workbook_without_inventory_sheet() {
    let temp_dir = tempdir().expect("temporary directory");
    let path = temp_dir.path().join("current_inventory.xlsx");
    let replacement = temp_dir.path().join("new.xlsx");
    write_inventory(&replacement, "Stock", &inventory_table());

    let error = viewer::upload(&config_for(&path), &replacement, None).expect_err("rejected");
    assert!(matches!(error, ToolError::MissingSheet { .. }));
    assert!(!path.exists());
}

#[test]
fn upload_rejects_non_excel_files() {
    let temp_dir = tempdir().expect("temporary directory");
    let path = temp_dir.path().join("current_inventory.xlsx");
    let replacement = temp_dir.path().join("stock.csv");
    fs::write(&replacement, "Item Code,Check\nA,Local\n").expect("csv written");

    let error = viewer::upload(&config_for(&path), &replacement, None).expect_err("rejected");
    assert!(matches!(error, ToolError::UnsupportedFileType(_)));
}

#[test]
fn config_file_overrides_defaults() {
    let temp_dir = tempdir().expect("temporary directory");
    let config_path = temp_dir.path().join("viewer.json");
    fs::write(
        &config_path,
        r#"{"sheet": "Stock", "match_mode": "strict", "upload_password": "pw"}"#,
    )
    .expect("config written");

    let config = ViewerConfig::from_file(&config_path).expect("config loaded");
    assert_eq!(config.sheet, "Stock");
    assert_eq!(config.match_mode, MatchMode::Strict);
    assert_eq!(config.upload_password.as_deref(), Some("pw"));
}

#[test]
fn date_formatted_cells_load_as_dates() {
    let temp_dir = tempdir().expect("temporary directory");
    let path = temp_dir.path().join("dated.xlsx");

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name("Current Inventory").expect("sheet named");
    let date_format = Format::new().set_num_format("yyyy-mm-dd");
    let datetime_format = Format::new().set_num_format("yyyy-mm-dd hh:mm");
    worksheet.write_string(0, 0, "Item Code").expect("header");
    worksheet.write_string(0, 1, "Dispatch Date").expect("header");
    worksheet.write_string(0, 2, "Loaded At").expect("header");
    worksheet.write_string(0, 3, "Broken Date").expect("header");
    worksheet.write_string(1, 0, "BG-101").expect("cell");
    worksheet
        .write_number_with_format(1, 1, 45_292.0, &date_format)
        .expect("date cell");
    worksheet
        .write_number_with_format(1, 2, 45_351.5, &datetime_format)
        .expect("date-time cell");
    worksheet
        .write_number_with_format(1, 3, 1.0e12, &date_format)
        .expect("out-of-range date cell");
    workbook.save(&path).expect("workbook saved");

    let table = excel_read::load_sheet(&path, "Current Inventory").expect("sheet loaded");
    let row = &table.rows[0];
    assert_eq!(row[1], CellValue::Date(datetime(2024, 1, 1, 0, 0)));
    assert_eq!(row[2], CellValue::Date(datetime(2024, 2, 29, 12, 0)));
    assert_eq!(row[1].to_string(), "2024-01-01");
    assert_eq!(row[3], CellValue::Number(1.0e12));
}

#[test]
fn exported_dates_stay_dates() {
    let temp_dir = tempdir().expect("temporary directory");
    let path = temp_dir.path().join("current_inventory.xlsx");
    let table = Table::new(
        vec!["Item Code".into(), "Dispatch Date".into(), "Check".into()],
        vec![
            vec![
                text("BG-101"),
                CellValue::Date(datetime(2024, 3, 15, 0, 0)),
                text("Local"),
            ],
            vec![
                text("BG-102"),
                CellValue::Date(datetime(2024, 3, 16, 9, 45)),
                text("Local"),
            ],
        ],
    );
    write_inventory(&path, "Current Inventory", &table);
    let output = temp_dir.path().join("local.xlsx");

    viewer::export(&config_for(&path), Category::Local, &output).expect("exported");

    let exported = excel_read::load_sheet(&output, "Local").expect("export read back");
    assert_eq!(exported.rows, table.rows);
}
