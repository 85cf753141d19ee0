use std::path::Path;

use tracing::{debug, info, instrument, warn};

use crate::config::ViewerConfig;
use crate::error::{Result, ToolError};
use crate::inventory::{self, ColumnMap, Partition, SearchOutcome, SearchQuery};
use crate::io::{excel_read, excel_write};
use crate::model::{Category, Table};
use crate::store::{InventoryStore, UploadGate};

/// The inventory sheet together with its resolved field columns.
#[derive(Debug, Clone, PartialEq)]
pub struct Inventory {
    pub table: Table,
    pub columns: ColumnMap,
}

/// Loads the configured sheet of the backing workbook.
#[instrument(
    level = "info",
    skip_all,
    fields(path = %config.inventory_path.display(), sheet = %config.sheet)
)]
pub fn load_inventory(config: &ViewerConfig) -> Result<Inventory> {
    let path = &config.inventory_path;
    if !path.exists() {
        return Err(ToolError::MissingInput(path.clone()));
    }

    let table = excel_read::load_sheet(path, &config.sheet)?;
    info!(rows = table.len(), "inventory loaded");
    let columns = ColumnMap::resolve(&table, config);
    for (field, column) in columns.iter() {
        match column {
            Some(column) => debug!(%field, column, "field resolved"),
            None => debug!(%field, "field not found"),
        }
    }
    Ok(Inventory { table, columns })
}

/// Loads the inventory and splits it by location category.
#[instrument(level = "info", skip_all)]
pub fn show(config: &ViewerConfig) -> Result<Partition> {
    let inventory = load_inventory(config)?;
    let partition = inventory::partition(&inventory.table, &inventory.columns)?;
    info!(
        local = partition.local.len(),
        outstation = partition.outstation.len(),
        other = partition.other.len(),
        "inventory partitioned"
    );
    Ok(partition)
}

/// Searches the inventory, optionally within one category only.
#[instrument(level = "info", skip_all, fields(?category))]
pub fn search(
    config: &ViewerConfig,
    query: &SearchQuery,
    category: Option<Category>,
) -> Result<SearchOutcome> {
    let inventory = load_inventory(config)?;
    let outcome = match category {
        Some(category) => {
            let partition = inventory::partition(&inventory.table, &inventory.columns)?;
            inventory::search(partition.get(category), &inventory.columns, query)
        }
        None => inventory::search(&inventory.table, &inventory.columns, query),
    };
    for field in &outcome.skipped {
        warn!(%field, "search filter skipped: column not found");
    }
    info!(matches = outcome.table.len(), "search finished");
    Ok(outcome)
}

/// Writes the rows of `category` to a new workbook at `output`.
#[instrument(
    level = "info",
    skip_all,
    fields(output = %output.display(), %category)
)]
pub fn export(config: &ViewerConfig, category: Category, output: &Path) -> Result<usize> {
    let partition = show(config)?;
    let table = partition.get(category);
    excel_write::write_table(output, category.sheet_name(), table)?;
    info!(rows = table.len(), "category exported");
    Ok(table.len())
}

/// Resolves every logical field of the inventory sheet.
#[instrument(level = "info", skip_all)]
pub fn describe_columns(config: &ViewerConfig) -> Result<ColumnMap> {
    Ok(load_inventory(config)?.columns)
}

/// Replaces the backing workbook with `source` when the password allows it.
#[instrument(level = "info", skip_all, fields(source = %source.display()))]
pub fn upload(config: &ViewerConfig, source: &Path, password: Option<&str>) -> Result<()> {
    let gate = UploadGate::new(config.upload_password.clone());
    let store = InventoryStore::new(config.inventory_path.clone());
    store.replace_from(source, &config.sheet, password, &gate)
}
