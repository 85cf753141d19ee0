use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, ToolError};
use crate::model::Field;
use crate::resolve::{ColumnResolver, MatchMode};

/// Default location of the backing workbook, relative to the working directory.
pub const DEFAULT_INVENTORY_PATH: &str = "current_inventory.xlsx";
/// Sheet the inventory rows are read from.
pub const DEFAULT_SHEET: &str = "Current Inventory";
/// Environment variable consulted when the config file sets no upload password.
pub const PASSWORD_ENV: &str = "INVENTORY_UPLOAD_PASSWORD";

/// Settings shared by every viewer operation. A value of this type is built
/// once per invocation and handed to each operation explicitly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewerConfig {
    pub inventory_path: PathBuf,
    pub sheet: String,
    pub match_mode: MatchMode,
    pub upload_password: Option<String>,
    /// Candidate header labels replacing the built-in list for a field.
    pub fields: BTreeMap<Field, Vec<String>>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            inventory_path: PathBuf::from(DEFAULT_INVENTORY_PATH),
            sheet: DEFAULT_SHEET.to_string(),
            match_mode: MatchMode::default(),
            upload_password: None,
            fields: BTreeMap::new(),
        }
    }
}

impl ViewerConfig {
    /// Loads a JSON config file. Keys that are absent keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ToolError::MissingInput(path.to_path_buf()));
        }
        let data = fs::read_to_string(path)?;
        let config: ViewerConfig = serde_json::from_str(&data)?;
        config.validate()?;
        debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// Fills the upload password from the environment when none is configured.
    pub fn with_env_password(mut self) -> Self {
        if self.upload_password.is_none() {
            self.upload_password = std::env::var(PASSWORD_ENV)
                .ok()
                .filter(|value| !value.is_empty());
        }
        self
    }

    pub fn resolver(&self) -> ColumnResolver {
        ColumnResolver::new(self.match_mode)
    }

    /// Candidate labels for `field`, honouring any override.
    pub fn candidates(&self, field: Field) -> Vec<String> {
        match self.fields.get(&field) {
            Some(labels) => labels.clone(),
            None => field
                .default_candidates()
                .iter()
                .map(|label| label.to_string())
                .collect(),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.sheet.trim().is_empty() {
            return Err(ToolError::InvalidConfig("sheet name must not be empty".into()));
        }
        if let Some((field, _)) = self.fields.iter().find(|(_, labels)| labels.is_empty()) {
            return Err(ToolError::InvalidConfig(format!(
                "candidate list for '{field}' must not be empty"
            )));
        }
        Ok(())
    }
}
