use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, instrument, warn};

use crate::error::{Result, ToolError};
use crate::io::excel_read;

/// Extensions accepted for a replacement workbook.
pub const ACCEPTED_EXTENSIONS: [&str; 2] = ["xlsx", "xls"];

/// Password check guarding workbook replacement.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadGate {
    password: Option<String>,
}

impl UploadGate {
    /// A gate with no password lets every upload through.
    pub fn new(password: Option<String>) -> Self {
        Self { password }
    }

    pub fn is_open(&self) -> bool {
        self.password.is_none()
    }

    pub fn check(&self, supplied: Option<&str>) -> Result<()> {
        match &self.password {
            None => Ok(()),
            Some(expected) if supplied == Some(expected.as_str()) => Ok(()),
            Some(_) => Err(ToolError::Unauthorized),
        }
    }
}

/// The backing workbook on local disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryStore {
    path: PathBuf,
}

impl InventoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Replaces the backing workbook with `source`.
    ///
    /// The source must be an Excel file that contains `sheet`. It is copied
    /// next to the target first and then renamed over it, so readers never see
    /// a partially written workbook.
    #[instrument(
        level = "info",
        skip_all,
        fields(source = %source.display(), target = %self.path.display())
    )]
    pub fn replace_from(
        &self,
        source: &Path,
        sheet: &str,
        password: Option<&str>,
        gate: &UploadGate,
    ) -> Result<()> {
        if let Err(error) = gate.check(password) {
            warn!("upload rejected: wrong password");
            return Err(error);
        }
        if !source.is_file() {
            return Err(ToolError::MissingInput(source.to_path_buf()));
        }
        if !has_accepted_extension(source) {
            return Err(ToolError::UnsupportedFileType(source.to_path_buf()));
        }

        let sheets = excel_read::sheet_names(source)?;
        if !sheets.iter().any(|name| name == sheet) {
            return Err(ToolError::MissingSheet {
                sheet: sheet.to_string(),
                available: sheets,
            });
        }

        if let Some(parent) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let staging = self.staging_path();
        let staged = fs::copy(source, &staging).and_then(|_| fs::rename(&staging, &self.path));
        if let Err(error) = staged {
            let _ = fs::remove_file(&staging);
            return Err(error.into());
        }

        info!("inventory workbook replaced");
        Ok(())
    }

    fn staging_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_default();
        name.push(".upload");
        self.path.with_file_name(name)
    }
}

fn has_accepted_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            ACCEPTED_EXTENSIONS
                .iter()
                .any(|accepted| ext.eq_ignore_ascii_case(accepted))
        })
        .unwrap_or(false)
}
