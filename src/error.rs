use std::path::PathBuf;

use thiserror::Error;

use crate::model::Field;

/// Convenient alias for fallible results returned throughout the crate.
pub type Result<T> = std::result::Result<T, ToolError>;

/// Error type covering the different failure cases that can occur when the
/// viewer loads, filters, exports, or replaces an inventory workbook.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Wrapper for IO failures such as reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Raised when JSON parsing or serialization fails.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Errors bubbled up from the Excel writer implementation.
    #[error("Excel write error: {0}")]
    ExcelWrite(#[from] rust_xlsxwriter::XlsxError),

    /// Errors bubbled up from the Excel reader implementation.
    #[error("Excel read error: {0}")]
    ExcelRead(#[from] calamine::Error),

    /// Raised when the workbook does not contain the requested sheet.
    #[error("sheet '{sheet}' not found in workbook (available: {})", .available.join(", "))]
    MissingSheet {
        sheet: String,
        available: Vec<String>,
    },

    /// Raised when an operation needs a field whose column could not be located.
    #[error("'{0}' column not found in the sheet")]
    MissingColumn(Field),

    /// Raised when the user provides a path that does not exist.
    #[error("input file not found: {0}")]
    MissingInput(PathBuf),

    /// Raised when an upload is not an Excel workbook.
    #[error("unsupported file type: {0} (expected .xlsx or .xls)")]
    UnsupportedFileType(PathBuf),

    /// Raised when an upload is attempted without the right password.
    #[error("incorrect upload password")]
    Unauthorized,

    /// Raised when the configuration file holds unusable values.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Raised when the tracing subscriber fails to initialise.
    #[error("failed to initialise logging: {0}")]
    Logging(String),
}
