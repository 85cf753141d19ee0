//! Core library for the inventory-viewer command line application.
//!
//! The viewer loads an Excel inventory sheet, locates its logical fields with
//! the header matcher in [`resolve`], and offers category splits, free-text
//! search, export and workbook replacement. Spreadsheet IO lives under
//! [`io`], row operations in [`inventory`], on-disk replacement in [`store`],
//! and the entry points used by the binary in [`viewer`].

pub mod config;
pub mod error;
pub mod inventory;
pub mod io;
pub mod model;
pub mod render;
pub mod resolve;
pub mod store;
pub mod telemetry;
pub mod viewer;

pub use config::ViewerConfig;
pub use error::{Result, ToolError};
pub use resolve::{ColumnResolver, MatchMode, find_column, normalize_key};
