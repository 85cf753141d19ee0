use std::fmt;

use chrono::{NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize, Serializer};

/// A single spreadsheet cell after it has been read from the workbook.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    /// Plain text.
    Text(String),
    /// Any numeric cell; Excel stores integers as floats too.
    Number(f64),
    /// Boolean cell.
    Bool(bool),
    /// Date or date-time cell.
    #[serde(serialize_with = "serialize_date")]
    Date(NaiveDateTime),
    /// Blank cell.
    Empty,
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(value) => value.trim().is_empty(),
            _ => false,
        }
    }

    /// Returns the text content when the cell holds a string.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(value) => Some(value),
            _ => None,
        }
    }

    /// Case-insensitive substring test against the rendered cell. Blank cells
    /// never match.
    pub fn contains_ignore_case(&self, needle_lower: &str) -> bool {
        if matches!(self, CellValue::Empty) {
            return false;
        }
        self.to_string().to_lowercase().contains(needle_lower)
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(value) => f.write_str(value),
            CellValue::Date(value) if value.time() == NaiveTime::MIN => {
                write!(f, "{}", value.format("%Y-%m-%d"))
            }
            CellValue::Date(value) => write!(f, "{}", value.format("%Y-%m-%d %H:%M:%S")),
            CellValue::Number(value) if value.fract() == 0.0 && value.abs() < 1e15 => {
                write!(f, "{}", *value as i64)
            }
            CellValue::Number(value) => write!(f, "{value}"),
            CellValue::Bool(value) => write!(f, "{value}"),
            CellValue::Empty => Ok(()),
        }
    }
}

fn serialize_date<S: Serializer>(
    value: &NaiveDateTime,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_str(&CellValue::Date(*value))
}

/// An ordered set of uniquely named columns and the rows beneath them.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl Table {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        Self { columns, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of the column with exactly this name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    /// Builds a new table holding the rows accepted by `keep`. The source
    /// table is left untouched.
    pub fn filter_rows<F>(&self, mut keep: F) -> Table
    where
        F: FnMut(&[CellValue]) -> bool,
    {
        let rows = self
            .rows
            .iter()
            .filter(|row| keep(row.as_slice()))
            .cloned()
            .collect();
        Table::new(self.columns.clone(), rows)
    }
}

/// Logical spreadsheet fields the viewer knows how to locate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    ItemCode,
    Customer,
    Brand,
    Remarks,
    Check,
}

impl Field {
    pub const ALL: [Field; 5] = [
        Field::ItemCode,
        Field::Customer,
        Field::Brand,
        Field::Remarks,
        Field::Check,
    ];

    /// Fields offered for free-text search.
    pub const SEARCHABLE: [Field; 4] = [
        Field::ItemCode,
        Field::Customer,
        Field::Brand,
        Field::Remarks,
    ];

    /// Header labels tried for this field, most preferred first.
    pub fn default_candidates(self) -> &'static [&'static str] {
        match self {
            Field::ItemCode => &["Item Code", "ItemCode", "SKU", "Product Code"],
            Field::Customer => &["Customer Name", "CustomerName", "Customer", "CustName"],
            Field::Brand => &["Brand", "BrandName", "Product Brand", "Company"],
            Field::Remarks => &["Remarks", "Remark", "Notes", "Comments"],
            Field::Check => &["Check", "Location", "Status", "Type", "StockType"],
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Field::ItemCode => "Item Code",
            Field::Customer => "Customer Name",
            Field::Brand => "Brand",
            Field::Remarks => "Remarks",
            Field::Check => "Check",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Location category assigned to an inventory row by its Check value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Local,
    Outstation,
    Other,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Local, Category::Outstation, Category::Other];

    /// Classifies a Check cell. Anything that is not the text `local` or
    /// `outstation` (ignoring case and surrounding blanks) lands in `Other`.
    pub fn classify(cell: &CellValue) -> Category {
        match cell.as_text().map(|value| value.trim().to_lowercase()) {
            Some(value) if value == "local" => Category::Local,
            Some(value) if value == "outstation" => Category::Outstation,
            _ => Category::Other,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::Local => "Local",
            Category::Outstation => "Outstation",
            Category::Other => "Other/OnStock",
        }
    }

    /// Name used for the worksheet when the category is exported.
    pub fn sheet_name(self) -> &'static str {
        match self {
            Category::Local => "Local",
            Category::Outstation => "Outstation",
            Category::Other => "Other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
