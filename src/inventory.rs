//! Row-level operations over a loaded inventory sheet: locating the logical
//! fields, splitting rows by location category, and free-text search. Every
//! operation returns new tables and leaves its input untouched.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::config::ViewerConfig;
use crate::error::{Result, ToolError};
use crate::model::{Category, CellValue, Field, Table};

/// Column resolved for each logical field of one table.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ColumnMap {
    columns: BTreeMap<Field, Option<String>>,
}

impl ColumnMap {
    /// Resolves every [`Field`] against the table's headers.
    pub fn resolve(table: &Table, config: &ViewerConfig) -> Self {
        let resolver = config.resolver();
        let columns = Field::ALL
            .into_iter()
            .map(|field| {
                let candidates = config.candidates(field);
                let column = resolver
                    .resolve(table.columns.as_slice(), candidates.as_slice())
                    .map(str::to_string);
                (field, column)
            })
            .collect();
        Self { columns }
    }

    pub fn column(&self, field: Field) -> Option<&str> {
        self.columns.get(&field).and_then(|column| column.as_deref())
    }

    pub fn require(&self, field: Field) -> Result<&str> {
        self.column(field).ok_or(ToolError::MissingColumn(field))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, Option<&str>)> + '_ {
        self.columns
            .iter()
            .map(|(field, column)| (*field, column.as_deref()))
    }
}

/// Inventory rows split by their Check value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Partition {
    pub local: Table,
    pub outstation: Table,
    pub other: Table,
}

impl Partition {
    pub fn get(&self, category: Category) -> &Table {
        match category {
            Category::Local => &self.local,
            Category::Outstation => &self.outstation,
            Category::Other => &self.other,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, &Table)> {
        Category::ALL
            .into_iter()
            .map(move |category| (category, self.get(category)))
    }
}

/// Splits `table` into Local, Outstation and Other rows.
pub fn partition(table: &Table, columns: &ColumnMap) -> Result<Partition> {
    let check = column_position(table, columns.require(Field::Check)?, Field::Check)?;
    let by_category = |category: Category| {
        table.filter_rows(|row| {
            row.get(check).map_or(Category::Other, Category::classify) == category
        })
    };

    Ok(Partition {
        local: by_category(Category::Local),
        outstation: by_category(Category::Outstation),
        other: by_category(Category::Other),
    })
}

/// Free-text filters. Every term that is set must match for a row to be kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    pub item_code: Option<String>,
    pub customer: Option<String>,
    pub brand: Option<String>,
    pub remarks: Option<String>,
    /// Matches when any searchable field contains the term.
    pub text: Option<String>,
}

impl SearchQuery {
    pub fn term(&self, field: Field) -> Option<&str> {
        let term = match field {
            Field::ItemCode => self.item_code.as_deref(),
            Field::Customer => self.customer.as_deref(),
            Field::Brand => self.brand.as_deref(),
            Field::Remarks => self.remarks.as_deref(),
            Field::Check => None,
        };
        term.map(str::trim).filter(|term| !term.is_empty())
    }

    fn any_text(&self) -> Option<&str> {
        self.text
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        Field::SEARCHABLE
            .into_iter()
            .all(|field| self.term(field).is_none())
            && self.any_text().is_none()
    }
}

/// Result of a search: the matching rows plus the fields whose filters had to
/// be skipped because their column could not be located.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchOutcome {
    pub table: Table,
    pub skipped: Vec<Field>,
}

/// Keeps the rows of `table` that satisfy `query`.
pub fn search(table: &Table, columns: &ColumnMap, query: &SearchQuery) -> SearchOutcome {
    let mut skipped = Vec::new();
    let mut filters: Vec<(usize, String)> = Vec::new();

    for field in Field::SEARCHABLE {
        let Some(term) = query.term(field) else {
            continue;
        };
        match columns
            .column(field)
            .and_then(|name| table.column_index(name))
        {
            Some(index) => filters.push((index, term.to_lowercase())),
            None => skipped.push(field),
        }
    }

    let any_text = query.any_text().map(str::to_lowercase);
    let text_columns: Vec<usize> = Field::SEARCHABLE
        .into_iter()
        .filter_map(|field| columns.column(field))
        .filter_map(|name| table.column_index(name))
        .collect();

    let table = table.filter_rows(|row| {
        let fields_match = filters
            .iter()
            .all(|(index, term)| cell_contains(row, *index, term));
        let text_matches = match &any_text {
            Some(term) => text_columns
                .iter()
                .any(|index| cell_contains(row, *index, term)),
            None => true,
        };
        fields_match && text_matches
    });

    SearchOutcome { table, skipped }
}

/// Cells missing from a short row count as blank, and blanks never match.
fn cell_contains(row: &[CellValue], index: usize, term: &str) -> bool {
    row.get(index)
        .is_some_and(|cell| cell.contains_ignore_case(term))
}

fn column_position(table: &Table, name: &str, field: Field) -> Result<usize> {
    table
        .column_index(name)
        .ok_or(ToolError::MissingColumn(field))
}
