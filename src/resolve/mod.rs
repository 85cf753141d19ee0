//! Header resolution for spreadsheets whose column names drift between
//! versions.
//!
//! A logical field is described by an ordered list of candidate labels, most
//! preferred first. [`ColumnResolver::resolve`] compares those labels to the
//! actual headers through their normalized keys: an exact pass over all
//! candidates runs first, and only when it finds nothing does a substring pass
//! run. A miss is an ordinary `None`, never an error.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Controls how the substring pass treats empty normalized keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Empty keys take part in the substring pass. An empty key is contained in
    /// every other key, so a candidate such as `"--"` matches the first column.
    #[default]
    Legacy,
    /// Empty keys, on either side, never match in the substring pass.
    Strict,
}

/// Reduces a label to lower-case ASCII letters and digits.
///
/// ```
/// use inventory_viewer::resolve::normalize_key;
///
/// assert_eq!(normalize_key(" Item-Code "), "itemcode");
/// ```
pub fn normalize_key(value: &str) -> String {
    value
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|ch| ch.to_ascii_lowercase())
        .collect()
}

/// Resolves `candidates` against `columns` in [`MatchMode::Legacy`].
pub fn find_column<'a, C, S>(columns: &'a [C], candidates: &[S]) -> Option<&'a str>
where
    C: AsRef<str>,
    S: AsRef<str>,
{
    ColumnResolver::default().resolve(columns, candidates)
}

/// Stateless matcher mapping candidate labels onto actual column names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColumnResolver {
    mode: MatchMode,
}

impl ColumnResolver {
    pub fn new(mode: MatchMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    /// Returns the column the candidates refer to, if any.
    ///
    /// Headers that normalize to the same key collapse into one entry: the
    /// later header name wins but the entry keeps the position of the first.
    /// When a candidate is a substring match for several columns, the first
    /// column in input order wins.
    pub fn resolve<'a, C, S>(&self, columns: &'a [C], candidates: &[S]) -> Option<&'a str>
    where
        C: AsRef<str>,
        S: AsRef<str>,
    {
        let lookup = HeaderLookup::build(columns);
        if lookup.is_empty() {
            return None;
        }

        let keys: Vec<String> = candidates
            .iter()
            .map(|candidate| normalize_key(candidate.as_ref()))
            .collect();

        keys.iter()
            .find_map(|key| lookup.exact(key))
            .or_else(|| keys.iter().find_map(|key| lookup.containing(key, self.mode)))
    }
}

struct HeaderLookup<'a> {
    entries: Vec<(String, &'a str)>,
    index: HashMap<String, usize>,
}

impl<'a> HeaderLookup<'a> {
    fn build<C: AsRef<str>>(columns: &'a [C]) -> Self {
        let mut entries: Vec<(String, &'a str)> = Vec::with_capacity(columns.len());
        let mut index: HashMap<String, usize> = HashMap::with_capacity(columns.len());

        for column in columns {
            let name = column.as_ref();
            let key = normalize_key(name);
            match index.get(&key) {
                Some(&slot) => entries[slot].1 = name,
                None => {
                    index.insert(key.clone(), entries.len());
                    entries.push((key, name));
                }
            }
        }

        Self { entries, index }
    }

    fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn exact(&self, key: &str) -> Option<&'a str> {
        self.index.get(key).map(|&slot| self.entries[slot].1)
    }

    fn containing(&self, key: &str, mode: MatchMode) -> Option<&'a str> {
        if mode == MatchMode::Strict && key.is_empty() {
            return None;
        }
        self.entries
            .iter()
            .filter(|(column_key, _)| mode == MatchMode::Legacy || !column_key.is_empty())
            .find(|(column_key, _)| column_key.contains(key) || key.contains(column_key.as_str()))
            .map(|(_, name)| *name)
    }
}
