//! Bulk import of readings from tabular (CSV) rows

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// One parsed row, keyed by header, every value still text
pub type ImportRow = HashMap<String, String>;

/// Header names understood by the importer (matched case-insensitively)
pub mod columns {
    pub const COMPONENT: &[&str] = &["Component", "component_name"];
    pub const TEST_DATE: &str = "test_date";
    pub const INSPECTOR: &str = "inspector";
    pub const READING_VALUE: &str = "reading_value";
    pub const NOTES: &str = "notes";

    pub const DATE_FORMAT: &str = "%Y-%m-%d";
}

/// Raw value of the first listed header that holds a non-blank value.
///
/// Names are tried in the given order. For each name an exact header wins
/// over headers that differ only in ASCII case, which are tried in key order.
pub fn row_value<'a>(row: &'a ImportRow, names: &[&str]) -> Option<&'a str> {
    names.iter().find_map(|name| {
        let mut folded: Vec<(&String, &String)> = row
            .iter()
            .filter(|(key, _)| key.as_str() != *name && key.trim().eq_ignore_ascii_case(name))
            .collect();
        folded.sort_by(|a, b| a.0.cmp(b.0));

        row.get(*name)
            .into_iter()
            .chain(folded.into_iter().map(|(_, value)| value))
            .map(String::as_str)
            .find(|value| !value.trim().is_empty())
    })
}

/// Same as [`row_value`] with surrounding whitespace removed.
/// Blank values count as missing.
pub fn row_field<'a>(row: &'a ImportRow, names: &[&str]) -> Option<&'a str> {
    row_value(row, names).map(str::trim)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum RowErrorReason {
    UnknownComponent,
    MissingField(String),
    InvalidDate(String),
    InvalidValue(String),
}

impl fmt::Display for RowErrorReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownComponent => write!(f, "component not found"),
            Self::MissingField(name) => write!(f, "missing {}", name),
            Self::InvalidDate(value) => write!(f, "invalid test date '{}'", value),
            Self::InvalidValue(value) => write!(f, "reading value '{}' is not a number", value),
        }
    }
}

/// A row that was rejected before reaching the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowError {
    /// 1-based data row number (header excluded)
    pub row: usize,
    /// Component name from the row, or "row N" when it is blank
    pub identifier: String,
    pub reason: RowErrorReason,
}

/// Outcome of a bulk import
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImportResult {
    /// Rows written to the store
    pub success_count: usize,
    /// Rows rejected by validation
    pub error_count: usize,
    /// Distinct identifiers of rejected rows, in first-seen order
    pub errors: Vec<String>,
    pub row_errors: Vec<RowError>,
    /// Set when the bulk write itself failed
    pub store_error: Option<String>,
    /// Valid rows lost because the bulk write failed
    pub store_failed_count: usize,
}

impl ImportResult {
    pub fn record_row_error(&mut self, error: RowError) {
        self.error_count += 1;
        if !self.errors.contains(&error.identifier) {
            self.errors.push(error.identifier.clone());
        }
        self.row_errors.push(error);
    }

    pub fn has_failures(&self) -> bool {
        self.error_count > 0 || self.store_error.is_some()
    }

    /// Notice shown to the user after the import
    pub fn summary(&self) -> String {
        let mut message = format!(
            "{} readings were imported successfully.",
            self.success_count
        );
        if self.error_count > 0 {
            message.push_str(&format!(
                "\n\n{} readings failed for the following components:\n- {}",
                self.error_count,
                self.errors.join("\n- ")
            ));
        }
        if let Some(store_error) = &self.store_error {
            message.push_str(&format!(
                "\n\n{} valid readings could not be saved: {}",
                self.store_failed_count, store_error
            ));
        }
        message
    }
}
