//! CSV header row representation.

use serde::Serialize;

/// Header row of an uploaded file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CsvHeaders {
    /// Column names in file order, trimmed. Blank names are kept so column
    /// positions line up with data rows.
    pub columns: Vec<String>,
    /// 1-based line of the header row (leading blank lines are skipped).
    pub line: u64,
}

impl CsvHeaders {
    pub fn new(columns: Vec<String>, line: u64) -> Self {
        Self { columns, line }
    }

    /// Returns the number of columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Returns true if there are no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Column names that carry text.
    pub fn non_blank(&self) -> impl Iterator<Item = &str> {
        self.columns
            .iter()
            .map(String::as_str)
            .filter(|column| !column.is_empty())
    }

    /// Position of `column` in the row.
    pub fn position(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    pub fn into_columns(self) -> Vec<String> {
        self.columns
    }
}

/// Trims whitespace and a stray UTF-8 BOM from a cell.
pub(crate) fn normalize_cell(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').trim().to_string()
}
