//! Local preview of rows projected through a header mapping.
//!
//! The backend performs the real ingestion; this only shows what the first
//! few rows will look like once mapped.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use referable_model::{HeaderMapping, LogicalField};

use crate::csv::{LineCursor, csv_reader, next_non_blank_row, read_headers_from_bytes};
use crate::error::{IngestError, Result};

/// One data row keyed by logical field.
pub type MappedRecord = BTreeMap<LogicalField, String>;

/// A previewed data row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowPreview {
    /// 1-based line on which the row starts, counting blank lines.
    pub line: u64,
    pub values: MappedRecord,
}

/// Projects up to `limit` data rows of an upload through `mapping`.
///
/// Blank rows are skipped. Cells missing from short rows read as empty
/// strings. Fails with [`IngestError::ColumnNotFound`] when a mapped header is
/// absent from the file.
pub fn preview_rows(
    file: &str,
    bytes: &[u8],
    mapping: &HeaderMapping,
    limit: usize,
) -> Result<Vec<RowPreview>> {
    let headers = read_headers_from_bytes(file, bytes)?;
    let mut positions: Vec<(LogicalField, usize)> = Vec::with_capacity(mapping.len());
    for (field, header) in mapping.iter() {
        let position = headers
            .position(header)
            .ok_or_else(|| IngestError::ColumnNotFound {
                file: file.to_string(),
                column: header.to_string(),
            })?;
        positions.push((field, position));
    }

    let mut reader = csv_reader(bytes);
    let mut records = reader.records();
    let mut lines = LineCursor::new(bytes);
    // The first non-blank row is the header row read above.
    next_non_blank_row(&mut records, &mut lines, file)?;

    let mut rows = Vec::new();
    while rows.len() < limit {
        let Some((line, cells)) = next_non_blank_row(&mut records, &mut lines, file)? else {
            break;
        };
        let values = positions
            .iter()
            .map(|(field, idx)| (*field, cells.get(*idx).cloned().unwrap_or_default()))
            .collect();
        rows.push(RowPreview { line, values });
    }

    debug!(file, rows = rows.len(), limit, "built mapped preview");
    Ok(rows)
}
