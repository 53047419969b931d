//! Header-row reading for uploaded CSV files.

use std::collections::BTreeSet;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecordsIter};
use tracing::{debug, warn};

use crate::error::{IngestError, Result};

use super::header::{CsvHeaders, normalize_cell};

/// Maximum accepted upload size (50 MB).
pub const MAX_CSV_FILE_SIZE: u64 = 50 * 1024 * 1024;

/// Check file size before loading.
pub fn check_file_size(path: &Path) -> Result<()> {
    check_file_size_with_limit(path, MAX_CSV_FILE_SIZE)
}

/// Check file size against a custom limit.
pub fn check_file_size_with_limit(path: &Path, max_size: u64) -> Result<()> {
    let metadata = std::fs::metadata(path).map_err(|e| io_error(path, e))?;
    if metadata.len() > max_size {
        return Err(IngestError::FileTooLarge {
            file: path.display().to_string(),
            size: metadata.len(),
            max_size,
        });
    }
    Ok(())
}

/// Rejects UTF-16 content, detected by its byte-order mark.
///
/// A UTF-8 BOM is accepted and stripped from the first header cell.
pub fn validate_encoding(file: &str, bytes: &[u8]) -> Result<()> {
    let encoding = match bytes {
        [0xFF, 0xFE, ..] => "UTF-16 LE",
        [0xFE, 0xFF, ..] => "UTF-16 BE",
        _ => return Ok(()),
    };
    Err(IngestError::UnsupportedEncoding {
        file: file.to_string(),
        encoding,
    })
}

/// Reads the whole file after the size check.
pub fn read_csv_bytes(path: &Path) -> Result<Vec<u8>> {
    check_file_size(path)?;
    std::fs::read(path).map_err(|e| io_error(path, e))
}

/// Reads the header row of the CSV file at `path`.
pub fn read_csv_headers(path: &Path) -> Result<CsvHeaders> {
    let bytes = read_csv_bytes(path)?;
    read_headers_from_bytes(&path.display().to_string(), &bytes)
}

/// Reads the header row of an in-memory upload named `file`.
pub fn read_headers_from_bytes(file: &str, bytes: &[u8]) -> Result<CsvHeaders> {
    let size = bytes.len() as u64;
    if size > MAX_CSV_FILE_SIZE {
        return Err(IngestError::FileTooLarge {
            file: file.to_string(),
            size,
            max_size: MAX_CSV_FILE_SIZE,
        });
    }
    validate_encoding(file, bytes)?;

    let mut reader = csv_reader(bytes);
    let mut records = reader.records();
    let mut lines = LineCursor::new(bytes);
    let Some((line, columns)) = next_non_blank_row(&mut records, &mut lines, file)? else {
        warn!(file, "CSV has no header row");
        return Err(IngestError::EmptyCsv {
            file: file.to_string(),
        });
    };

    let mut seen = BTreeSet::new();
    for column in columns.iter().filter(|column| !column.is_empty()) {
        if !seen.insert(column.as_str()) {
            return Err(IngestError::DuplicateHeader {
                file: file.to_string(),
                header: column.clone(),
            });
        }
    }

    debug!(file, line, columns = columns.len(), "read CSV header row");
    Ok(CsvHeaders::new(columns, line))
}

/// Reads the first non-blank row of `reader` as the header row.
///
/// The stream is buffered in full, then checked like an in-memory upload.
/// Fails on an empty file, malformed CSV or a repeated non-blank header.
pub fn read_headers_from_reader<R: Read>(file: &str, mut reader: R) -> Result<CsvHeaders> {
    let mut bytes = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .map_err(|source| IngestError::FileRead {
            file: file.to_string(),
            source,
        })?;
    read_headers_from_bytes(file, &bytes)
}

pub(crate) fn csv_reader(bytes: &[u8]) -> csv::Reader<&[u8]> {
    ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes)
}

/// Advances to the next row with at least one non-blank cell, returning its
/// 1-based line number and normalized cells.
pub(crate) fn next_non_blank_row(
    records: &mut StringRecordsIter<'_, &[u8]>,
    lines: &mut LineCursor<'_>,
    file: &str,
) -> Result<Option<(u64, Vec<String>)>> {
    for record in records.by_ref() {
        let record = record.map_err(|e| IngestError::from_csv(file, e))?;
        let row: Vec<String> = record.iter().map(normalize_cell).collect();
        if row.iter().all(String::is_empty) {
            continue;
        }
        let line = record.position().map_or(0, |position| lines.line_at(position.byte()));
        return Ok(Some((line, row)));
    }
    Ok(None)
}

/// Maps record byte offsets to physical line numbers.
///
/// The reader skips empty lines silently and stamps a record with the
/// offset before them, so those line breaks are counted here. Offsets must
/// be queried in increasing order.
pub(crate) struct LineCursor<'a> {
    bytes: &'a [u8],
    offset: usize,
    line: u64,
}

impl<'a> LineCursor<'a> {
    pub(crate) fn new(bytes: &'a [u8]) -> Self {
        Self {
            bytes,
            offset: 0,
            line: 1,
        }
    }

    pub(crate) fn line_at(&mut self, byte: u64) -> u64 {
        let target = usize::try_from(byte).map_or(self.bytes.len(), |b| b.min(self.bytes.len()));
        if target > self.offset {
            self.line += count_newlines(&self.bytes[self.offset..target]);
            self.offset = target;
        }
        let empty_lines = self.bytes[self.offset..]
            .iter()
            .position(|b| !matches!(*b, b'\r' | b'\n'))
            .unwrap_or(self.bytes.len() - self.offset);
        self.line + count_newlines(&self.bytes[self.offset..self.offset + empty_lines])
    }
}

fn count_newlines(bytes: &[u8]) -> u64 {
    bytes.iter().filter(|b| **b == b'\n').count() as u64
}

fn io_error(path: &Path, err: std::io::Error) -> IngestError {
    if err.kind() == std::io::ErrorKind::NotFound {
        IngestError::FileNotFound {
            file: path.display().to_string(),
        }
    } else {
        IngestError::FileRead {
            file: path.display().to_string(),
            source: err,
        }
    }
}
