//! Error types for CSV ingestion.

use thiserror::Error;

/// Errors that can occur while reading an uploaded CSV file.
///
/// `file` is the path or upload name the error refers to.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// CSV file not found.
    #[error("CSV file not found: {file}")]
    FileNotFound { file: String },

    /// Failed to read file.
    #[error("failed to read file {file}: {source}")]
    FileRead {
        file: String,
        #[source]
        source: std::io::Error,
    },

    /// File exceeds the upload size limit.
    #[error("file {file} is too large ({size} bytes, limit {max_size} bytes)")]
    FileTooLarge { file: String, size: u64, max_size: u64 },

    /// File uses an encoding other than UTF-8.
    #[error("unsupported encoding {encoding} in {file}; save the file as UTF-8")]
    UnsupportedEncoding { file: String, encoding: &'static str },

    // === CSV Parsing Errors ===
    /// Malformed CSV content.
    #[error("failed to parse CSV {file}: {message}")]
    CsvParse { file: String, message: String },

    /// CSV file is empty or has only blank rows.
    #[error("CSV file is empty: {file}")]
    EmptyCsv { file: String },

    /// A mapped column is missing from the header row.
    #[error("column '{column}' not found in {file}")]
    ColumnNotFound { file: String, column: String },

    /// The same header appears twice.
    #[error("duplicate column '{header}' in {file}")]
    DuplicateHeader { file: String, header: String },
}

impl IngestError {
    /// Wraps a `csv` crate error, folding I/O failures into [`IngestError::FileRead`].
    pub(crate) fn from_csv(file: &str, err: csv::Error) -> Self {
        let message = err.to_string();
        match err.into_kind() {
            csv::ErrorKind::Io(source) => Self::FileRead {
                file: file.to_string(),
                source,
            },
            _ => Self::CsvParse {
                file: file.to_string(),
                message,
            },
        }
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
