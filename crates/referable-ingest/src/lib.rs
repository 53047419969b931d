//! CSV ingestion for client-history imports.
//!
//! Reads the header row the mapper works on and previews data rows through
//! a [`HeaderMapping`](referable_model::HeaderMapping). Row-level import
//! itself happens on the backend.
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use referable_ingest::{read_csv_bytes, read_headers_from_bytes, preview_rows};
//!
//! let bytes = read_csv_bytes(Path::new("jobs.csv"))?;
//! let headers = read_headers_from_bytes("jobs.csv", &bytes)?;
//! let preview = preview_rows("jobs.csv", &bytes, &mapping, 5)?;
//! ```

mod csv;
mod error;
mod preview;

// === Error Types ===
pub use error::{IngestError, Result};

// === CSV Reading ===
pub use csv::{
    CsvHeaders, MAX_CSV_FILE_SIZE, check_file_size, check_file_size_with_limit, read_csv_bytes,
    read_csv_headers, read_headers_from_bytes, read_headers_from_reader, validate_encoding,
};

// === Mapped Preview ===
pub use preview::{MappedRecord, RowPreview, preview_rows};
