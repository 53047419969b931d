//! CSV reading utilities.

mod header;
mod reader;

pub use header::CsvHeaders;
pub use reader::{
    MAX_CSV_FILE_SIZE, check_file_size, check_file_size_with_limit, read_csv_bytes, read_csv_headers,
    read_headers_from_bytes, read_headers_from_reader, validate_encoding,
};
pub(crate) use reader::{LineCursor, csv_reader, next_non_blank_row};
