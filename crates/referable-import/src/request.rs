//! Import request payload.

use referable_model::HeaderMapping;

use crate::error::ImportError;

/// Multipart form part carrying the raw file.
pub const FILE_PART: &str = "file";
/// Multipart form part carrying the JSON-encoded mapping.
pub const MAPPING_PART: &str = "mapping";
/// Content type sent for the file part.
pub const CSV_MIME: &str = "text/csv";

/// Everything the backend needs to import one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRequest {
    /// Original file name, sent as the file part's name.
    pub file_name: String,
    /// Raw file bytes, unmodified.
    pub content: Vec<u8>,
    pub mapping: HeaderMapping,
}

impl ImportRequest {
    pub fn new(file_name: impl Into<String>, content: Vec<u8>, mapping: HeaderMapping) -> Self {
        Self {
            file_name: file_name.into(),
            content,
            mapping,
        }
    }

    /// Body of the `mapping` part.
    pub fn mapping_json(&self) -> Result<String, ImportError> {
        self.mapping
            .to_json()
            .map_err(|e| ImportError::Encode(e.to_string()))
    }
}
