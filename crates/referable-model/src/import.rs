use serde::{Deserialize, Serialize};

/// Backend response to an import submission.
///
/// Row-level errors are opaque strings; they are rendered as received.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
    #[serde(default)]
    pub processed: usize,
    #[serde(default)]
    pub skipped: usize,
    #[serde(default)]
    pub errors: Vec<String>,
}

impl ImportSummary {
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Rows the backend looked at, processed or skipped.
    #[must_use]
    pub fn total_rows(&self) -> usize {
        self.processed + self.skipped
    }
}
