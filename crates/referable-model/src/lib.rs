//! Data model for the Referable client-history import.
//!
//! Shared by the mapping engine, the CSV reader and the upload client.

pub mod error;
pub mod field;
pub mod import;
pub mod mapping;

pub use error::{ModelError, Result};
pub use field::LogicalField;
pub use import::ImportSummary;
pub use mapping::HeaderMapping;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_deserializes_with_missing_errors() {
        let summary: ImportSummary =
            serde_json::from_str(r#"{"processed":12,"skipped":3}"#).expect("deserialize summary");
        assert_eq!(summary.processed, 12);
        assert_eq!(summary.skipped, 3);
        assert_eq!(summary.total_rows(), 15);
        assert!(!summary.has_errors());
    }

    #[test]
    fn summary_keeps_row_errors_in_order() {
        let json = r#"{"processed":1,"skipped":2,"errors":["Row 3: missing email","Row 7: bad date"]}"#;
        let summary: ImportSummary = serde_json::from_str(json).expect("deserialize summary");
        assert!(summary.has_errors());
        assert_eq!(summary.errors[1], "Row 7: bad date");
    }
}
