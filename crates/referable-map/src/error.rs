//! Error types for mapping edits.

use thiserror::Error;

use referable_model::{LogicalField, ModelError};

/// Errors from manual mapping edits.
///
/// Every variant leaves the mapping state untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum MappingError {
    /// Header already mapped to another field.
    #[error("Header '{header}' already mapped to '{field}'")]
    HeaderInUse {
        /// The header that was requested.
        header: String,
        /// The field currently holding it.
        field: LogicalField,
    },

    /// Header does not appear in the uploaded file.
    #[error("Header not found: {0}")]
    UnknownHeader(String),

    /// Blank header offered for a field.
    #[error("Cannot map '{0}' to a blank header")]
    BlankHeader(LogicalField),

    /// Any other model-level rejection.
    #[error(transparent)]
    Model(ModelError),
}

impl MappingError {
    /// The field holding the conflicting header, if any.
    pub fn field(&self) -> Option<LogicalField> {
        match self {
            Self::HeaderInUse { field, .. } | Self::BlankHeader(field) => Some(*field),
            Self::UnknownHeader(_) | Self::Model(_) => None,
        }
    }

    /// The header associated with this error, if any.
    pub fn header(&self) -> Option<&str> {
        match self {
            Self::HeaderInUse { header, .. } | Self::UnknownHeader(header) => Some(header.as_str()),
            Self::BlankHeader(_) | Self::Model(_) => None,
        }
    }
}

impl From<ModelError> for MappingError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::HeaderInUse { header, field } => Self::HeaderInUse { header, field },
            ModelError::EmptyHeader(field) => Self::BlankHeader(field),
            other => Self::Model(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, MappingError>;
