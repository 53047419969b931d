use thiserror::Error;

use crate::field::LogicalField;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ModelError {
    #[error("unknown field: {0}")]
    UnknownField(String),

    #[error("header '{header}' is already mapped to {field}")]
    HeaderInUse { header: String, field: LogicalField },

    #[error("cannot map {0} to an empty header")]
    EmptyHeader(LogicalField),
}

pub type Result<T> = std::result::Result<T, ModelError>;
