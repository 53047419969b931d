//! Error types for import submission and the upload session.

use std::fmt;

use thiserror::Error;

use referable_ingest::IngestError;
use referable_map::MappingError;
use referable_model::LogicalField;

use crate::session::SessionPhase;

/// Errors from submitting an import to the backend.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ImportError {
    /// The configured endpoint is not a usable URL.
    #[error("invalid import endpoint: {0}")]
    InvalidEndpoint(String),

    /// Network request failed before a response arrived.
    #[error("network error: {0}")]
    Network(String),

    /// The backend answered with a non-success status.
    #[error("import rejected ({status}): {message}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Message taken from the response body.
        message: String,
    },

    /// The backend answered 2xx but the body was not an import summary.
    #[error("invalid import response: {0}")]
    InvalidResponse(String),

    /// The request could not be encoded.
    #[error("failed to encode import request: {0}")]
    Encode(String),
}

impl ImportError {
    /// Returns a short message suitable for a one-shot notification.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Rejected { message, .. } => message.clone(),
            Self::Network(_) => {
                "Could not reach the import service. Check your connection and try again."
                    .to_string()
            }
            Self::InvalidEndpoint(_) => "The import service address is not configured correctly."
                .to_string(),
            Self::InvalidResponse(_) | Self::Encode(_) => {
                "An unexpected error occurred while importing.".to_string()
            }
        }
    }

    /// Whether resubmitting the same request could succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) => true,
            Self::Rejected { status, .. } => *status >= 500 || *status == 429,
            Self::InvalidEndpoint(_) | Self::InvalidResponse(_) | Self::Encode(_) => false,
        }
    }
}

/// Errors from driving an [`UploadSession`](crate::UploadSession).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    /// The selected file could not be parsed.
    #[error(transparent)]
    Ingest(#[from] IngestError),

    /// A mapping edit was rejected.
    #[error(transparent)]
    Mapping(#[from] MappingError),

    /// The backend import failed.
    #[error(transparent)]
    Import(#[from] ImportError),

    /// Submit attempted with required fields unmapped.
    #[error("required fields not mapped: {}", FieldList(.0))]
    MissingRequired(Vec<LogicalField>),

    /// A submission is already in flight.
    #[error("an import is already being submitted")]
    SubmissionInFlight,

    /// The action is not allowed in the current phase.
    #[error("cannot {action} while session is {phase}")]
    InvalidTransition {
        action: &'static str,
        phase: SessionPhase,
    },
}

pub type Result<T> = std::result::Result<T, SessionError>;

struct FieldList<'a>(&'a [LogicalField]);

impl fmt::Display for FieldList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, field) in self.0.iter().enumerate() {
            if idx > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{field}")?;
        }
        Ok(())
    }
}
