//! Upload session and backend import client.
//!
//! [`UploadSession`] walks one file from selection through auto-mapping and
//! manual edits to submission. Submission goes through an [`ImportClient`];
//! [`HttpImportClient`] posts the raw file and the JSON mapping to the
//! backend as `multipart/form-data`.

mod client;
mod error;
mod request;
mod session;

pub use client::{ClientConfig, DEFAULT_TIMEOUT, HttpImportClient, ImportClient};
pub use error::{ImportError, Result, SessionError};
pub use request::{CSV_MIME, FILE_PART, ImportRequest, MAPPING_PART};
pub use session::{SelectedFile, SessionPhase, SessionState, UploadSession};
