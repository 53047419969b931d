//! Upload session state machine.
//!
//! ```text
//! NoFile -> FileSelected -> Mapped -> Submitting -> Succeeded
//!                             ^            |
//!                             +-- Failed <-+
//! ```
//!
//! [`UploadSession::reset`] returns to `NoFile` from any state, and selecting
//! a new file discards whatever mapping came before it.

use std::fmt;

use tracing::{debug, info, warn};

use referable_ingest::{CsvHeaders, read_headers_from_bytes};
use referable_map::MappingState;
use referable_model::{HeaderMapping, ImportSummary, LogicalField};

use crate::client::ImportClient;
use crate::error::{ImportError, Result, SessionError};
use crate::request::ImportRequest;

/// A file the user picked, with its parsed header row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub file_name: String,
    /// Raw bytes, sent to the backend unmodified.
    pub content: Vec<u8>,
    pub headers: CsvHeaders,
}

/// Where an upload currently stands.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionState {
    /// Nothing selected yet.
    #[default]
    NoFile,

    /// Headers parsed, auto-mapping not yet run.
    FileSelected { file: SelectedFile },

    /// Mapping proposed and open for edits.
    Mapped {
        file: SelectedFile,
        mapping: MappingState,
    },

    /// Request handed to the backend.
    Submitting {
        file: SelectedFile,
        mapping: MappingState,
    },

    /// Backend accepted the import; the mapping is gone.
    Succeeded {
        file_name: String,
        summary: ImportSummary,
    },

    /// Backend call failed; the mapping is kept for a retry.
    Failed {
        file: SelectedFile,
        mapping: MappingState,
        error: ImportError,
    },
}

impl SessionState {
    pub fn phase(&self) -> SessionPhase {
        match self {
            Self::NoFile => SessionPhase::NoFile,
            Self::FileSelected { .. } => SessionPhase::FileSelected,
            Self::Mapped { .. } => SessionPhase::Mapped,
            Self::Submitting { .. } => SessionPhase::Submitting,
            Self::Succeeded { .. } => SessionPhase::Succeeded,
            Self::Failed { .. } => SessionPhase::Failed,
        }
    }
}

/// Payload-free view of [`SessionState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionPhase {
    NoFile,
    FileSelected,
    Mapped,
    Submitting,
    Succeeded,
    Failed,
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::NoFile => "without a file",
            Self::FileSelected => "awaiting auto-mapping",
            Self::Mapped => "mapped",
            Self::Submitting => "submitting",
            Self::Succeeded => "finished",
            Self::Failed => "failed",
        })
    }
}

/// Drives one file from selection to import.
#[derive(Debug, Default)]
pub struct UploadSession {
    state: SessionState,
}

impl UploadSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn phase(&self) -> SessionPhase {
        self.state.phase()
    }

    /// The selected file, once headers have been read.
    pub fn file(&self) -> Option<&SelectedFile> {
        match &self.state {
            SessionState::FileSelected { file }
            | SessionState::Mapped { file, .. }
            | SessionState::Submitting { file, .. }
            | SessionState::Failed { file, .. } => Some(file),
            SessionState::NoFile | SessionState::Succeeded { .. } => None,
        }
    }

    /// Parses the header row of `content` and moves to `FileSelected`.
    ///
    /// Any earlier file and mapping are discarded first; on a parse failure
    /// the session is left in `NoFile`.
    pub fn select_file(&mut self, file_name: impl Into<String>, content: Vec<u8>) -> Result<()> {
        if self.phase() == SessionPhase::Submitting {
            return Err(SessionError::InvalidTransition {
                action: "select a file",
                phase: SessionPhase::Submitting,
            });
        }
        let file_name = file_name.into();
        self.state = SessionState::NoFile;

        let headers = read_headers_from_bytes(&file_name, &content).inspect_err(|err| {
            warn!(file = %file_name, error = %err, "could not read CSV headers");
        })?;
        info!(file = %file_name, columns = headers.len(), "file selected");

        self.state = SessionState::FileSelected {
            file: SelectedFile {
                file_name,
                content,
                headers,
            },
        };
        Ok(())
    }

    /// Runs the auto-mapper and moves to `Mapped`.
    ///
    /// From `Mapped` or `Failed` this throws away manual edits and starts
    /// again from the automatic proposal.
    pub fn auto_map(&mut self) -> Result<()> {
        let file = match std::mem::take(&mut self.state) {
            SessionState::FileSelected { file }
            | SessionState::Mapped { file, .. }
            | SessionState::Failed { file, .. } => file,
            other => {
                let phase = other.phase();
                self.state = other;
                return Err(SessionError::InvalidTransition {
                    action: "auto-map",
                    phase,
                });
            }
        };

        let mapping = MappingState::new(file.headers.columns.clone());
        if !mapping.can_submit() {
            debug!(
                file = %file.file_name,
                missing = mapping.missing_required().len(),
                "auto-mapping left required fields open"
            );
        }
        self.state = SessionState::Mapped { file, mapping };
        Ok(())
    }

    /// Current mapping state, while one exists.
    pub fn mapping_state(&self) -> Option<&MappingState> {
        match &self.state {
            SessionState::Mapped { mapping, .. }
            | SessionState::Submitting { mapping, .. }
            | SessionState::Failed { mapping, .. } => Some(mapping),
            _ => None,
        }
    }

    pub fn mapping(&self) -> Option<&HeaderMapping> {
        self.mapping_state().map(MappingState::mapping)
    }

    /// Edits one field's header. A failed session returns to `Mapped`.
    ///
    /// A rejected edit leaves both the mapping and the phase unchanged.
    pub fn set_mapping(&mut self, field: LogicalField, header: Option<&str>) -> Result<()> {
        match &mut self.state {
            SessionState::Mapped { mapping, .. } | SessionState::Failed { mapping, .. } => {
                mapping.set_mapping(field, header)?;
            }
            other => {
                return Err(SessionError::InvalidTransition {
                    action: "edit the mapping",
                    phase: other.phase(),
                });
            }
        }

        if self.phase() == SessionPhase::Failed {
            if let Some((file, mapping)) = self.take_editable() {
                debug!(file = %file.file_name, "mapping edited after failure");
                self.state = SessionState::Mapped { file, mapping };
            }
        }
        Ok(())
    }

    /// True iff a mapping exists and every required field is mapped.
    pub fn can_submit(&self) -> bool {
        matches!(
            &self.state,
            SessionState::Mapped { mapping, .. } | SessionState::Failed { mapping, .. }
                if mapping.can_submit()
        )
    }

    /// Moves to `Submitting` and returns the request to send.
    ///
    /// Refused while required fields are unmapped and while another
    /// submission is in flight; the state is unchanged in both cases.
    pub fn begin_submit(&mut self) -> Result<ImportRequest> {
        match &self.state {
            SessionState::Mapped { file, mapping } | SessionState::Failed { file, mapping, .. } => {
                let missing = mapping.missing_required();
                if !missing.is_empty() {
                    warn!(file = %file.file_name, missing = missing.len(), "submit blocked");
                    return Err(SessionError::MissingRequired(missing));
                }
            }
            SessionState::Submitting { .. } => return Err(SessionError::SubmissionInFlight),
            other => {
                return Err(SessionError::InvalidTransition {
                    action: "submit",
                    phase: other.phase(),
                });
            }
        }

        let Some((file, mapping)) = self.take_editable() else {
            return Err(SessionError::InvalidTransition {
                action: "submit",
                phase: self.phase(),
            });
        };
        let request = ImportRequest::new(
            file.file_name.clone(),
            file.content.clone(),
            mapping.mapping().clone(),
        );
        info!(
            file = %request.file_name,
            mapped = request.mapping.len(),
            "submitting import"
        );
        self.state = SessionState::Submitting { file, mapping };
        Ok(request)
    }

    /// Records the backend's answer to the in-flight submission.
    ///
    /// Success discards the mapping; failure keeps it so the same file can be
    /// resubmitted, and is returned as [`SessionError::Import`].
    pub fn complete_submit(
        &mut self,
        outcome: std::result::Result<ImportSummary, ImportError>,
    ) -> Result<ImportSummary> {
        let (file, mapping) = match std::mem::take(&mut self.state) {
            SessionState::Submitting { file, mapping } => (file, mapping),
            other => {
                let phase = other.phase();
                self.state = other;
                return Err(SessionError::InvalidTransition {
                    action: "complete a submission",
                    phase,
                });
            }
        };

        match outcome {
            Ok(summary) => {
                info!(
                    file = %file.file_name,
                    processed = summary.processed,
                    skipped = summary.skipped,
                    errors = summary.errors.len(),
                    "import finished"
                );
                self.state = SessionState::Succeeded {
                    file_name: file.file_name,
                    summary: summary.clone(),
                };
                Ok(summary)
            }
            Err(error) => {
                warn!(file = %file.file_name, error = %error, "import failed");
                self.state = SessionState::Failed {
                    file,
                    mapping,
                    error: error.clone(),
                };
                Err(SessionError::Import(error))
            }
        }
    }

    /// Sends the current mapping through `client` and records the outcome.
    pub fn submit<C: ImportClient + ?Sized>(&mut self, client: &C) -> Result<ImportSummary> {
        let request = self.begin_submit()?;
        let outcome = client.submit(&request);
        self.complete_submit(outcome)
    }

    /// Drops everything and returns to `NoFile`.
    pub fn reset(&mut self) {
        if self.state != SessionState::NoFile {
            debug!(phase = %self.phase(), "session reset");
        }
        self.state = SessionState::NoFile;
    }

    /// Moves the file and mapping out of a `Mapped` or `Failed` state,
    /// leaving `NoFile` behind. Other states are left untouched.
    fn take_editable(&mut self) -> Option<(SelectedFile, MappingState)> {
        match std::mem::take(&mut self.state) {
            SessionState::Mapped { file, mapping } | SessionState::Failed { file, mapping, .. } => {
                Some((file, mapping))
            }
            other => {
                self.state = other;
                None
            }
        }
    }
}
