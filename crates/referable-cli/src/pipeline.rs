//! File-to-session steps shared by the `map` and `import` commands.

use std::path::Path;

use anyhow::{Context, Result, anyhow};
use tracing::debug;

use referable_import::{SelectedFile, SessionError, UploadSession};
use referable_ingest::read_csv_bytes;
use referable_map::MappingState;
use referable_model::{ImportSummary, LogicalField};

use crate::edits::{MappingEdit, ordered_edits};

/// A session that has read, auto-mapped and edited one file.
pub struct PreparedSession {
    pub file_name: String,
    pub session: UploadSession,
}

impl PreparedSession {
    pub fn mapping_state(&self) -> Result<&MappingState> {
        self.session
            .mapping_state()
            .ok_or_else(|| anyhow!("session has no mapping ({})", self.session.phase()))
    }

    pub fn file(&self) -> Result<&SelectedFile> {
        self.session
            .file()
            .ok_or_else(|| anyhow!("session has no file ({})", self.session.phase()))
    }

    /// Fails with [`SessionError::MissingRequired`] while the gate is closed.
    pub fn ensure_ready(&self) -> Result<(), SessionError> {
        let missing = self
            .session
            .mapping_state()
            .map(MappingState::missing_required)
            .unwrap_or_else(|| LogicalField::REQUIRED.to_vec());
        if missing.is_empty() {
            Ok(())
        } else {
            Err(SessionError::MissingRequired(missing))
        }
    }
}

/// Reads `csv`, auto-maps it and applies `clears` then `maps`.
pub fn prepare_session(
    csv: &Path,
    clears: &[LogicalField],
    maps: &[MappingEdit],
) -> Result<PreparedSession> {
    let file_name = csv
        .file_name()
        .map_or_else(|| csv.display().to_string(), |name| name.to_string_lossy().into_owned());
    let content = read_csv_bytes(csv).with_context(|| format!("read {}", csv.display()))?;

    let mut session = UploadSession::new();
    session
        .select_file(file_name.clone(), content)
        .with_context(|| format!("read headers of {}", csv.display()))?;
    session.auto_map()?;
    for edit in ordered_edits(clears, maps) {
        session
            .set_mapping(edit.field, edit.header.as_deref())
            .with_context(|| format!("apply mapping edit `{edit}`"))?;
    }
    debug!(file = %file_name, ready = session.can_submit(), "prepared session");
    Ok(PreparedSession { file_name, session })
}

/// `map` exits non-zero until the mapping can be imported.
pub fn map_exit_code(ready: bool) -> i32 {
    if ready { 0 } else { 1 }
}

/// `import` exits non-zero when the backend reported row errors. Dry runs
/// (`None`) succeed.
pub fn import_exit_code(summary: Option<&ImportSummary>) -> i32 {
    match summary {
        Some(summary) if summary.has_errors() => 1,
        _ => 0,
    }
}
