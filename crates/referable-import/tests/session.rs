//! Upload session flows against a scripted import client.

use std::cell::RefCell;

use referable_import::{
    ImportClient, ImportError, ImportRequest, SessionError, SessionPhase, SessionState,
    UploadSession,
};
use referable_ingest::IngestError;
use referable_map::MappingError;
use referable_model::{ImportSummary, LogicalField};

/// Replays canned responses and records every request it receives.
struct ScriptedClient {
    responses: RefCell<Vec<Result<ImportSummary, ImportError>>>,
    requests: RefCell<Vec<ImportRequest>>,
}

impl ScriptedClient {
    fn new(mut responses: Vec<Result<ImportSummary, ImportError>>) -> Self {
        responses.reverse();
        Self {
            responses: RefCell::new(responses),
            requests: RefCell::new(Vec::new()),
        }
    }

    fn calls(&self) -> usize {
        self.requests.borrow().len()
    }
}

impl ImportClient for ScriptedClient {
    fn submit(&self, request: &ImportRequest) -> Result<ImportSummary, ImportError> {
        self.requests.borrow_mut().push(request.clone());
        self.responses
            .borrow_mut()
            .pop()
            .expect("no scripted response left")
    }
}

const FULL_CSV: &[u8] = b"Client Name,Client Email,Service Date,Status,Phone,Amount\n\
Ann Lee,ann@example.com,2024-03-01,completed,555-0100,120\n";

const PARTIAL_CSV: &[u8] = b"Name,Email,Visit,State,Notes\nAnn,ann@example.com,2024-03-01,done,\n";

fn summary(processed: usize, skipped: usize, errors: &[&str]) -> ImportSummary {
    ImportSummary {
        processed,
        skipped,
        errors: errors.iter().map(|e| (*e).to_string()).collect(),
    }
}

fn mapped_session(content: &[u8]) -> UploadSession {
    let mut session = UploadSession::new();
    session
        .select_file("clients.csv", content.to_vec())
        .expect("select file");
    session.auto_map().expect("auto-map");
    session
}

#[test]
fn submit_sends_raw_file_and_mapping() {
    let mut session = mapped_session(FULL_CSV);
    let client = ScriptedClient::new(vec![Ok(summary(1, 0, &[]))]);

    let result = session.submit(&client).expect("submit");
    assert_eq!(result.processed, 1);
    assert_eq!(session.phase(), SessionPhase::Succeeded);

    let requests = client.requests.borrow();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].file_name, "clients.csv");
    assert_eq!(requests[0].content, FULL_CSV);
    assert_eq!(
        requests[0].mapping.get(LogicalField::AppointmentStatus),
        Some("Status")
    );
    assert_eq!(requests[0].mapping.len(), 6);
}

#[test]
fn closed_gate_never_reaches_the_client() {
    let mut session = mapped_session(PARTIAL_CSV);
    let client = ScriptedClient::new(Vec::new());

    assert!(!session.can_submit());
    let err = session.submit(&client).unwrap_err();
    match err {
        SessionError::MissingRequired(fields) => assert_eq!(
            fields,
            vec![LogicalField::ServiceDate, LogicalField::AppointmentStatus]
        ),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(client.calls(), 0);
    assert_eq!(session.phase(), SessionPhase::Mapped);
}

#[test]
fn manual_edits_open_the_gate() {
    let mut session = mapped_session(PARTIAL_CSV);
    session
        .set_mapping(LogicalField::ServiceDate, Some("Visit"))
        .unwrap();
    session
        .set_mapping(LogicalField::AppointmentStatus, Some("State"))
        .unwrap();
    assert!(session.can_submit());
    assert_eq!(
        session.mapping_state().unwrap().extra_fields(),
        ["Notes".to_string()]
    );

    let client = ScriptedClient::new(vec![Ok(summary(1, 0, &[]))]);
    session.submit(&client).expect("submit");
    assert_eq!(client.calls(), 1);
}

#[test]
fn conflicting_edit_is_rejected_without_changes() {
    let mut session = mapped_session(FULL_CSV);
    let before = session.state().clone();

    let err = session
        .set_mapping(LogicalField::ClientPhone, Some("Client Name"))
        .unwrap_err();
    match err {
        SessionError::Mapping(MappingError::HeaderInUse { header, field }) => {
            assert_eq!(header, "Client Name");
            assert_eq!(field, LogicalField::ClientName);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(session.state(), &before);
}

#[test]
fn rejection_keeps_mapping_for_retry() {
    let mut session = mapped_session(FULL_CSV);
    let client = ScriptedClient::new(vec![
        Err(ImportError::Rejected {
            status: 503,
            message: "Import service unavailable".to_string(),
        }),
        Ok(summary(1, 0, &[])),
    ]);

    let err = session.submit(&client).unwrap_err();
    assert!(matches!(
        err,
        SessionError::Import(ImportError::Rejected { status: 503, .. })
    ));
    match session.state() {
        SessionState::Failed { error, .. } => {
            assert_eq!(error.user_message(), "Import service unavailable");
        }
        other => panic!("unexpected state: {other:?}"),
    }
    assert_eq!(session.mapping().unwrap().len(), 6);

    session.submit(&client).expect("retry");
    assert_eq!(session.phase(), SessionPhase::Succeeded);

    let requests = client.requests.borrow();
    assert_eq!(requests[0], requests[1]);
}

#[test]
fn editing_after_failure_returns_to_mapped() {
    let mut session = mapped_session(FULL_CSV);
    let client = ScriptedClient::new(vec![Err(ImportError::Network("timed out".to_string()))]);
    session.submit(&client).unwrap_err();
    assert_eq!(session.phase(), SessionPhase::Failed);

    session.set_mapping(LogicalField::AmountCharged, None).unwrap();
    assert_eq!(session.phase(), SessionPhase::Mapped);
    assert_eq!(
        session.mapping_state().unwrap().extra_fields(),
        ["Amount".to_string()]
    );
}

#[test]
fn row_errors_are_returned_with_the_summary() {
    let mut session = mapped_session(FULL_CSV);
    let client = ScriptedClient::new(vec![Ok(summary(
        1,
        1,
        &["Row 3: missing email"],
    ))]);

    let result = session.submit(&client).expect("submit");
    assert_eq!(result.total_rows(), 2);
    assert_eq!(result.errors, vec!["Row 3: missing email".to_string()]);
}

#[test]
fn unreadable_file_leaves_session_without_file() {
    let mut session = mapped_session(FULL_CSV);

    let err = session.select_file("empty.csv", Vec::new()).unwrap_err();
    assert!(matches!(err, SessionError::Ingest(IngestError::EmptyCsv { .. })));
    assert_eq!(session.phase(), SessionPhase::NoFile);
    assert!(session.mapping().is_none());
}

#[test]
fn selecting_a_new_file_discards_the_mapping() {
    let mut session = mapped_session(FULL_CSV);
    session
        .select_file("other.csv", PARTIAL_CSV.to_vec())
        .unwrap();
    assert_eq!(session.phase(), SessionPhase::FileSelected);
    assert!(session.mapping().is_none());
    assert_eq!(session.file().unwrap().file_name, "other.csv");
}

#[test]
fn reset_returns_to_no_file() {
    let mut session = mapped_session(FULL_CSV);
    session.reset();
    assert_eq!(session.phase(), SessionPhase::NoFile);
    assert!(session.file().is_none());

    let err = session.auto_map().unwrap_err();
    assert!(matches!(
        err,
        SessionError::InvalidTransition {
            phase: SessionPhase::NoFile,
            ..
        }
    ));
}
