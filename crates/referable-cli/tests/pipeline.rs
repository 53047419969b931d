//! Integration tests for the map and import pipeline.

use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::thread;

use tempfile::TempDir;

use referable_cli::edits::MappingEdit;
use referable_cli::pipeline::{import_exit_code, map_exit_code, prepare_session};
use referable_import::{SessionError, SessionPhase};
use referable_model::{ImportSummary, LogicalField};

const FULL_CSV: &str = "Name,Email,Date,Status,Phone,Mobile\n\
Ann,ann@example.com,2024-03-01,completed,555-0100,555-0199\n";

const PARTIAL_CSV: &str = "Name,Email,Visit,Notes\nAnn,ann@example.com,2024-03-01,vip\n";

fn write_csv(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

fn edits(raw: &[&str]) -> Vec<MappingEdit> {
    raw.iter().map(|edit| edit.parse().unwrap()).collect()
}

/// Runs the `referable` binary with an isolated config directory.
fn referable(dir: &TempDir, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_referable"))
        .args(args)
        .env("HOME", dir.path())
        .env("XDG_CONFIG_HOME", dir.path().join("config"))
        .env_remove("REFERABLE_ENDPOINT")
        .env_remove("REFERABLE_API_TOKEN")
        .env_remove("RUST_LOG")
        .env_remove("HTTP_PROXY")
        .env_remove("http_proxy")
        .env_remove("ALL_PROXY")
        .env_remove("all_proxy")
        .output()
        .expect("run referable")
}

fn arg(path: &Path) -> &str {
    path.to_str().unwrap()
}

#[test]
fn test_prepare_session_auto_maps_and_opens_gate() {
    let dir = TempDir::new().unwrap();
    let csv = write_csv(&dir, "clients.csv", FULL_CSV);

    let prepared = prepare_session(&csv, &[], &[]).unwrap();
    let state = prepared.mapping_state().unwrap();

    assert_eq!(prepared.file_name, "clients.csv");
    assert_eq!(prepared.session.phase(), SessionPhase::Mapped);
    assert_eq!(state.mapped_header(LogicalField::ClientPhone), Some("Phone"));
    assert_eq!(state.extra_fields(), ["Mobile"]);
    assert!(prepared.ensure_ready().is_ok());
}

#[test]
fn test_clear_applies_before_map_for_the_same_field() {
    let dir = TempDir::new().unwrap();
    let csv = write_csv(&dir, "clients.csv", FULL_CSV);

    let prepared = prepare_session(
        &csv,
        &[LogicalField::ClientPhone],
        &edits(&["clientPhone=Mobile"]),
    )
    .unwrap();
    let state = prepared.mapping_state().unwrap();

    assert_eq!(state.mapped_header(LogicalField::ClientPhone), Some("Mobile"));
    assert_eq!(state.extra_fields(), ["Phone"]);
}

#[test]
fn test_conflicting_edit_is_reported() {
    let dir = TempDir::new().unwrap();
    let csv = write_csv(&dir, "clients.csv", FULL_CSV);

    let err = prepare_session(&csv, &[], &edits(&["clientName=Email"]))
        .err()
        .expect("header already used by clientEmail");

    assert!(format!("{err:#}").contains("apply mapping edit"), "{err:#}");
}

#[test]
fn test_closed_gate_names_missing_fields() {
    let dir = TempDir::new().unwrap();
    let csv = write_csv(&dir, "partial.csv", PARTIAL_CSV);

    let prepared = prepare_session(&csv, &[], &[]).unwrap();

    match prepared.ensure_ready() {
        Err(SessionError::MissingRequired(missing)) => {
            assert_eq!(
                missing,
                vec![LogicalField::ServiceDate, LogicalField::AppointmentStatus]
            );
        }
        other => panic!("unexpected gate result: {other:?}"),
    }
}

#[test]
fn test_exit_codes() {
    assert_eq!(map_exit_code(true), 0);
    assert_eq!(map_exit_code(false), 1);
    assert_eq!(import_exit_code(None), 0);
    assert_eq!(import_exit_code(Some(&ImportSummary::default())), 0);
    let with_errors = ImportSummary {
        processed: 1,
        skipped: 1,
        errors: vec!["Row 3: invalid date".to_string()],
    };
    assert_eq!(import_exit_code(Some(&with_errors)), 1);
}

#[test]
fn test_map_command_exit_code_follows_gate() {
    let dir = TempDir::new().unwrap();
    let full = write_csv(&dir, "clients.csv", FULL_CSV);
    let partial = write_csv(&dir, "partial.csv", PARTIAL_CSV);

    let ready = referable(&dir, &["map", arg(&full)]);
    assert_eq!(ready.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&ready.stdout).contains("Ready to import."));

    let blocked = referable(&dir, &["map", arg(&partial)]);
    assert_eq!(blocked.status.code(), Some(1));

    let fixed = referable(
        &dir,
        &[
            "map",
            arg(&partial),
            "--map",
            "serviceDate=Visit",
            "--map",
            "appointmentStatus=Notes",
            "--json",
        ],
    );
    assert_eq!(fixed.status.code(), Some(0));
    let report: serde_json::Value = serde_json::from_slice(&fixed.stdout).unwrap();
    assert_eq!(report["canSubmit"], true);
    assert_eq!(report["mapping"]["serviceDate"], "Visit");
}

#[test]
fn test_import_with_closed_gate_reports_missing_fields_before_settings() {
    let dir = TempDir::new().unwrap();
    let partial = write_csv(&dir, "partial.csv", PARTIAL_CSV);

    let output = referable(&dir, &["import", arg(&partial)]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("required fields not mapped: serviceDate, appointmentStatus"),
        "{stderr}"
    );
    assert!(!stderr.contains("endpoint"), "{stderr}");
}

#[test]
fn test_import_dry_run_prints_request() {
    let dir = TempDir::new().unwrap();
    let full = write_csv(&dir, "clients.csv", FULL_CSV);

    let output = referable(&dir, &["import", arg(&full), "--dry-run"]);

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("File: clients.csv"), "{stdout}");
    assert!(stdout.contains(r#""clientPhone":"Phone""#), "{stdout}");
}

#[test]
fn test_import_with_row_errors_exits_non_zero() {
    let dir = TempDir::new().unwrap();
    let full = write_csv(&dir, "clients.csv", FULL_CSV);

    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let endpoint = format!("http://{}/import", listener.local_addr().unwrap());
    let server = thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        let mut reader = BufReader::new(stream);
        let mut length = 0;
        loop {
            let mut line = String::new();
            reader.read_line(&mut line).unwrap();
            let line = line.trim_end().to_ascii_lowercase();
            if line.is_empty() {
                break;
            }
            if let Some(value) = line.strip_prefix("content-length:") {
                length = value.trim().parse().unwrap();
            }
        }
        let mut body = vec![0; length];
        reader.read_exact(&mut body).unwrap();

        let payload = r#"{"processed":1,"skipped":1,"errors":["Row 3: invalid date"]}"#;
        let mut stream = reader.into_inner();
        write!(
            stream,
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\
             Connection: close\r\n\r\n{payload}",
            payload.len()
        )
        .unwrap();
        String::from_utf8_lossy(&body).into_owned()
    });

    let output = referable(&dir, &["import", arg(&full), "--endpoint", &endpoint]);
    let body = server.join().unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Imported: clients.csv"), "{stdout}");
    assert!(stdout.contains("Row 3: invalid date"), "{stdout}");
    assert!(body.contains(r#""clientName":"Name""#), "{body}");
}
