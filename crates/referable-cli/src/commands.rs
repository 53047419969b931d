use std::path::Path;

use anyhow::{Context, Result, anyhow};
use comfy_table::Table;
use serde::Serialize;
use tracing::{info, info_span};

use referable_cli::config::{ClientSettings, load_settings, save_to, settings_path};
use referable_cli::pipeline::{PreparedSession, prepare_session};
use referable_import::HttpImportClient;
use referable_ingest::{RowPreview, preview_rows};
use referable_map::{MappingState, MappingSummary, synonyms};
use referable_model::{HeaderMapping, ImportSummary, LogicalField};

use crate::cli::{ConfigArgs, ImportArgs, MapArgs, MappingArgs};
use crate::summary::{apply_table_style, print_import_summary, print_mapping, print_preview};

pub fn run_fields() {
    let mut table = Table::new();
    table.set_header(vec!["Field", "Label", "Required", "Synonyms"]);
    apply_table_style(&mut table);
    for field in LogicalField::REQUIRED
        .into_iter()
        .chain(LogicalField::OPTIONAL)
    {
        table.add_row(vec![
            field.name().to_string(),
            field.label().to_string(),
            (if field.is_required() { "yes" } else { "no" }).to_string(),
            synonyms(field).join(", "),
        ]);
    }
    println!("{table}");
}

/// Auto-maps the file, applies edits and prints the result.
///
/// Returns whether the mapping is ready to import.
pub fn run_map(args: &MapArgs) -> Result<bool> {
    let prepared = prepare(&args.mapping)?;
    let state = prepared.mapping_state()?;

    let preview = match args.preview {
        Some(limit) => {
            let file = prepared.file()?;
            Some(
                preview_rows(&file.file_name, &file.content, state.mapping(), limit)
                    .context("preview rows")?,
            )
        }
        None => None,
    };

    if args.json {
        let report = MapReport::new(&prepared.file_name, state, preview.as_deref());
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("serialize mapping report")?
        );
    } else {
        print_mapping(&prepared.file_name, state);
        if let Some(rows) = &preview {
            let fields: Vec<LogicalField> = state.mapping().iter().map(|(f, _)| f).collect();
            print_preview(rows, &fields);
        }
    }
    Ok(state.can_submit())
}

/// Maps and submits the file. Returns `None` for a dry run.
pub fn run_import(args: &ImportArgs) -> Result<Option<ImportSummary>> {
    let mut prepared = prepare(&args.mapping)?;
    let span = info_span!("import", file = %prepared.file_name);
    let _guard = span.enter();

    // Checked before settings so a closed gate is reported as such.
    if let Err(err) = prepared.ensure_ready() {
        print_mapping(&prepared.file_name, prepared.mapping_state()?);
        return Err(err.into());
    }

    if args.dry_run {
        let request = prepared.session.begin_submit()?;
        println!("File: {} ({} bytes)", request.file_name, request.content.len());
        println!("Mapping: {}", request.mapping_json()?);
        info!("dry run, nothing sent");
        return Ok(None);
    }

    let settings = load_settings(args.connection.config.as_deref())?.with_overrides(
        args.connection.endpoint.clone(),
        args.connection.token.clone(),
    );
    let client = HttpImportClient::new(settings.client_config()?)?;
    info!(endpoint = client.endpoint(), "sending import");

    let summary = prepared
        .session
        .submit(&client)
        .context("import failed")?;
    print_import_summary(&prepared.file_name, &summary);
    Ok(Some(summary))
}

pub fn run_config(args: &ConfigArgs) -> Result<()> {
    let path = match &args.connection.config {
        Some(path) => Some(path.clone()),
        None => settings_path(),
    };
    let stored = match &args.connection.config {
        // A new file is about to be written there.
        Some(path) if !path.exists() => ClientSettings::default(),
        explicit => load_settings(explicit.as_deref())?,
    };
    let mut settings = stored.with_overrides(
        args.connection.endpoint.clone(),
        args.connection.token.clone(),
    );
    if let Some(timeout) = args.timeout_secs {
        settings.timeout_secs = timeout;
    }

    if args.save {
        let path = path
            .as_deref()
            .ok_or_else(|| anyhow!("could not determine settings path; pass --config"))?;
        save_to(&settings, path)?;
        println!("Saved {}", path.display());
    }
    print_settings(path.as_deref(), &settings);
    Ok(())
}

fn print_settings(path: Option<&Path>, settings: &ClientSettings) {
    let mut table = Table::new();
    table.set_header(vec!["Setting", "Value"]);
    apply_table_style(&mut table);
    let unset = || "(not set)".to_string();
    table.add_row(vec![
        "file".to_string(),
        path.map_or_else(unset, |p| p.display().to_string()),
    ]);
    table.add_row(vec![
        "endpoint".to_string(),
        settings.endpoint.clone().unwrap_or_else(unset),
    ]);
    table.add_row(vec![
        "api_token".to_string(),
        settings.masked_token().unwrap_or_else(unset),
    ]);
    table.add_row(vec![
        "timeout_secs".to_string(),
        settings.timeout_secs.to_string(),
    ]);
    println!("{table}");
}

fn prepare(args: &MappingArgs) -> Result<PreparedSession> {
    prepare_session(&args.csv, &args.clear, &args.map)
}

/// Machine-readable output of `referable map --json`.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MapReport<'a> {
    file: &'a str,
    mapping: &'a HeaderMapping,
    extra_fields: &'a [String],
    can_submit: bool,
    missing_required: Vec<LogicalField>,
    summary: MappingSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    preview: Option<&'a [RowPreview]>,
}

impl<'a> MapReport<'a> {
    fn new(file: &'a str, state: &'a MappingState, preview: Option<&'a [RowPreview]>) -> Self {
        Self {
            file,
            mapping: state.mapping(),
            extra_fields: state.extra_fields(),
            can_submit: state.can_submit(),
            missing_required: state.missing_required(),
            summary: state.summary(),
            preview,
        }
    }
}
