//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use tracing::level_filters::LevelFilter;

use referable_cli::edits::{MappingEdit, parse_field};
use referable_cli::logging::LogFormat;
use referable_model::LogicalField;

#[derive(Parser)]
#[command(
    name = "referable",
    version,
    about = "Map and import client-history CSV files into Referable",
    long_about = "Map the columns of a client-history CSV export onto Referable's fields \
                  and import it.\n\n\
                  Headers are matched against known synonyms; anything missed can be \
                  fixed with --map FIELD=HEADER before importing."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// List the fields a file can be mapped onto, with their synonyms.
    Fields,

    /// Auto-map a CSV file's headers and show the result.
    Map(MapArgs),

    /// Map a CSV file and submit it for import.
    Import(ImportArgs),

    /// Show or update the stored connection settings.
    Config(ConfigArgs),
}

/// Mapping inputs shared by `map` and `import`.
#[derive(Args)]
pub struct MappingArgs {
    /// CSV file with a header row.
    #[arg(value_name = "CSV")]
    pub csv: PathBuf,

    /// Map a field to a header, overriding the automatic choice.
    ///
    /// Repeatable; applied in order. `FIELD=` with no header clears the field.
    #[arg(long = "map", value_name = "FIELD=HEADER")]
    pub map: Vec<MappingEdit>,

    /// Leave a field unmapped. Applied before any --map.
    #[arg(long = "clear", value_name = "FIELD", value_parser = parse_field)]
    pub clear: Vec<LogicalField>,
}

#[derive(Parser)]
pub struct MapArgs {
    #[command(flatten)]
    pub mapping: MappingArgs,

    /// Print the result as JSON instead of tables.
    #[arg(long = "json")]
    pub json: bool,

    /// Show the first N data rows as they would be imported.
    #[arg(long = "preview", value_name = "N")]
    pub preview: Option<usize>,
}

#[derive(Parser)]
pub struct ImportArgs {
    #[command(flatten)]
    pub mapping: MappingArgs,

    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Print the request instead of sending it.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

#[derive(Args)]
pub struct ConnectionArgs {
    /// Import endpoint URL (overrides the config file).
    #[arg(long = "endpoint", value_name = "URL", env = "REFERABLE_ENDPOINT")]
    pub endpoint: Option<String>,

    /// API token sent as a bearer token (overrides the config file).
    #[arg(
        long = "token",
        value_name = "TOKEN",
        env = "REFERABLE_API_TOKEN",
        hide_env_values = true
    )]
    pub token: Option<String>,

    /// Settings file to use instead of the default location.
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Parser)]
pub struct ConfigArgs {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Request timeout in seconds.
    #[arg(long = "timeout", value_name = "SECS")]
    pub timeout_secs: Option<u64>,

    /// Write the given values to the settings file.
    #[arg(long = "save")]
    pub save: bool,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

impl From<LogLevelArg> for LevelFilter {
    fn from(level: LogLevelArg) -> Self {
        match level {
            LogLevelArg::Error => Self::ERROR,
            LogLevelArg::Warn => Self::WARN,
            LogLevelArg::Info => Self::INFO,
            LogLevelArg::Debug => Self::DEBUG,
            LogLevelArg::Trace => Self::TRACE,
        }
    }
}

impl From<LogFormatArg> for LogFormat {
    fn from(format: LogFormatArg) -> Self {
        match format {
            LogFormatArg::Pretty => Self::Pretty,
            LogFormatArg::Compact => Self::Compact,
            LogFormatArg::Json => Self::Json,
        }
    }
}
