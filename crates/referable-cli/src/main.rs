//! Referable import CLI.

use clap::{ColorChoice, Parser};
use referable_cli::logging::{LogConfig, init_logging};
use referable_cli::pipeline::{import_exit_code, map_exit_code};
use std::io::{self, IsTerminal};
use tracing::level_filters::LevelFilter;

mod cli;
mod commands;
mod summary;

use crate::cli::{Cli, Command};
use crate::commands::{run_config, run_fields, run_import, run_map};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let outcome = match &cli.command {
        Command::Fields => {
            run_fields();
            Ok(0)
        }
        Command::Map(args) => run_map(args).map(map_exit_code),
        Command::Import(args) => run_import(args).map(|summary| import_exit_code(summary.as_ref())),
        Command::Config(args) => run_config(args).map(|()| 0),
    };
    let exit_code = outcome.unwrap_or_else(|error| {
        eprintln!("error: {error:#}");
        1
    });
    std::process::exit(exit_code);
}

/// Logging setup from the global flags.
///
/// `--log-level` wins over `-v`/`-q`. `RUST_LOG` applies only when neither
/// is given. Colors follow `--color`, and `auto` never colors a log file.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let explicit_level = cli.log_level.map(LevelFilter::from);
    let with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    LogConfig {
        level_filter: explicit_level.unwrap_or_else(|| cli.verbosity.tracing_level_filter()),
        use_env_filter: explicit_level.is_none() && !cli.verbosity.is_present(),
        format: cli.log_format.into(),
        log_file: cli.log_file.clone(),
        with_ansi,
        ..LogConfig::default()
    }
}
