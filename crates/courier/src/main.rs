// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Courier - notification connectors from the command line.
//!
//! This is the binary entry point. Results are printed to stdout as JSON,
//! logs go to stderr.

mod app;
mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use courier_core::{ActionConnector, CourierError};
use serde::Serialize;
use serde_json::Value;

use crate::app::App;

/// Courier - notification connectors from the command line.
#[derive(Parser, Debug)]
#[command(name = "courier", version, about, long_about = None)]
struct Cli {
    /// Configuration file to load instead of the standard search path.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// List the registered action types and whether they are enabled.
    Types,
    /// Validate a connector JSON file against the server and form rules.
    Validate {
        /// Connector JSON file.
        file: PathBuf,
    },
    /// Print the form description of a connector.
    Form {
        /// Connector JSON file.
        file: PathBuf,
        /// Render every field read-only.
        #[arg(long)]
        read_only: bool,
    },
    /// Execute a connector and print the executor result.
    Execute {
        /// Connector JSON file.
        file: PathBuf,
        /// Params JSON file.
        #[arg(long)]
        params: PathBuf,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => courier_config::load_and_validate_path(path),
        None => courier_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            courier_config::render_errors(&errors);
            return ExitCode::FAILURE;
        }
    };
    init_tracing(&config.logging.level);

    match run(cli.command, &config).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("courier: error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(
    command: Commands,
    config: &courier_config::CourierConfig,
) -> Result<ExitCode, CourierError> {
    let app = App::new(config)?;
    match command {
        Commands::Types => print_json(&commands::run_types(&app)),
        Commands::Validate { file } => {
            let connector: ActionConnector = commands::read_json(&file)?;
            let report = commands::run_validate(&app, &connector)?;
            print_json(&report)?;
            Ok(exit_code(report.valid))
        }
        Commands::Form { file, read_only } => {
            let connector: ActionConnector = commands::read_json(&file)?;
            print_json(&commands::run_form(&app, &connector, read_only)?)
        }
        Commands::Execute { file, params } => {
            let connector: ActionConnector = commands::read_json(&file)?;
            let params: Value = commands::read_json(&params)?;
            let result = commands::run_execute(&app, &connector, params).await;
            print_json(&result)?;
            Ok(exit_code(result.is_ok()))
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<ExitCode, CourierError> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| CourierError::Internal(format!("failed to serialize output: {e}")))?;
    println!("{text}");
    Ok(ExitCode::SUCCESS)
}

fn exit_code(success: bool) -> ExitCode {
    if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("courier={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}
