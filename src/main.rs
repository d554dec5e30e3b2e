#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! # gradesheet
//!
//! Grades the student rows of a spreadsheet in place. Run it with no
//! arguments to fetch, grade and write back the configured range.

use std::{path::PathBuf, process::ExitCode};

use bpaf::*;
use dotenvy::dotenv;
use gradesheet::{Config, run_with_google};
use tracing::{Level, metadata::LevelFilter};
use tracing_subscriber::{fmt, prelude::*, util::SubscriberInitExt};

/// Command line overrides for the environment configuration.
#[derive(Debug, Clone)]
struct Opts {
    /// Grade and report without writing back.
    dry_run:        bool,
    /// Client secret file override.
    credentials:    Option<PathBuf>,
    /// Token cache override.
    token:          Option<PathBuf>,
    /// Spreadsheet override.
    spreadsheet_id: Option<String>,
}

/// Parse the command line arguments and return an `Opts`
fn options() -> Opts {
    let dry_run = long("dry-run")
        .help("Grade and print the results without writing them back")
        .switch();
    let credentials = long("credentials")
        .help("Path to the installed-app client secret file")
        .argument::<PathBuf>("PATH")
        .optional();
    let token = long("token")
        .help("Path to the cached token file")
        .argument::<PathBuf>("PATH")
        .optional();
    let spreadsheet_id = long("spreadsheet-id")
        .help("Spreadsheet to grade")
        .argument::<String>("ID")
        .optional();

    construct!(Opts {
        dry_run,
        credentials,
        token,
        spreadsheet_id
    })
    .to_options()
    .descr("Applies grading rules to student rows in a spreadsheet")
    .version(env!("CARGO_PKG_VERSION"))
    .run()
}

/// Log level from `GRADESHEET_LOG`, INFO unless it says otherwise.
fn log_level() -> Level {
    std::env::var("GRADESHEET_LOG")
        .ok()
        .and_then(|value| value.trim().parse::<Level>().ok())
        .unwrap_or(Level::INFO)
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv().ok();

    let fmt = fmt::layer()
        .without_time()
        .with_file(false)
        .with_line_number(false);
    let filter_layer = LevelFilter::from_level(log_level());
    tracing_subscriber::registry()
        .with(fmt)
        .with(filter_layer)
        .init();

    let opts = options();

    let mut config = Config::from_env();
    config.set_dry_run(opts.dry_run);
    if let Some(path) = opts.credentials {
        config.set_credentials_path(path);
    }
    if let Some(path) = opts.token {
        config.set_token_path(path);
    }
    if let Some(id) = opts.spreadsheet_id {
        config.set_spreadsheet_id(id);
    }

    match run_with_google(&config).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
