#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use anyhow::{Context, Result};
use reqwest::Client;

use crate::{
    auth::Authority,
    config::Config,
    grade::{grade_rows, render_table},
    sheets::{SheetService, SheetsClient},
};

/// What a run ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The read range held no rows; nothing was written.
    NoData,
    /// Rows were graded.
    Graded {
        /// Number of rows graded.
        rows:    usize,
        /// Whether the write-back succeeded. `false` on dry runs too.
        written: bool,
    },
}

/// Fetches, grades and writes back the configured range.
///
/// A failed fetch is returned as an error and nothing is written. A failed
/// write is logged and reported through [`RunOutcome::Graded::written`].
pub async fn run<S: SheetService>(config: &Config, sheets: &S) -> Result<RunOutcome> {
    let rows = sheets
        .fetch_range(config.read_range())
        .await
        .with_context(|| format!("Could not read range {}", config.read_range()))?;

    if rows.is_empty() {
        tracing::info!("No data found.");
        return Ok(RunOutcome::NoData);
    }
    tracing::info!("Fetched {} rows from {}", rows.len(), config.read_range());
    for row in &rows {
        tracing::debug!("{row}");
    }

    let graded = grade_rows(&rows);
    tracing::info!("\n{}", render_table(&rows, &graded));

    if config.dry_run() {
        tracing::info!("Dry run, skipping write to {}", config.write_range());
        return Ok(RunOutcome::Graded {
            rows:    graded.len(),
            written: false,
        });
    }

    let written = match sheets.write_range(config.write_range(), &graded).await {
        Ok(()) => {
            tracing::info!("Wrote {} rows to {}", graded.len(), config.write_range());
            true
        }
        Err(e) => {
            tracing::error!("Could not write range {}: {e}", config.write_range());
            false
        }
    };

    Ok(RunOutcome::Graded {
        rows: graded.len(),
        written,
    })
}

/// Authorizes against Google and runs against the configured spreadsheet.
pub async fn run_with_google(config: &Config) -> Result<RunOutcome> {
    let http = Client::builder()
        .timeout(config.http_timeout())
        .build()
        .context("Failed to construct HTTP client")?;

    let authority = Authority::from_config(config, http.clone())?;
    let token = authority
        .authorize()
        .await
        .context("Authorization failed")?;

    let sheets = SheetsClient::new(http, config.api_base(), config.spreadsheet_id(), token);
    run(config, &sheets).await
}
