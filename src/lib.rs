//! # gradesheet
//!
//! Reads student rows from a Google Sheets range, applies the course grading
//! rules to each row, and writes the results back to the sheet.

#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

/// Installed-app OAuth and the token cache
pub mod auth;
/// Run configuration read from the environment
pub mod config;
/// Error types for the external collaborators
pub mod error;
/// For all things related to grading
pub mod grade;
/// The fetch, grade, write sequence
pub mod run;
/// Sheets values API client
pub mod sheets;
/// The student row type
pub mod types;

pub use config::Config;
pub use grade::{Status, grade_row, grade_rows};
pub use run::{RunOutcome, run, run_with_google};
pub use types::StudentRow;
