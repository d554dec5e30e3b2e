#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

/// Lenient numeric readings of cell text.
pub mod numeric;
/// Text rendering of graded rows.
pub mod report;
/// Status, outcome and report row types.
pub mod results;
/// The ordered grading rules.
pub mod rules;

pub use report::{render_table, summarize};
pub use results::{GradedRow, Outcome, Status};
pub use rules::{average, evaluate, grade_row, grade_rows};

pub use crate::types::StudentRow;
