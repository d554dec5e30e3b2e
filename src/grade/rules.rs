#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use super::{
    numeric::{read_integer_prefix, read_number, round_half_up},
    results::{Outcome, Status},
};
use crate::types::StudentRow;

/// Absence count above which a student fails regardless of scores.
pub const MAX_ABSENCES: f64 = 15.0;
/// Averages below this fail outright.
pub const FAILING_AVERAGE: f64 = 50.0;
/// Averages at or above this pass outright.
pub const PASSING_AVERAGE: f64 = 70.0;
/// Final score text written for every terminal status.
pub const SETTLED_SCORE: &str = "0";

/// A gate looks at the test average and either fixes a status or passes.
type Gate = fn(f64) -> Option<Status>;

/// Average-based gates, evaluated in order after the absence check.
const AVERAGE_GATES: [Gate; 3] = [fails_by_score, approves, sends_to_final_exam];

/// Rounded mean of the three test scores.
///
/// An unreadable score makes the whole average `NaN`.
pub fn average(row: &StudentRow) -> f64 {
    let sum: f64 = row.tests().iter().map(|t| read_integer_prefix(t)).sum();
    round_half_up(sum / 3.0)
}

/// Fails students that missed too many classes.
fn fails_by_absence(row: &StudentRow) -> Option<Status> {
    (read_number(row.absences()) > MAX_ABSENCES).then_some(Status::FailedByAbsence)
}

/// Fails students whose average is below [`FAILING_AVERAGE`].
fn fails_by_score(average: f64) -> Option<Status> {
    (average < FAILING_AVERAGE).then_some(Status::FailedByScore)
}

/// Approves students whose average reaches [`PASSING_AVERAGE`].
fn approves(average: f64) -> Option<Status> {
    (average >= PASSING_AVERAGE).then_some(Status::Approved)
}

/// Sends everyone in between to the final exam.
fn sends_to_final_exam(average: f64) -> Option<Status> {
    (FAILING_AVERAGE..PASSING_AVERAGE)
        .contains(&average)
        .then_some(Status::FinalExam)
}

/// Runs the gates over a row, stopping at the first that matches.
///
/// The absence gate always runs. The average gates only run while the row
/// carries no status, so a label already in the sheet is never replaced by
/// them.
pub fn evaluate(row: &StudentRow, average: f64) -> Outcome {
    tracing::debug!("Checking absences");
    if let Some(status) = fails_by_absence(row) {
        return Outcome::Resolved(status);
    }
    if row.has_status() {
        return Outcome::Unresolved;
    }

    tracing::debug!(average, "Checking average");
    AVERAGE_GATES
        .iter()
        .find_map(|gate| gate(average))
        .map_or(Outcome::Unresolved, Outcome::Resolved)
}

/// Blends a raw final exam score in the final score cell with the average.
///
/// Leaves the cell alone when it holds the settled `"0"`, or when the blend
/// is not a number (blank or unreadable cell).
fn blend_final_exam(row: &mut StudentRow, average: f64) {
    if row.final_score() == SETTLED_SCORE {
        return;
    }

    let raw = read_integer_prefix(row.final_score());
    let blended = (average + raw) / 2.0;
    if blended.is_finite() {
        tracing::debug!(average, raw, blended, "Blending final exam score");
        row.set_blended_score(blended);
    }
}

/// Grades a single row, returning the updated copy.
pub fn grade_row(row: &StudentRow) -> StudentRow {
    let mut graded = row.clone();
    let average = average(row);

    if let Some(status) = evaluate(row, average).status() {
        graded.set_status(status.label());
        if status.zeroes_final_score() {
            graded.set_final_score(SETTLED_SCORE);
        }
    }

    blend_final_exam(&mut graded, average);
    graded
}

/// Grades every row, keeping their order.
pub fn grade_rows(rows: &[StudentRow]) -> Vec<StudentRow> {
    rows.iter().map(grade_row).collect()
}
