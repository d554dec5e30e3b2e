#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::fmt::Display;

use bon::Builder;
use serde::{Deserialize, Serialize};
use tabled::Tabled;

/// The verdict a row can be given by the grading rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    /// More than the allowed number of absences.
    FailedByAbsence,
    /// Test average below the failing threshold.
    FailedByScore,
    /// Test average at or above the passing threshold.
    Approved,
    /// Test average in between; the final exam decides.
    FinalExam,
}

impl Status {
    /// Every status, in the order the rules can assign them.
    pub const ALL: [Status; 4] = [
        Status::FailedByAbsence,
        Status::FailedByScore,
        Status::Approved,
        Status::FinalExam,
    ];

    /// Label written to the status cell.
    pub fn label(self) -> &'static str {
        match self {
            Status::FailedByAbsence => "Failed by Absence",
            Status::FailedByScore => "Failed by Score",
            Status::Approved => "Approved",
            Status::FinalExam => "Final Exam",
        }
    }

    /// Parses a status cell back into a status, if it holds a known label.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.label() == label)
    }

    /// Whether this status settles the final score at `0`.
    pub fn zeroes_final_score(self) -> bool {
        !matches!(self, Status::FinalExam)
    }
}

impl Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Result of running the grading gates over a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// No gate matched; the row keeps whatever status it had.
    Unresolved,
    /// The first matching gate fixed this status.
    Resolved(Status),
}

impl Outcome {
    /// The resolved status, if any.
    pub fn status(self) -> Option<Status> {
        match self {
            Outcome::Unresolved => None,
            Outcome::Resolved(status) => Some(status),
        }
    }
}

#[derive(Tabled, Clone, Debug, Default, Builder, Serialize, Deserialize)]
#[builder(on(String, into))]
/// One line of the grading report
pub struct GradedRow {
    #[tabled(rename = "Absences")]
    /// * `absences`: absence count as read from the sheet
    pub(crate) absences:    String,
    #[tabled(rename = "Test 1")]
    /// * `test_1`: first test score as read
    pub(crate) test_1:      String,
    #[tabled(rename = "Test 2")]
    /// * `test_2`: second test score as read
    pub(crate) test_2:      String,
    #[tabled(rename = "Test 3")]
    /// * `test_3`: third test score as read
    pub(crate) test_3:      String,
    #[tabled(rename = "Average")]
    /// * `average`: rounded test average, `NaN` when a score is unreadable
    pub(crate) average:     String,
    #[tabled(rename = "Status")]
    /// * `status`: status cell after grading
    pub(crate) status:      String,
    #[tabled(rename = "Final score")]
    /// * `final_score`: final score cell after grading
    pub(crate) final_score: String,
}

impl GradedRow {
    /// Returns the rounded average as rendered in the report.
    pub fn average(&self) -> &str {
        &self.average
    }

    /// Returns the status cell after grading.
    pub fn status(&self) -> &str {
        &self.status
    }

    /// Returns the final score cell after grading.
    pub fn final_score(&self) -> &str {
        &self.final_score
    }
}
