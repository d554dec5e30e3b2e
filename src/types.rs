use std::fmt::Display;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::grade::numeric::format_score;

/// Number of cells a student row carries.
pub const ROW_WIDTH: usize = 6;

/// Column holding the absence count.
pub const ABSENCES: usize = 0;
/// Columns holding the three test scores.
pub const TESTS: [usize; 3] = [1, 2, 3];
/// Column holding the status label.
pub const STATUS: usize = 4;
/// Column holding the final score.
pub const FINAL_SCORE: usize = 5;

/// One student record as it appears in the sheet, cell text by position.
///
/// The sheet API drops trailing empty cells, so rows are padded to
/// [`ROW_WIDTH`] when constructed. Cells past the final score column are kept
/// as they were read.
///
/// On the wire a row is an array of cell values. Every cell is written as
/// text except a blended final score, which goes out as a number so the sheet
/// does not re-parse it with its locale's decimal separator.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "Vec<Value>", into = "Vec<Value>")]
pub struct StudentRow {
    /// Cell text, at least [`ROW_WIDTH`] entries.
    cells:   Vec<String>,
    /// Numeric value of the final score cell, set only by a blend.
    blended: Option<f64>,
}

impl StudentRow {
    /// Builds a row from cell text, padding missing cells with empty text.
    pub fn new<I, S>(cells: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut cells: Vec<String> = cells.into_iter().map(Into::into).collect();
        if cells.len() < ROW_WIDTH {
            cells.resize(ROW_WIDTH, String::new());
        }
        Self {
            cells,
            blended: None,
        }
    }

    /// Text of the absence count cell.
    pub fn absences(&self) -> &str {
        &self.cells[ABSENCES]
    }

    /// Text of the three test score cells, in sheet order.
    pub fn tests(&self) -> [&str; 3] {
        TESTS.map(|i| self.cells[i].as_str())
    }

    /// Text of the status cell.
    pub fn status(&self) -> &str {
        &self.cells[STATUS]
    }

    /// Text of the final score cell.
    pub fn final_score(&self) -> &str {
        &self.cells[FINAL_SCORE]
    }

    /// Whether the status cell already holds a label.
    pub fn has_status(&self) -> bool {
        !self.status().is_empty()
    }

    /// Overwrites the status cell.
    pub fn set_status(&mut self, status: impl Into<String>) {
        self.cells[STATUS] = status.into();
    }

    /// Overwrites the final score cell with text.
    pub fn set_final_score(&mut self, score: impl Into<String>) {
        self.cells[FINAL_SCORE] = score.into();
        self.blended = None;
    }

    /// Overwrites the final score cell with a blended score.
    pub fn set_blended_score(&mut self, score: f64) {
        self.cells[FINAL_SCORE] = format_score(score);
        self.blended = Some(score);
    }

    /// The blended final score, if grading computed one.
    pub fn blended_score(&self) -> Option<f64> {
        self.blended
    }

    /// All cells, in sheet order.
    pub fn cells(&self) -> &[String] {
        &self.cells
    }
}

/// Text of a cell as the sheet reported it.
fn cell_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        Value::Bool(b) => (if b { "TRUE" } else { "FALSE" }).to_string(),
        other => other.to_string(),
    }
}

impl From<Vec<Value>> for StudentRow {
    fn from(cells: Vec<Value>) -> Self {
        Self::new(cells.into_iter().map(cell_text))
    }
}

impl From<StudentRow> for Vec<Value> {
    fn from(row: StudentRow) -> Self {
        let blended = row.blended;
        row.cells
            .into_iter()
            .enumerate()
            .map(|(i, text)| match blended {
                Some(score) if i == FINAL_SCORE => Value::from(score),
                _ => Value::String(text),
            })
            .collect()
    }
}

impl Display for StudentRow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.cells.join(", "))
    }
}
