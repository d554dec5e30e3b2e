use itertools::Itertools;
use tabled::{
    Table,
    settings::{Alignment, Modify, Panel, Style, object::Rows},
};

use super::{
    results::{GradedRow, Status},
    rules::average,
};
use crate::types::StudentRow;

/// Pairs each input row with its graded counterpart for display.
pub fn graded_rows(original: &[StudentRow], graded: &[StudentRow]) -> Vec<GradedRow> {
    original
        .iter()
        .zip(graded)
        .map(|(before, after)| {
            let [t1, t2, t3] = before.tests();
            GradedRow::builder()
                .absences(before.absences())
                .test_1(t1)
                .test_2(t2)
                .test_3(t3)
                .average(average(before).to_string())
                .status(after.status())
                .final_score(after.final_score())
                .build()
        })
        .collect()
}

/// Renders the grading overview table.
pub fn render_table(original: &[StudentRow], graded: &[StudentRow]) -> String {
    let rows = graded_rows(original, graded);
    let footer = summarize(graded);

    Table::new(&rows)
        .with(Panel::header("Grading Overview"))
        .with(Panel::footer(footer))
        .with(
            Modify::new(Rows::first())
                .with(Alignment::center())
                .with(Alignment::center_vertical()),
        )
        .with(
            Modify::new(Rows::last())
                .with(Alignment::center())
                .with(Alignment::center_vertical()),
        )
        .with(Style::modern())
        .to_string()
}

/// One-line count of rows per status, in rule order.
///
/// Rows whose status cell is empty or holds an unknown label are counted as
/// unresolved.
pub fn summarize(graded: &[StudentRow]) -> String {
    let counts = graded
        .iter()
        .map(|row| Status::from_label(row.status()))
        .counts();

    Status::ALL
        .into_iter()
        .map(|status| (status.label(), counts.get(&Some(status)).copied().unwrap_or(0)))
        .chain(std::iter::once(("Unresolved", counts.get(&None).copied().unwrap_or(0))))
        .map(|(label, n)| format!("{label}: {n}"))
        .join(", ")
}
