use intellitest_core::model::SubmissionId;
use services::ResultRow;

use crate::vm::time_fmt::format_datetime;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResultRowVm {
    pub id: SubmissionId,
    pub test_name: String,
    pub score_label: String,
    pub attempted_label: String,
    pub submitted_label: String,
    pub auto_submitted: bool,
}

#[must_use]
pub fn map_result_rows(rows: &[ResultRow]) -> Vec<ResultRowVm> {
    rows.iter().map(map_result_row).collect()
}

fn map_result_row(row: &ResultRow) -> ResultRowVm {
    let receipt = &row.receipt;
    let attempted_label = match (receipt.attempted_questions, receipt.total_questions) {
        (Some(attempted), Some(total)) => format!("{attempted} / {total}"),
        (Some(attempted), None) => attempted.to_string(),
        _ => "-".to_string(),
    };
    ResultRowVm {
        id: receipt.id,
        test_name: row.test_name.clone(),
        score_label: receipt
            .score
            .map_or_else(|| "Pending".to_string(), |score| format!("{score:.1}%")),
        attempted_label,
        submitted_label: receipt
            .submitted_at
            .map_or_else(|| "-".to_string(), format_datetime),
        auto_submitted: receipt.is_auto_submitted.unwrap_or(false),
    }
}
