use intellitest_core::model::{ProgressSnapshot, ProgressStatus, UserId};
use services::MonitorBoard;

use crate::vm::time_fmt::format_time_of_day;

#[derive(Clone, Debug, PartialEq)]
pub struct StudentRowVm {
    pub user_id: UserId,
    pub name: String,
    pub class_name: String,
    pub progress_label: String,
    pub percent: f64,
    pub status_label: &'static str,
    pub status_class: &'static str,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MonitorBoardVm {
    pub total: usize,
    pub submitted: usize,
    pub in_progress: usize,
    pub not_started: usize,
    pub rows: Vec<StudentRowVm>,
    pub refreshed_label: Option<String>,
    pub loaded: bool,
}

#[must_use]
pub fn status_class(status: ProgressStatus) -> &'static str {
    match status {
        ProgressStatus::NotStarted => "status status-idle",
        ProgressStatus::InProgress => "status status-active",
        ProgressStatus::Submitted => "status status-done",
    }
}

#[must_use]
pub fn map_board(board: &MonitorBoard) -> MonitorBoardVm {
    MonitorBoardVm {
        total: board.counts.total,
        submitted: board.counts.submitted,
        in_progress: board.counts.in_progress,
        not_started: board.counts.not_started,
        rows: board.snapshots.iter().map(map_row).collect(),
        refreshed_label: board
            .refreshed_at
            .map(|at| format!("Updated {}", format_time_of_day(at))),
        loaded: board.is_loaded(),
    }
}

fn map_row(snapshot: &ProgressSnapshot) -> StudentRowVm {
    StudentRowVm {
        user_id: snapshot.user_id,
        name: snapshot.user_name.clone(),
        class_name: snapshot.class_name.clone().unwrap_or_else(|| "-".to_string()),
        progress_label: format!(
            "{} / {}",
            snapshot.attempted_questions, snapshot.total_questions
        ),
        percent: snapshot.completion_percent(),
        status_label: snapshot.status.label(),
        status_class: status_class(snapshot.status),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use intellitest_core::model::{ProgressCounts, TestId};
    use intellitest_core::time::fixed_now;

    fn snapshot(id: u64, attempted: u32, status: ProgressStatus) -> ProgressSnapshot {
        ProgressSnapshot {
            user_id: UserId::new(id),
            user_name: format!("Student {id}"),
            class_name: None,
            attempted_questions: attempted,
            total_questions: 4,
            status,
        }
    }

    #[test]
    fn pending_board_is_not_loaded() {
        let vm = map_board(&MonitorBoard::pending(TestId::new(1)));
        assert!(!vm.loaded);
        assert!(vm.rows.is_empty());
        assert_eq!(vm.refreshed_label, None);
    }

    #[test]
    fn rows_carry_progress_and_status() {
        let snapshots = vec![
            snapshot(1, 4, ProgressStatus::Submitted),
            snapshot(2, 1, ProgressStatus::InProgress),
        ];
        let board = MonitorBoard {
            test_id: Some(TestId::new(1)),
            counts: ProgressCounts::from_snapshots(&snapshots),
            snapshots,
            refreshed_at: Some(fixed_now()),
        };

        let vm = map_board(&board);
        assert_eq!(vm.total, 2);
        assert_eq!(vm.submitted, 1);
        assert_eq!(vm.in_progress, 1);
        assert_eq!(vm.rows[1].progress_label, "1 / 4");
        assert!((vm.rows[1].percent - 25.0).abs() < f64::EPSILON);
        assert_eq!(vm.rows[0].status_class, "status status-done");
        assert_eq!(vm.rows[0].class_name, "-");
        assert_eq!(vm.refreshed_label.as_deref(), Some("Updated 22:13:20"));
    }
}
