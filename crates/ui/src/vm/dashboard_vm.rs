use intellitest_core::model::{Test, TestId};
use services::{DashboardNotice, DashboardTest, StudentDashboard, TestStatus};

use crate::vm::time_fmt::format_duration_minutes;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatCardVm {
    pub label: &'static str,
    pub value: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TestCardVm {
    pub id: TestId,
    pub name: String,
    pub description: Option<String>,
    pub duration_label: String,
    pub question_label: Option<String>,
    pub classes_label: Option<String>,
    pub can_start: bool,
    pub score_label: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct StudentDashboardVm {
    pub stats: Vec<StatCardVm>,
    pub tests: Vec<TestCardVm>,
    pub notice: Option<String>,
}

#[must_use]
pub fn notice_text(notice: DashboardNotice) -> &'static str {
    match notice {
        DashboardNotice::NoClassAssigned => {
            "Your account is not assigned to a class yet. Ask your teacher to add you to one."
        }
    }
}

#[must_use]
pub fn map_student_dashboard(dashboard: &StudentDashboard) -> StudentDashboardVm {
    let stats = vec![
        StatCardVm {
            label: "Available tests",
            value: dashboard.stats.available.to_string(),
        },
        StatCardVm {
            label: "Completed",
            value: dashboard.stats.completed.to_string(),
        },
        StatCardVm {
            label: "Pending",
            value: dashboard.stats.pending.to_string(),
        },
    ];
    StudentDashboardVm {
        stats,
        tests: dashboard.tests.iter().map(map_dashboard_test).collect(),
        notice: dashboard.notice.map(|notice| notice_text(notice).to_string()),
    }
}

fn map_dashboard_test(entry: &DashboardTest) -> TestCardVm {
    let mut card = map_test_card(&entry.test);
    card.can_start = entry.status == TestStatus::Available;
    card.score_label = entry
        .receipt
        .as_ref()
        .and_then(|receipt| receipt.score)
        .map(|score| format!("{score:.1}%"));
    card
}

/// Card for a test listing. List endpoints omit questions, so the count shows only when known.
#[must_use]
pub fn map_test_card(test: &Test) -> TestCardVm {
    let classes: Vec<&str> = test.assigned_class_names().collect();
    TestCardVm {
        id: test.id,
        name: test.name.clone(),
        description: test.description.clone().filter(|text| !text.trim().is_empty()),
        duration_label: format_duration_minutes(test.duration_minutes),
        question_label: match test.question_count() {
            0 => None,
            1 => Some("1 question".to_string()),
            n => Some(format!("{n} questions")),
        },
        classes_label: (!classes.is_empty()).then(|| classes.join(", ")),
        can_start: test.is_live,
        score_label: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use intellitest_core::model::{SubmissionId, SubmissionReceipt};
    use services::DashboardStats;

    fn test(id: u64, classes: Option<&str>) -> Test {
        Test {
            id: TestId::new(id),
            name: format!("Test {id}"),
            description: Some("  ".into()),
            duration_minutes: 60,
            assigned_classes: classes.map(str::to_string),
            is_live: true,
            questions: Vec::new(),
        }
    }

    #[test]
    fn completed_tests_show_score_and_cannot_start() {
        let dashboard = StudentDashboard {
            tests: vec![
                DashboardTest {
                    test: test(1, Some("10A, 10B")),
                    status: TestStatus::Available,
                    receipt: None,
                },
                DashboardTest {
                    test: test(2, Some("10A")),
                    status: TestStatus::Completed,
                    receipt: Some(SubmissionReceipt {
                        id: SubmissionId::new(7),
                        test_id: TestId::new(2),
                        student_id: None,
                        score: Some(80.0),
                        total_questions: Some(5),
                        attempted_questions: Some(4),
                        submitted_at: None,
                        is_auto_submitted: None,
                    }),
                },
            ],
            stats: DashboardStats {
                available: 2,
                completed: 1,
                pending: 1,
            },
            notice: None,
        };

        let vm = map_student_dashboard(&dashboard);
        let values: Vec<&str> = vm.stats.iter().map(|s| s.value.as_str()).collect();
        assert_eq!(values, vec!["2", "1", "1"]);
        assert!(vm.tests[0].can_start);
        assert_eq!(vm.tests[0].classes_label.as_deref(), Some("10A, 10B"));
        assert_eq!(vm.tests[0].description, None);
        assert_eq!(vm.tests[0].duration_label, "1 hour");
        assert!(!vm.tests[1].can_start);
        assert_eq!(vm.tests[1].score_label.as_deref(), Some("80.0%"));
        assert_eq!(vm.notice, None);
    }

    #[test]
    fn missing_class_becomes_notice() {
        let dashboard = StudentDashboard {
            tests: Vec::new(),
            stats: DashboardStats::default(),
            notice: Some(DashboardNotice::NoClassAssigned),
        };
        let vm = map_student_dashboard(&dashboard);
        assert!(vm.notice.unwrap().contains("not assigned to a class"));
        assert!(vm.tests.is_empty());
    }
}
