use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::model::ids::{QuestionId, SubmissionId, TestId, UserId};
use crate::model::question::AnswerOption;
use crate::model::test::Test;

/// One entry of a submission. `selected_answer` is `null` on the wire when unattempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerEntry {
    pub question_id: QuestionId,
    pub selected_answer: Option<AnswerOption>,
}

/// Body of `POST /submissions`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub test_id: TestId,
    pub answers: Vec<AnswerEntry>,
}

impl Submission {
    /// Builds the payload in the test's question order, one entry per question.
    #[must_use]
    pub fn from_answers(test: &Test, answers: &HashMap<QuestionId, AnswerOption>) -> Self {
        let answers = test
            .questions
            .iter()
            .map(|question| AnswerEntry {
                question_id: question.id,
                selected_answer: answers.get(&question.id).copied(),
            })
            .collect();
        Self {
            test_id: test.id,
            answers,
        }
    }

    #[must_use]
    pub fn attempted(&self) -> usize {
        self.answers
            .iter()
            .filter(|entry| entry.selected_answer.is_some())
            .count()
    }
}

/// What the server stored for a submission. Score is graded server-side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionReceipt {
    pub id: SubmissionId,
    pub test_id: TestId,
    #[serde(default)]
    pub student_id: Option<UserId>,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub total_questions: Option<u32>,
    #[serde(default)]
    pub attempted_questions: Option<u32>,
    #[serde(default, with = "crate::time::lenient_utc")]
    pub submitted_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_auto_submitted: Option<bool>,
}
