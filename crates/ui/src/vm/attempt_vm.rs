use intellitest_core::model::{AnswerOption, Test};
use intellitest_core::{AttemptPhase, FailureReason, SubmitTrigger};
use services::AttemptView;

use crate::vm::time_fmt::format_countdown;

//
// ─── TIMER ─────────────────────────────────────────────────────────────────────
//

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerTone {
    Calm,
    Warn,
    Critical,
}

impl TimerTone {
    /// More than half the time left is calm, more than a fifth is a warning.
    #[must_use]
    pub fn from_fraction(fraction_left: f64) -> Self {
        if fraction_left > 0.5 {
            Self::Calm
        } else if fraction_left > 0.2 {
            Self::Warn
        } else {
            Self::Critical
        }
    }

    #[must_use]
    pub fn class(self) -> &'static str {
        match self {
            Self::Calm => "timer timer-calm",
            Self::Warn => "timer timer-warn",
            Self::Critical => "timer timer-critical",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TimerVm {
    pub label: String,
    pub tone: TimerTone,
}

#[must_use]
pub fn timer_vm(view: &AttemptView) -> TimerVm {
    TimerVm {
        label: format_countdown(view.remaining_secs),
        tone: TimerTone::from_fraction(view.time_fraction_left()),
    }
}

//
// ─── QUESTIONS ─────────────────────────────────────────────────────────────────
//

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionVm {
    pub option: AnswerOption,
    pub label: char,
    pub text: String,
    pub selected: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuestionVm {
    pub id: intellitest_core::model::QuestionId,
    pub number: usize,
    pub text: String,
    pub topic: Option<String>,
    pub image_url: Option<String>,
    pub answered: bool,
    pub options: Vec<OptionVm>,
}

#[must_use]
pub fn map_questions(test: &Test, view: &AttemptView) -> Vec<QuestionVm> {
    test.questions
        .iter()
        .enumerate()
        .map(|(index, question)| {
            let selected = view.selected(question.id);
            let options = question
                .options()
                .into_iter()
                .map(|(option, text)| OptionVm {
                    option,
                    label: option.label(),
                    text: text.to_string(),
                    selected: selected == Some(option),
                })
                .collect();
            QuestionVm {
                id: question.id,
                number: index + 1,
                text: question.question_text.clone(),
                topic: question.topic.clone(),
                image_url: question.image_url.clone(),
                answered: selected.is_some(),
                options,
            }
        })
        .collect()
}

#[must_use]
pub fn progress_label(view: &AttemptView) -> String {
    format!("Answered {} of {}", view.attempted, view.total)
}

/// Body of the submit confirmation dialog.
#[must_use]
pub fn confirm_copy(attempted: usize, total: usize) -> String {
    let unanswered = total.saturating_sub(attempted);
    match unanswered {
        0 => format!("You have answered all {total} questions. Submit now?"),
        1 => format!(
            "You have answered {attempted} of {total} questions. 1 question is unanswered. Submit anyway?"
        ),
        n => format!(
            "You have answered {attempted} of {total} questions. {n} questions are unanswered. Submit anyway?"
        ),
    }
}

//
// ─── STATUS BANNER ─────────────────────────────────────────────────────────────
//

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BannerKind {
    Info,
    Success,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BannerVm {
    pub kind: BannerKind,
    pub title: String,
    pub detail: Option<String>,
    pub can_retry: bool,
    /// The token expired; the learner signs in again before the answers are resent.
    pub needs_sign_in: bool,
}

/// What to tell the learner once the attempt has left `InProgress`.
#[must_use]
pub fn phase_banner(view: &AttemptView) -> Option<BannerVm> {
    let forced = view.trigger == Some(SubmitTrigger::Forced);
    match &view.phase {
        AttemptPhase::NotStarted | AttemptPhase::InProgress => None,
        AttemptPhase::Submitting => Some(BannerVm {
            kind: BannerKind::Info,
            title: if forced {
                "Time is up. Submitting your answers...".to_string()
            } else {
                "Submitting your answers...".to_string()
            },
            detail: None,
            can_retry: false,
            needs_sign_in: false,
        }),
        AttemptPhase::Submitted => {
            let detail = view.receipt.as_ref().and_then(|receipt| {
                receipt.score.map(|score| format!("Score: {score:.1}%"))
            });
            Some(BannerVm {
                kind: BannerKind::Success,
                title: if forced {
                    "Time is up. Your answers were submitted.".to_string()
                } else {
                    "Your answers were submitted.".to_string()
                },
                detail,
                can_retry: false,
                needs_sign_in: false,
            })
        }
        AttemptPhase::Failed(reason) => {
            let expired = *reason == FailureReason::Auth;
            Some(BannerVm {
                kind: BannerKind::Error,
                title: "Submission failed".to_string(),
                detail: Some(reason.message()),
                can_retry: !expired,
                needs_sign_in: expired,
            })
        }
    }
}
