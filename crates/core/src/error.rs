use thiserror::Error;

use crate::model::QuestionId;

/// Rejections raised by [`crate::Attempt`] when an event does not fit the current phase.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AttemptError {
    #[error("attempt has already been started")]
    AlreadyStarted,

    #[error("attempt is not in progress")]
    NotInProgress,

    #[error("question {0} is not part of this test")]
    UnknownQuestion(QuestionId),
}
