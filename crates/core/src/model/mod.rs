mod ids;
mod progress;
mod question;
mod submission;
mod user;

pub use ids::{ParseIdError, QuestionId, SubmissionId, TestId, UserId};
pub use progress::{
    ProgressCounts, ProgressPayload, ProgressSnapshot, ProgressStatus, completion_percent,
};
pub use question::{AnswerOption, Difficulty, ParseOptionError, Question};
pub use submission::{AnswerEntry, Submission, SubmissionReceipt};
pub use test::Test;
pub use user::{AppView, Capability, Role, User};
