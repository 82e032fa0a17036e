#![forbid(unsafe_code)]

pub mod attempt;
pub mod error;
pub mod model;
pub mod time;

pub use attempt::{Attempt, AttemptPhase, FailureReason, SubmitTrigger, TickOutcome};
pub use error::AttemptError;
pub use time::Clock;
