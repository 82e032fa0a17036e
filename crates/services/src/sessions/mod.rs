mod driver;
mod service;

// Public API of the test-session subsystem.
pub use crate::error::SessionError;
pub use driver::{AttemptDriver, AttemptView};
pub use service::{SubmitOutcome, TestSessionService};
