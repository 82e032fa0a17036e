use serde::{Deserialize, Deserializer, Serialize};

use crate::model::ids::UserId;

/// Share of answered questions as a percentage in `0.0..=100.0`.
///
/// A test without questions counts as complete (100), never NaN.
#[must_use]
pub fn completion_percent(attempted: usize, total: usize) -> f64 {
    if total == 0 {
        return 100.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let ratio = attempted as f64 / total as f64;
    (ratio * 100.0).clamp(0.0, 100.0)
}

//
// ─── SNAPSHOTS ────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressStatus {
    #[serde(alias = "Not Started")]
    NotStarted,
    #[serde(alias = "In Progress")]
    InProgress,
    #[serde(alias = "Submitted", alias = "completed")]
    Submitted,
}

impl ProgressStatus {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::NotStarted => "not started",
            Self::InProgress => "in progress",
            Self::Submitted => "submitted",
        }
    }
}

/// One student's progress on one live test at poll time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    #[serde(alias = "student_id")]
    pub user_id: UserId,
    #[serde(alias = "student_name")]
    pub user_name: String,
    #[serde(default, alias = "student_class")]
    pub class_name: Option<String>,
    #[serde(default, deserialize_with = "zero_if_null")]
    pub attempted_questions: u32,
    #[serde(default, deserialize_with = "zero_if_null")]
    pub total_questions: u32,
    pub status: ProgressStatus,
}

impl ProgressSnapshot {
    #[must_use]
    pub fn completion_percent(&self) -> f64 {
        completion_percent(
            self.attempted_questions as usize,
            self.total_questions as usize,
        )
    }
}

fn zero_if_null<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<u32>::deserialize(deserializer)?.unwrap_or_default())
}

/// Wire shapes of the progress endpoint: a bare list, or the server's summary envelope.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ProgressPayload {
    Snapshots(Vec<ProgressSnapshot>),
    Envelope { students: Vec<ProgressSnapshot> },
}

impl ProgressPayload {
    #[must_use]
    pub fn into_snapshots(self) -> Vec<ProgressSnapshot> {
        match self {
            Self::Snapshots(snapshots) | Self::Envelope { students: snapshots } => snapshots,
        }
    }
}

//
// ─── COUNTS ───────────────────────────────────────────────────────────────────
//

/// Status counts derived from one snapshot set. Always recomputed, never patched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProgressCounts {
    pub total: usize,
    pub submitted: usize,
    pub in_progress: usize,
    pub not_started: usize,
}

impl ProgressCounts {
    #[must_use]
    pub fn from_snapshots(snapshots: &[ProgressSnapshot]) -> Self {
        snapshots
            .iter()
            .fold(Self::default(), |mut counts, snapshot| {
                counts.total += 1;
                match snapshot.status {
                    ProgressStatus::Submitted => counts.submitted += 1,
                    ProgressStatus::InProgress => counts.in_progress += 1,
                    ProgressStatus::NotStarted => counts.not_started += 1,
                }
                counts
            })
    }
}
