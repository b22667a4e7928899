/// Review model
///
/// Reviews are a read model fed by task status changes: moving a task into
/// `In Review` opens a pending review for its assignor, and moving it out
/// closes the open review as approved or rejected. Only the dashboard reads
/// them.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE reviews (
///     id UUID PRIMARY KEY,
///     task_id UUID NOT NULL REFERENCES tasks(id) ON DELETE CASCADE,
///     reviewer_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     status VARCHAR(16) NOT NULL DEFAULT 'Pending',
///     comments TEXT,
///     submitted_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     reviewed_at TIMESTAMPTZ
/// );
/// ```

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::task::TaskStatus;
use super::ParseEnumError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReviewStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl ReviewStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewStatus::Pending => "Pending",
            ReviewStatus::Approved => "Approved",
            ReviewStatus::Rejected => "Rejected",
        }
    }

    /// Outcome for open reviews when a task moves to `status`
    ///
    /// `None` means the open review (if any) stays pending.
    pub fn closing_for(status: TaskStatus) -> Option<ReviewStatus> {
        match status {
            TaskStatus::InReview => None,
            TaskStatus::Completed => Some(ReviewStatus::Approved),
            TaskStatus::InProgress => Some(ReviewStatus::Rejected),
        }
    }
}

impl FromStr for ReviewStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(ReviewStatus::Pending),
            "Approved" => Ok(ReviewStatus::Approved),
            "Rejected" => Ok(ReviewStatus::Rejected),
            other => Err(ParseEnumError::new("review status", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: Uuid,
    pub task_id: Uuid,
    pub reviewer_id: Uuid,
    pub status: ReviewStatus,
    pub comments: Option<String>,
    pub submitted_at: DateTime<Utc>,
    pub reviewed_at: Option<DateTime<Utc>>,
}
