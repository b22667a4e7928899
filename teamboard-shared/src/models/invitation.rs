/// Invitation model
///
/// Invitations are the only path into a project's member set.
///
/// # State machine
///
/// ```text
/// pending ──accept──▶ accepted
///    │
///    └────reject───▶ rejected
/// ```
///
/// Both outcomes are terminal and the record is deleted once the receiver
/// responds, so a stored invitation is always `pending` in practice. At most
/// one invitation exists per `(project_id, receiver_id)`.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE invitations (
///     id UUID PRIMARY KEY,
///     project_id UUID NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
///     sender_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     receiver_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     status VARCHAR(16) NOT NULL DEFAULT 'pending',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     UNIQUE (project_id, receiver_id)
/// );
/// ```

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::project::Project;
use super::user::User;
use super::ParseEnumError;

/// Invitation state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvitationStatus {
    #[default]
    Pending,
    Accepted,
    Rejected,
}

impl InvitationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvitationStatus::Pending => "pending",
            InvitationStatus::Accepted => "accepted",
            InvitationStatus::Rejected => "rejected",
        }
    }

    /// Accepted and rejected are terminal
    pub fn is_terminal(&self) -> bool {
        !matches!(self, InvitationStatus::Pending)
    }

    /// Only `pending` may move, and only to a terminal state
    pub fn can_transition_to(&self, next: InvitationStatus) -> bool {
        matches!(
            (self, next),
            (InvitationStatus::Pending, InvitationStatus::Accepted)
                | (InvitationStatus::Pending, InvitationStatus::Rejected)
        )
    }
}

impl FromStr for InvitationStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(InvitationStatus::Pending),
            "accepted" => Ok(InvitationStatus::Accepted),
            "rejected" => Ok(InvitationStatus::Rejected),
            other => Err(ParseEnumError::new("invitation status", other)),
        }
    }
}

/// A receiver's answer to an invitation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvitationDecision {
    Accepted,
    Rejected,
}

impl InvitationDecision {
    /// Status the invitation ends in
    pub fn status(&self) -> InvitationStatus {
        match self {
            InvitationDecision::Accepted => InvitationStatus::Accepted,
            InvitationDecision::Rejected => InvitationStatus::Rejected,
        }
    }
}

/// Invitation record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Invitation {
    pub id: Uuid,
    pub project_id: Uuid,

    /// Team lead who sent the invitation
    pub sender_id: Uuid,

    /// User being invited
    pub receiver_id: Uuid,

    pub status: InvitationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating an invitation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateInvitation {
    pub project_id: Uuid,
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
}

/// Project fields shown alongside a pending invitation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvitationProject {
    pub id: Uuid,
    pub name: String,
    pub due_date: DateTime<Utc>,
    pub description: String,
}

/// Sender fields shown alongside a pending invitation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvitationSender {
    pub id: Uuid,
    pub name: String,
}

/// Pending invitation as listed for its receiver
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingInvitation {
    pub id: Uuid,
    pub status: InvitationStatus,
    pub project: InvitationProject,
    pub sender: InvitationSender,
    pub created_at: DateTime<Utc>,
}

impl PendingInvitation {
    pub fn compose(invitation: &Invitation, project: &Project, sender: &User) -> Self {
        Self {
            id: invitation.id,
            status: invitation.status,
            project: InvitationProject {
                id: project.id,
                name: project.name.clone(),
                due_date: project.due_date,
                description: project.description.clone(),
            },
            sender: InvitationSender {
                id: sender.id,
                name: sender.name.clone(),
            },
            created_at: invitation.created_at,
        }
    }
}
