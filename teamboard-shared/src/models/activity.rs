/// Activity feed entries
///
/// Workflow services append a short action line whenever something visible
/// to a team happens (project created, member joined, task moved). The
/// dashboard shows the most recent entries from the caller's team.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Stored activity entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: Uuid,

    /// Actor
    pub user_id: Uuid,

    /// Human-readable action, e.g. `created project "Apollo"`
    pub action: String,

    pub project_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateActivity {
    pub user_id: Uuid,
    pub action: String,
    pub project_id: Option<Uuid>,
}

impl CreateActivity {
    pub fn new(user_id: Uuid, action: impl Into<String>, project_id: Option<Uuid>) -> Self {
        Self {
            user_id,
            action: action.into(),
            project_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityActor {
    pub id: Uuid,
    pub name: String,
}

/// Activity entry with the actor's name resolved
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityView {
    pub id: Uuid,
    pub user: ActivityActor,
    pub action: String,
    pub project_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl ActivityView {
    pub fn compose(activity: Activity, actor_name: String) -> Self {
        Self {
            id: activity.id,
            user: ActivityActor {
                id: activity.user_id,
                name: actor_name,
            },
            action: activity.action,
            project_id: activity.project_id,
            created_at: activity.created_at,
        }
    }
}
