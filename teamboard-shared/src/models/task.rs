/// Task model
///
/// A task belongs to exactly one project and is assigned by one user
/// (the assignor) to another (the assignee). The assignee must be the
/// project's team lead or one of its members when the task is created.
///
/// # Status
///
/// ```text
/// In Progress ⇄ In Review ⇄ Completed
/// ```
///
/// Any status may move to any other. `completed` is stored alongside the
/// status and is true exactly when the status is `Completed`.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY,
///     project_id UUID NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
///     title VARCHAR(200) NOT NULL,
///     description TEXT NOT NULL DEFAULT '',
///     due_date TIMESTAMPTZ,
///     priority VARCHAR(16) NOT NULL DEFAULT 'Medium',
///     status VARCHAR(16) NOT NULL DEFAULT 'In Progress',
///     completed BOOLEAN NOT NULL DEFAULT FALSE,
///     assigned_to UUID NOT NULL REFERENCES users(id),
///     assignor UUID NOT NULL REFERENCES users(id),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::project::{Priority, Project};
use super::user::UserSummary;
use super::ParseEnumError;

/// Task status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskStatus {
    #[default]
    #[serde(rename = "In Progress")]
    InProgress,

    #[serde(rename = "In Review")]
    InReview,

    Completed,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::InProgress => "In Progress",
            TaskStatus::InReview => "In Review",
            TaskStatus::Completed => "Completed",
        }
    }

    /// Value of the `completed` flag for this status
    pub fn is_completed(&self) -> bool {
        matches!(self, TaskStatus::Completed)
    }
}

impl FromStr for TaskStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "In Progress" => Ok(TaskStatus::InProgress),
            "In Review" => Ok(TaskStatus::InReview),
            "Completed" => Ok(TaskStatus::Completed),
            other => Err(ParseEnumError::new("task status", other)),
        }
    }
}

/// Task record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    pub project_id: Uuid,
    pub title: String,
    pub description: String,
    pub due_date: Option<DateTime<Utc>>,
    pub priority: Priority,
    pub status: TaskStatus,

    /// Mirrors `status == Completed`
    pub completed: bool,

    /// Assignee
    pub assigned_to: Uuid,

    /// User who created and assigned the task
    pub assignor: Uuid,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Whether the user may change this task's status
    ///
    /// Allowed for the assignee, the assignor and the project's team lead.
    pub fn can_update_status(&self, user_id: Uuid, project: &Project) -> bool {
        self.assigned_to == user_id || self.assignor == user_id || project.team_lead == user_id
    }
}

/// Input for creating a task
#[derive(Debug, Clone)]
pub struct CreateTask {
    pub project_id: Uuid,
    pub title: String,
    pub description: String,
    pub due_date: Option<DateTime<Utc>>,
    pub priority: Priority,
    pub assigned_to: Uuid,
    pub assignor: Uuid,
}

/// Project reference embedded in task views
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskProject {
    pub id: Uuid,
    pub name: String,
}

/// Task with its project name and assignee resolved
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskView {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub due_date: Option<DateTime<Utc>>,
    pub priority: Priority,
    pub status: TaskStatus,
    pub completed: bool,
    pub project: Option<TaskProject>,
    pub assigned_to: Option<UserSummary>,
    pub assignor: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TaskView {
    pub fn compose(task: Task, project: Option<&Project>, assignee: Option<UserSummary>) -> Self {
        Self {
            id: task.id,
            title: task.title,
            description: task.description,
            due_date: task.due_date,
            priority: task.priority,
            status: task.status,
            completed: task.completed,
            project: project.map(|p| TaskProject {
                id: p.id,
                name: p.name.clone(),
            }),
            assigned_to: assignee,
            assignor: task.assignor,
            created_at: task.created_at,
            updated_at: task.updated_at,
        }
    }
}
