/// Project model
///
/// A project has exactly one team lead (its creator, immutable) and a set of
/// members. Members are never written directly: a user joins only by
/// accepting an [`Invitation`](super::invitation::Invitation).
///
/// # Schema
///
/// ```sql
/// CREATE TABLE projects (
///     id UUID PRIMARY KEY,
///     name VARCHAR(200) NOT NULL,
///     description TEXT NOT NULL DEFAULT '',
///     priority VARCHAR(16) NOT NULL DEFAULT 'Medium',
///     status VARCHAR(16) NOT NULL DEFAULT 'Not Started',
///     progress INTEGER NOT NULL DEFAULT 0 CHECK (progress BETWEEN 0 AND 100),
///     due_date TIMESTAMPTZ NOT NULL,
///     team_lead UUID NOT NULL REFERENCES users(id),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
///
/// CREATE TABLE project_members (
///     project_id UUID NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     joined_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     PRIMARY KEY (project_id, user_id)
/// );
/// ```

use std::collections::HashMap;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::UserSummary;
use super::ParseEnumError;

/// Lowest allowed progress value
pub const MIN_PROGRESS: i32 = 0;

/// Highest allowed progress value
pub const MAX_PROGRESS: i32 = 100;

/// Priority shared by projects and tasks
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    /// Stored/display form
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }
}

impl FromStr for Priority {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Low" => Ok(Priority::Low),
            "Medium" => Ok(Priority::Medium),
            "High" => Ok(Priority::High),
            other => Err(ParseEnumError::new("priority", other)),
        }
    }
}

/// Project lifecycle status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectStatus {
    #[default]
    #[serde(rename = "Not Started")]
    NotStarted,

    #[serde(rename = "In Progress")]
    InProgress,

    Completed,

    #[serde(rename = "On Hold")]
    OnHold,
}

impl ProjectStatus {
    /// Stored/display form
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::NotStarted => "Not Started",
            ProjectStatus::InProgress => "In Progress",
            ProjectStatus::Completed => "Completed",
            ProjectStatus::OnHold => "On Hold",
        }
    }

    /// Projects count as active on the dashboard until completed
    pub fn is_active(&self) -> bool {
        !matches!(self, ProjectStatus::Completed)
    }
}

impl FromStr for ProjectStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Not Started" => Ok(ProjectStatus::NotStarted),
            "In Progress" => Ok(ProjectStatus::InProgress),
            "Completed" => Ok(ProjectStatus::Completed),
            "On Hold" => Ok(ProjectStatus::OnHold),
            other => Err(ParseEnumError::new("project status", other)),
        }
    }
}

/// How a user relates to a project
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectRole {
    /// Creator and owner of the project
    TeamLead,

    /// Joined through an accepted invitation
    Member,
}

/// Project record with its member set
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub priority: Priority,
    pub status: ProjectStatus,

    /// Completion percentage in `[0, 100]`
    pub progress: i32,

    pub due_date: DateTime<Utc>,

    /// Owner; never changes after creation
    pub team_lead: Uuid,

    /// Member IDs in join order, without duplicates
    pub members: Vec<Uuid>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Project {
    /// Returns the caller's role, or `None` if they are neither lead nor member
    pub fn role_of(&self, user_id: Uuid) -> Option<ProjectRole> {
        if self.team_lead == user_id {
            Some(ProjectRole::TeamLead)
        } else if self.members.contains(&user_id) {
            Some(ProjectRole::Member)
        } else {
            None
        }
    }

    /// Whether the user is the team lead or a member
    pub fn is_participant(&self, user_id: Uuid) -> bool {
        self.role_of(user_id).is_some()
    }

    /// Team lead followed by members
    pub fn participants(&self) -> impl Iterator<Item = Uuid> + '_ {
        std::iter::once(self.team_lead).chain(self.members.iter().copied())
    }

    /// Adds a member unless already present; returns whether the set changed
    pub fn add_member(&mut self, user_id: Uuid) -> bool {
        if self.is_participant(user_id) {
            return false;
        }
        self.members.push(user_id);
        true
    }
}

/// Input for creating a project
#[derive(Debug, Clone)]
pub struct CreateProject {
    pub name: String,
    pub description: String,
    pub priority: Priority,
    pub status: ProjectStatus,
    pub progress: i32,
    pub due_date: DateTime<Utc>,
    pub team_lead: Uuid,
}

/// Project with lead and members resolved to user summaries
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDetail {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub priority: Priority,
    pub status: ProjectStatus,
    pub progress: i32,
    pub due_date: DateTime<Utc>,
    pub team_lead: Option<UserSummary>,
    pub members: Vec<UserSummary>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProjectDetail {
    /// Builds the view, dropping member IDs that have no matching user
    pub fn compose(project: Project, users: &HashMap<Uuid, UserSummary>) -> Self {
        let members = project
            .members
            .iter()
            .filter_map(|id| users.get(id).cloned())
            .collect();

        Self {
            id: project.id,
            name: project.name,
            description: project.description,
            priority: project.priority,
            status: project.status,
            progress: project.progress,
            due_date: project.due_date,
            team_lead: users.get(&project.team_lead).cloned(),
            members,
            created_at: project.created_at,
            updated_at: project.updated_at,
        }
    }
}

/// `{id, name, teamLead}` entry on the profile page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSummary {
    pub id: Uuid,
    pub name: String,
    pub team_lead: Uuid,
}

impl From<&Project> for ProjectSummary {
    fn from(project: &Project) -> Self {
        Self {
            id: project.id,
            name: project.name.clone(),
            team_lead: project.team_lead,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(lead: Uuid) -> Project {
        let now = Utc::now();
        Project {
            id: Uuid::new_v4(),
            name: "Apollo".to_string(),
            description: String::new(),
            priority: Priority::default(),
            status: ProjectStatus::default(),
            progress: 0,
            due_date: now,
            team_lead: lead,
            members: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_status_round_trips_through_text() {
        for status in [
            ProjectStatus::NotStarted,
            ProjectStatus::InProgress,
            ProjectStatus::Completed,
            ProjectStatus::OnHold,
        ] {
            assert_eq!(status.as_str().parse::<ProjectStatus>().unwrap(), status);
        }
        assert!("not started".parse::<ProjectStatus>().is_err());
    }

    #[test]
    fn test_status_serde_uses_display_names() {
        assert_eq!(
            serde_json::to_value(ProjectStatus::OnHold).unwrap(),
            serde_json::json!("On Hold")
        );
        let parsed: ProjectStatus = serde_json::from_str("\"Not Started\"").unwrap();
        assert_eq!(parsed, ProjectStatus::NotStarted);
    }

    #[test]
    fn test_defaults() {
        assert_eq!(Priority::default(), Priority::Medium);
        assert_eq!(ProjectStatus::default(), ProjectStatus::NotStarted);
        assert!(ProjectStatus::OnHold.is_active());
        assert!(!ProjectStatus::Completed.is_active());
    }

    #[test]
    fn test_roles() {
        let lead = Uuid::new_v4();
        let member = Uuid::new_v4();
        let mut p = project(lead);
        p.add_member(member);

        assert_eq!(p.role_of(lead), Some(ProjectRole::TeamLead));
        assert_eq!(p.role_of(member), Some(ProjectRole::Member));
        assert_eq!(p.role_of(Uuid::new_v4()), None);
        assert_eq!(p.participants().collect::<Vec<_>>(), vec![lead, member]);
    }

    #[test]
    fn test_add_member_is_idempotent() {
        let lead = Uuid::new_v4();
        let member = Uuid::new_v4();
        let mut p = project(lead);

        assert!(p.add_member(member));
        assert!(!p.add_member(member));
        assert!(!p.add_member(lead));
        assert_eq!(p.members, vec![member]);
    }

    #[test]
    fn test_compose_detail() {
        let lead = Uuid::new_v4();
        let member = Uuid::new_v4();
        let ghost = Uuid::new_v4();
        let mut p = project(lead);
        p.members = vec![member, ghost];

        let users: HashMap<Uuid, UserSummary> = [lead, member]
            .into_iter()
            .map(|id| {
                (
                    id,
                    UserSummary {
                        id,
                        username: id.to_string(),
                        email: format!("{id}@example.com"),
                    },
                )
            })
            .collect();

        let detail = ProjectDetail::compose(p, &users);
        assert_eq!(detail.team_lead.unwrap().id, lead);
        assert_eq!(detail.members.len(), 1);
        assert_eq!(detail.members[0].id, member);
    }
}
