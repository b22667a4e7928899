//! PostgreSQL store backed by a `sqlx` pool.
//!
//! Enum-valued columns are read into private `*Row` structs as text and
//! converted with `FromStr`; an unknown value surfaces as
//! [`StoreError::Corrupt`] rather than a panic.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPool;
use sqlx::{Postgres, Transaction};
use tracing::debug;
use uuid::Uuid;

use super::{Store, StoreError, StoreResult};
use crate::db::pool::health_check;
use crate::models::activity::{Activity, CreateActivity};
use crate::models::invitation::{Invitation, InvitationDecision, InvitationStatus};
use crate::models::project::{CreateProject, Project};
use crate::models::review::{Review, ReviewStatus};
use crate::models::session::{CreateSession, Session};
use crate::models::task::{CreateTask, Task, TaskStatus};
use crate::models::user::{CreateUser, User};

const PROJECT_COLUMNS: &str = "p.id, p.name, p.description, p.priority, p.status, p.progress, \
     p.due_date, p.team_lead, p.created_at, p.updated_at";

const TASK_COLUMNS: &str = "id, project_id, title, description, due_date, priority, status, \
     completed, assigned_to, assignor, created_at, updated_at";

const INVITATION_COLUMNS: &str =
    "id, project_id, sender_id, receiver_id, status, created_at, updated_at";

const REVIEW_COLUMNS: &str =
    "id, task_id, reviewer_id, status, comments, submitted_at, reviewed_at";

/// Store over a PostgreSQL pool
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Underlying pool, for shutdown and migrations
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Loads member IDs for the given project rows and builds the models
    async fn with_members(&self, rows: Vec<ProjectRow>) -> StoreResult<Vec<Project>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
        let pairs: Vec<(Uuid, Uuid)> = sqlx::query_as(
            r#"
            SELECT project_id, user_id
            FROM project_members
            WHERE project_id = ANY($1)
            ORDER BY joined_at, user_id
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let mut members: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
        for (project_id, user_id) in pairs {
            members.entry(project_id).or_default().push(user_id);
        }

        rows.into_iter()
            .map(|row| {
                let ids = members.remove(&row.id).unwrap_or_default();
                row.into_project(ids)
            })
            .collect()
    }

    async fn load_project(&self, id: Uuid) -> StoreResult<Option<Project>> {
        let row = sqlx::query_as::<_, ProjectRow>(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects p WHERE p.id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(self.with_members(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }
}

/// Maps a unique violation to [`StoreError::Conflict`] naming the field
fn map_user_insert_error(err: sqlx::Error) -> StoreError {
    if let Some(db_err) = err.as_database_error() {
        if db_err.is_unique_violation() {
            return match db_err.constraint() {
                Some("users_email_key") => StoreError::Conflict("email"),
                _ => StoreError::Conflict("username"),
            };
        }
    }
    StoreError::Database(err)
}

async fn insert_invitations(
    tx: &mut Transaction<'_, Postgres>,
    project_id: Uuid,
    sender_id: Uuid,
    receivers: &[Uuid],
) -> StoreResult<Vec<Invitation>> {
    let mut created = Vec::with_capacity(receivers.len());
    for receiver in receivers {
        let row = sqlx::query_as::<_, InvitationRow>(&format!(
            r#"
            INSERT INTO invitations (id, project_id, sender_id, receiver_id, status)
            VALUES ($1, $2, $3, $4, 'pending')
            ON CONFLICT (project_id, receiver_id) DO NOTHING
            RETURNING {INVITATION_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(project_id)
        .bind(sender_id)
        .bind(receiver)
        .fetch_optional(&mut **tx)
        .await?;

        if let Some(row) = row {
            created.push(Invitation::try_from(row)?);
        }
    }
    Ok(created)
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> StoreResult<()> {
        health_check(&self.pool).await?;
        Ok(())
    }

    async fn create_user(&self, input: CreateUser) -> StoreResult<User> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, name, username, email, password_hash)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, username, email, password_hash, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&input.name)
        .bind(&input.username)
        .bind(&input.email)
        .bind(&input.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(map_user_insert_error)
    }

    async fn find_user_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, username, email, password_hash, created_at, updated_at \
             FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, username, email, password_hash, created_at, updated_at \
             FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn user_exists(&self, username: &str, email: &str) -> StoreResult<bool> {
        let (exists,): (bool,) = sqlx::query_as(
            "SELECT EXISTS (SELECT 1 FROM users WHERE username = $1 OR email = $2)",
        )
        .bind(username)
        .bind(email)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn list_users(&self) -> StoreResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            "SELECT id, name, username, email, password_hash, created_at, updated_at \
             FROM users ORDER BY username",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }

    async fn find_users_by_ids(&self, ids: &[Uuid]) -> StoreResult<Vec<User>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let users = sqlx::query_as::<_, User>(
            "SELECT id, name, username, email, password_hash, created_at, updated_at \
             FROM users WHERE id = ANY($1)",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }

    async fn create_session(&self, input: CreateSession) -> StoreResult<Session> {
        let session = sqlx::query_as::<_, Session>(
            r#"
            INSERT INTO sessions (id, user_id, refresh_token_hash, user_agent, expires_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, refresh_token_hash, user_agent, created_at,
                      last_used_at, expires_at, revoked_at
            "#,
        )
        .bind(input.id)
        .bind(input.user_id)
        .bind(&input.refresh_token_hash)
        .bind(&input.user_agent)
        .bind(input.expires_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(session)
    }

    async fn find_session(&self, id: Uuid) -> StoreResult<Option<Session>> {
        let session = sqlx::query_as::<_, Session>(
            "SELECT id, user_id, refresh_token_hash, user_agent, created_at, last_used_at, \
             expires_at, revoked_at FROM sessions WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(session)
    }

    async fn rotate_session(
        &self,
        id: Uuid,
        current_hash: &str,
        new_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> StoreResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE sessions
            SET refresh_token_hash = $3, expires_at = $4, last_used_at = NOW()
            WHERE id = $1 AND refresh_token_hash = $2 AND revoked_at IS NULL
            "#,
        )
        .bind(id)
        .bind(current_hash)
        .bind(new_hash)
        .bind(expires_at)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn revoke_session(&self, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query(
            "UPDATE sessions SET revoked_at = NOW() WHERE id = $1 AND revoked_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn list_active_sessions(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> StoreResult<Vec<Session>> {
        let sessions = sqlx::query_as::<_, Session>(
            r#"
            SELECT id, user_id, refresh_token_hash, user_agent, created_at, last_used_at,
                   expires_at, revoked_at
            FROM sessions
            WHERE user_id = $1 AND revoked_at IS NULL AND expires_at > $2
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .bind(now)
        .fetch_all(&self.pool)
        .await?;
        Ok(sessions)
    }

    async fn create_project(
        &self,
        input: CreateProject,
        invitees: &[Uuid],
    ) -> StoreResult<(Project, Vec<Invitation>)> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, ProjectRow>(&format!(
            r#"
            INSERT INTO projects AS p
                (id, name, description, priority, status, progress, due_date, team_lead)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {PROJECT_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.priority.as_str())
        .bind(input.status.as_str())
        .bind(input.progress)
        .bind(input.due_date)
        .bind(input.team_lead)
        .fetch_one(&mut *tx)
        .await?;

        let project = row.into_project(Vec::new())?;
        let invitations = insert_invitations(&mut tx, project.id, project.team_lead, invitees).await?;

        tx.commit().await?;
        debug!(project_id = %project.id, invitations = invitations.len(), "Project created");

        Ok((project, invitations))
    }

    async fn find_project(&self, id: Uuid) -> StoreResult<Option<Project>> {
        self.load_project(id).await
    }

    async fn list_projects_for_user(&self, user_id: Uuid) -> StoreResult<Vec<Project>> {
        let rows = sqlx::query_as::<_, ProjectRow>(&format!(
            r#"
            SELECT {PROJECT_COLUMNS}
            FROM projects p
            WHERE p.team_lead = $1
               OR EXISTS (
                   SELECT 1 FROM project_members m
                   WHERE m.project_id = p.id AND m.user_id = $1
               )
            ORDER BY p.created_at DESC
            "#
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        self.with_members(rows).await
    }

    async fn recent_projects_for_user(
        &self,
        user_id: Uuid,
        limit: usize,
    ) -> StoreResult<Vec<Project>> {
        let rows = sqlx::query_as::<_, ProjectRow>(&format!(
            r#"
            SELECT {PROJECT_COLUMNS}
            FROM projects p
            WHERE p.team_lead = $1
               OR EXISTS (
                   SELECT 1 FROM project_members m
                   WHERE m.project_id = p.id AND m.user_id = $1
               )
            ORDER BY p.updated_at DESC
            LIMIT $2
            "#
        ))
        .bind(user_id)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        self.with_members(rows).await
    }

    async fn count_active_projects_for_user(&self, user_id: Uuid) -> StoreResult<i64> {
        let (count,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*)
            FROM projects p
            WHERE p.status <> 'Completed'
              AND (p.team_lead = $1
                   OR EXISTS (
                       SELECT 1 FROM project_members m
                       WHERE m.project_id = p.id AND m.user_id = $1
                   ))
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    async fn create_invitations(
        &self,
        project_id: Uuid,
        sender_id: Uuid,
        receivers: &[Uuid],
    ) -> StoreResult<Vec<Invitation>> {
        let mut tx = self.pool.begin().await?;
        let created = insert_invitations(&mut tx, project_id, sender_id, receivers).await?;
        tx.commit().await?;
        Ok(created)
    }

    async fn find_invitation(&self, id: Uuid) -> StoreResult<Option<Invitation>> {
        let row = sqlx::query_as::<_, InvitationRow>(&format!(
            "SELECT {INVITATION_COLUMNS} FROM invitations WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Invitation::try_from).transpose()
    }

    async fn list_pending_invitations_for_user(
        &self,
        user_id: Uuid,
    ) -> StoreResult<Vec<Invitation>> {
        let rows = sqlx::query_as::<_, InvitationRow>(&format!(
            r#"
            SELECT {INVITATION_COLUMNS}
            FROM invitations
            WHERE receiver_id = $1 AND status = 'pending'
            ORDER BY created_at DESC
            "#
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(Invitation::try_from).collect()
    }

    async fn list_pending_invitations_for_project(
        &self,
        project_id: Uuid,
    ) -> StoreResult<Vec<Invitation>> {
        let rows = sqlx::query_as::<_, InvitationRow>(&format!(
            r#"
            SELECT {INVITATION_COLUMNS}
            FROM invitations
            WHERE project_id = $1 AND status = 'pending'
            ORDER BY created_at
            "#
        ))
        .bind(project_id)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(Invitation::try_from).collect()
    }

    async fn resolve_invitation(
        &self,
        id: Uuid,
        decision: InvitationDecision,
    ) -> StoreResult<Option<Project>> {
        let mut tx = self.pool.begin().await?;

        // Deleting first locks the row; a concurrent responder gets no row back
        let deleted: Option<(Uuid, Uuid)> = sqlx::query_as(
            "DELETE FROM invitations WHERE id = $1 RETURNING project_id, receiver_id",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some((project_id, receiver_id)) = deleted else {
            return Err(StoreError::NotFound("invitation"));
        };

        if decision == InvitationDecision::Accepted {
            let inserted = sqlx::query(
                r#"
                INSERT INTO project_members (project_id, user_id)
                SELECT $1, $2
                WHERE NOT EXISTS (SELECT 1 FROM projects WHERE id = $1 AND team_lead = $2)
                ON CONFLICT (project_id, user_id) DO NOTHING
                "#,
            )
            .bind(project_id)
            .bind(receiver_id)
            .execute(&mut *tx)
            .await?;

            if inserted.rows_affected() > 0 {
                sqlx::query("UPDATE projects SET updated_at = NOW() WHERE id = $1")
                    .bind(project_id)
                    .execute(&mut *tx)
                    .await?;
            }
        }

        tx.commit().await?;

        match decision {
            InvitationDecision::Rejected => Ok(None),
            InvitationDecision::Accepted => self
                .load_project(project_id)
                .await?
                .map(Some)
                .ok_or(StoreError::NotFound("project")),
        }
    }

    async fn create_task(&self, input: CreateTask) -> StoreResult<Task> {
        let status = TaskStatus::default();
        let row = sqlx::query_as::<_, TaskRow>(&format!(
            r#"
            INSERT INTO tasks
                (id, project_id, title, description, due_date, priority, status,
                 completed, assigned_to, assignor)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {TASK_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(input.project_id)
        .bind(&input.title)
        .bind(&input.description)
        .bind(input.due_date)
        .bind(input.priority.as_str())
        .bind(status.as_str())
        .bind(status.is_completed())
        .bind(input.assigned_to)
        .bind(input.assignor)
        .fetch_one(&self.pool)
        .await?;
        Task::try_from(row)
    }

    async fn find_task(&self, id: Uuid) -> StoreResult<Option<Task>> {
        let row = sqlx::query_as::<_, TaskRow>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Task::try_from).transpose()
    }

    async fn list_tasks_assigned_to(&self, user_id: Uuid) -> StoreResult<Vec<Task>> {
        let rows = sqlx::query_as::<_, TaskRow>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE assigned_to = $1 ORDER BY created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(Task::try_from).collect()
    }

    async fn list_tasks_assigned_by(&self, user_id: Uuid) -> StoreResult<Vec<Task>> {
        let rows = sqlx::query_as::<_, TaskRow>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE assignor = $1 ORDER BY created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(Task::try_from).collect()
    }

    async fn update_task_status(&self, id: Uuid, status: TaskStatus) -> StoreResult<Option<Task>> {
        let row = sqlx::query_as::<_, TaskRow>(&format!(
            r#"
            UPDATE tasks
            SET status = $2, completed = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING {TASK_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(status.as_str())
        .bind(status.is_completed())
        .fetch_optional(&self.pool)
        .await?;
        row.map(Task::try_from).transpose()
    }

    async fn count_completed_tasks_for_user(&self, user_id: Uuid) -> StoreResult<i64> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM tasks WHERE assigned_to = $1 AND completed")
                .bind(user_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }

    async fn open_review(&self, task_id: Uuid, reviewer_id: Uuid) -> StoreResult<Review> {
        // A pending review can close between the insert and the read, so retry once
        for _ in 0..2 {
            let inserted = sqlx::query_as::<_, ReviewRow>(&format!(
                r#"
                INSERT INTO reviews (id, task_id, reviewer_id, status)
                VALUES ($1, $2, $3, 'Pending')
                ON CONFLICT (task_id, reviewer_id) WHERE status = 'Pending' DO NOTHING
                RETURNING {REVIEW_COLUMNS}
                "#
            ))
            .bind(Uuid::new_v4())
            .bind(task_id)
            .bind(reviewer_id)
            .fetch_optional(&self.pool)
            .await?;

            if let Some(row) = inserted {
                return Review::try_from(row);
            }

            let existing = sqlx::query_as::<_, ReviewRow>(&format!(
                r#"
                SELECT {REVIEW_COLUMNS}
                FROM reviews
                WHERE task_id = $1 AND reviewer_id = $2 AND status = 'Pending'
                "#
            ))
            .bind(task_id)
            .bind(reviewer_id)
            .fetch_optional(&self.pool)
            .await?;

            if let Some(row) = existing {
                return Review::try_from(row);
            }
        }

        Err(StoreError::NotFound("review"))
    }

    async fn close_reviews(&self, task_id: Uuid, status: ReviewStatus) -> StoreResult<u64> {
        let result = sqlx::query(
            r#"
            UPDATE reviews
            SET status = $2, reviewed_at = NOW()
            WHERE task_id = $1 AND status = 'Pending'
            "#,
        )
        .bind(task_id)
        .bind(status.as_str())
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    async fn count_pending_reviews_for_reviewer(&self, reviewer_id: Uuid) -> StoreResult<i64> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM reviews WHERE reviewer_id = $1 AND status = 'Pending'",
        )
        .bind(reviewer_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    async fn record_activity(&self, input: CreateActivity) -> StoreResult<Activity> {
        let activity = sqlx::query_as::<_, Activity>(
            r#"
            INSERT INTO activities (id, user_id, action, project_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, action, project_id, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(input.user_id)
        .bind(&input.action)
        .bind(input.project_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(activity)
    }

    async fn recent_activity(&self, user_ids: &[Uuid], limit: usize) -> StoreResult<Vec<Activity>> {
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }
        let activities = sqlx::query_as::<_, Activity>(
            r#"
            SELECT id, user_id, action, project_id, created_at
            FROM activities
            WHERE user_id = ANY($1)
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(user_ids)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;
        Ok(activities)
    }
}

#[derive(sqlx::FromRow)]
struct ProjectRow {
    id: Uuid,
    name: String,
    description: String,
    priority: String,
    status: String,
    progress: i32,
    due_date: DateTime<Utc>,
    team_lead: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ProjectRow {
    fn into_project(self, members: Vec<Uuid>) -> StoreResult<Project> {
        Ok(Project {
            id: self.id,
            name: self.name,
            description: self.description,
            priority: self.priority.parse()?,
            status: self.status.parse()?,
            progress: self.progress,
            due_date: self.due_date,
            team_lead: self.team_lead,
            members,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct InvitationRow {
    id: Uuid,
    project_id: Uuid,
    sender_id: Uuid,
    receiver_id: Uuid,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<InvitationRow> for Invitation {
    type Error = StoreError;

    fn try_from(row: InvitationRow) -> Result<Self, Self::Error> {
        Ok(Invitation {
            id: row.id,
            project_id: row.project_id,
            sender_id: row.sender_id,
            receiver_id: row.receiver_id,
            status: row.status.parse::<InvitationStatus>()?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct TaskRow {
    id: Uuid,
    project_id: Uuid,
    title: String,
    description: String,
    due_date: Option<DateTime<Utc>>,
    priority: String,
    status: String,
    completed: bool,
    assigned_to: Uuid,
    assignor: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<TaskRow> for Task {
    type Error = StoreError;

    fn try_from(row: TaskRow) -> Result<Self, Self::Error> {
        Ok(Task {
            id: row.id,
            project_id: row.project_id,
            title: row.title,
            description: row.description,
            due_date: row.due_date,
            priority: row.priority.parse()?,
            status: row.status.parse()?,
            completed: row.completed,
            assigned_to: row.assigned_to,
            assignor: row.assignor,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct ReviewRow {
    id: Uuid,
    task_id: Uuid,
    reviewer_id: Uuid,
    status: String,
    comments: Option<String>,
    submitted_at: DateTime<Utc>,
    reviewed_at: Option<DateTime<Utc>>,
}

impl TryFrom<ReviewRow> for Review {
    type Error = StoreError;

    fn try_from(row: ReviewRow) -> Result<Self, Self::Error> {
        Ok(Review {
            id: row.id,
            task_id: row.task_id,
            reviewer_id: row.reviewer_id,
            status: row.status.parse()?,
            comments: row.comments,
            submitted_at: row.submitted_at,
            reviewed_at: row.reviewed_at,
        })
    }
}
