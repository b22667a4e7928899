/// Workflow services
///
/// Each service is a set of free functions over `&dyn Store`. They carry the
/// business invariants (membership only through invitations, assignee must
/// be on the project, refresh rotation) so every storage backend behaves the
/// same. The HTTP layer only parses input and formats output.
///
/// # Modules
///
/// - `auth`: registration, login, refresh rotation, logout, sessions
/// - `projects`: project creation, listing, detail, invitations to existing
///   projects
/// - `invitations`: pending list and accept/reject
/// - `tasks`: task creation, listing and status transitions
/// - `dashboard`: aggregated counts and recent activity

use tracing::warn;

use crate::auth::authorization::AuthzError;
use crate::auth::jwt::JwtError;
use crate::auth::password::PasswordError;
use crate::models::activity::CreateActivity;
use crate::store::{Store, StoreError};

pub mod auth;
pub mod dashboard;
pub mod invitations;
pub mod projects;
pub mod tasks;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors surfaced by workflow services
///
/// The first five variants carry a client-facing message; the rest are
/// internal failures.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("password error: {0}")]
    Password(#[from] PasswordError),

    #[error("token error: {0}")]
    Jwt(#[from] JwtError),

    #[error("blocking task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl ServiceError {
    pub fn validation(message: impl Into<String>) -> Self {
        ServiceError::Validation(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ServiceError::Unauthorized(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ServiceError::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ServiceError::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        ServiceError::Conflict(message.into())
    }
}

impl From<AuthzError> for ServiceError {
    fn from(err: AuthzError) -> Self {
        match err {
            AuthzError::NotParticipant(_) => {
                ServiceError::forbidden("You are not a member of this project")
            }
            AuthzError::NotTeamLead(_) => {
                ServiceError::forbidden("Only the team lead can do this")
            }
            AuthzError::NotTaskParty(_) => {
                ServiceError::forbidden("You are not allowed to update this task")
            }
            AuthzError::NotReceiver(_) => {
                ServiceError::forbidden("This invitation is not addressed to you")
            }
            AuthzError::Store(e) => ServiceError::Store(e),
        }
    }
}

/// Appends to the activity feed once the primary write has committed
///
/// The feed is best effort: a failed write is logged and the workflow result
/// stands.
pub(crate) async fn record_activity(store: &dyn Store, input: CreateActivity) {
    let action = input.action.clone();
    if let Err(e) = store.record_activity(input).await {
        warn!(error = %e, action = %action, "Failed to record activity");
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::models::activity::{Activity, CreateActivity};
    use crate::models::invitation::{Invitation, InvitationDecision};
    use crate::models::project::{CreateProject, Priority, Project, ProjectStatus};
    use crate::models::review::{Review, ReviewStatus};
    use crate::models::session::{CreateSession, Session};
    use crate::models::task::{CreateTask, Task, TaskStatus};
    use crate::models::user::{CreateUser, User};
    use crate::store::{MemoryStore, Store, StoreError, StoreResult};
    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use uuid::Uuid;

    /// Inserts a user with a placeholder hash
    pub async fn user(store: &MemoryStore, username: &str) -> User {
        store
            .create_user(CreateUser::new(
                username,
                username,
                &format!("{username}@example.com"),
                "unused-hash".to_string(),
            ))
            .await
            .unwrap()
    }

    pub fn project_input(lead: &User, name: &str) -> CreateProject {
        CreateProject {
            name: name.to_string(),
            description: String::new(),
            priority: Priority::Medium,
            status: ProjectStatus::NotStarted,
            progress: 0,
            due_date: Utc::now(),
            team_lead: lead.id,
        }
    }

    /// Project led by `lead` whose members have all accepted
    pub async fn project_with_members(
        store: &MemoryStore,
        lead: &User,
        members: &[&User],
    ) -> Project {
        let ids: Vec<_> = members.iter().map(|m| m.id).collect();
        let (project, invitations) = store
            .create_project(project_input(lead, "Apollo"), &ids)
            .await
            .unwrap();
        for invitation in invitations {
            store
                .resolve_invitation(
                    invitation.id,
                    InvitationDecision::Accepted,
                )
                .await
                .unwrap();
        }
        store.find_project(project.id).await.unwrap().unwrap()
    }

    /// Delegates to a [`MemoryStore`] but fails every activity write
    pub struct ActivityOutage {
        pub inner: MemoryStore,
    }

    #[async_trait]
    impl Store for ActivityOutage {
        async fn ping(&self) -> StoreResult<()> {
            self.inner.ping().await
        }

        async fn create_user(&self, input: CreateUser) -> StoreResult<User> {
            self.inner.create_user(input).await
        }

        async fn find_user_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
            self.inner.find_user_by_id(id).await
        }

        async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
            self.inner.find_user_by_username(username).await
        }

        async fn user_exists(&self, username: &str, email: &str) -> StoreResult<bool> {
            self.inner.user_exists(username, email).await
        }

        async fn list_users(&self) -> StoreResult<Vec<User>> {
            self.inner.list_users().await
        }

        async fn find_users_by_ids(&self, ids: &[Uuid]) -> StoreResult<Vec<User>> {
            self.inner.find_users_by_ids(ids).await
        }

        async fn create_session(&self, input: CreateSession) -> StoreResult<Session> {
            self.inner.create_session(input).await
        }

        async fn find_session(&self, id: Uuid) -> StoreResult<Option<Session>> {
            self.inner.find_session(id).await
        }

        async fn rotate_session(&self, id: Uuid, current_hash: &str, new_hash: &str, expires_at: DateTime<Utc>) -> StoreResult<bool> {
            self.inner.rotate_session(id, current_hash, new_hash, expires_at).await
        }

        async fn revoke_session(&self, id: Uuid) -> StoreResult<bool> {
            self.inner.revoke_session(id).await
        }

        async fn list_active_sessions(&self, user_id: Uuid, now: DateTime<Utc>) -> StoreResult<Vec<Session>> {
            self.inner.list_active_sessions(user_id, now).await
        }

        async fn create_project(&self, input: CreateProject, invitees: &[Uuid]) -> StoreResult<(Project, Vec<Invitation>)> {
            self.inner.create_project(input, invitees).await
        }

        async fn find_project(&self, id: Uuid) -> StoreResult<Option<Project>> {
            self.inner.find_project(id).await
        }

        async fn list_projects_for_user(&self, user_id: Uuid) -> StoreResult<Vec<Project>> {
            self.inner.list_projects_for_user(user_id).await
        }

        async fn recent_projects_for_user(&self, user_id: Uuid, limit: usize) -> StoreResult<Vec<Project>> {
            self.inner.recent_projects_for_user(user_id, limit).await
        }

        async fn count_active_projects_for_user(&self, user_id: Uuid) -> StoreResult<i64> {
            self.inner.count_active_projects_for_user(user_id).await
        }

        async fn create_invitations(&self, project_id: Uuid, sender_id: Uuid, receivers: &[Uuid]) -> StoreResult<Vec<Invitation>> {
            self.inner.create_invitations(project_id, sender_id, receivers).await
        }

        async fn find_invitation(&self, id: Uuid) -> StoreResult<Option<Invitation>> {
            self.inner.find_invitation(id).await
        }

        async fn list_pending_invitations_for_user(&self, user_id: Uuid) -> StoreResult<Vec<Invitation>> {
            self.inner.list_pending_invitations_for_user(user_id).await
        }

        async fn list_pending_invitations_for_project(&self, project_id: Uuid) -> StoreResult<Vec<Invitation>> {
            self.inner.list_pending_invitations_for_project(project_id).await
        }

        async fn resolve_invitation(&self, id: Uuid, decision: InvitationDecision) -> StoreResult<Option<Project>> {
            self.inner.resolve_invitation(id, decision).await
        }

        async fn create_task(&self, input: CreateTask) -> StoreResult<Task> {
            self.inner.create_task(input).await
        }

        async fn find_task(&self, id: Uuid) -> StoreResult<Option<Task>> {
            self.inner.find_task(id).await
        }

        async fn list_tasks_assigned_to(&self, user_id: Uuid) -> StoreResult<Vec<Task>> {
            self.inner.list_tasks_assigned_to(user_id).await
        }

        async fn list_tasks_assigned_by(&self, user_id: Uuid) -> StoreResult<Vec<Task>> {
            self.inner.list_tasks_assigned_by(user_id).await
        }

        async fn update_task_status(&self, id: Uuid, status: TaskStatus) -> StoreResult<Option<Task>> {
            self.inner.update_task_status(id, status).await
        }

        async fn count_completed_tasks_for_user(&self, user_id: Uuid) -> StoreResult<i64> {
            self.inner.count_completed_tasks_for_user(user_id).await
        }

        async fn open_review(&self, task_id: Uuid, reviewer_id: Uuid) -> StoreResult<Review> {
            self.inner.open_review(task_id, reviewer_id).await
        }

        async fn close_reviews(&self, task_id: Uuid, status: ReviewStatus) -> StoreResult<u64> {
            self.inner.close_reviews(task_id, status).await
        }

        async fn count_pending_reviews_for_reviewer(&self, reviewer_id: Uuid) -> StoreResult<i64> {
            self.inner.count_pending_reviews_for_reviewer(reviewer_id).await
        }

        async fn record_activity(&self, _input: CreateActivity) -> StoreResult<Activity> {
            Err(StoreError::Database(sqlx::Error::PoolTimedOut))
        }

        async fn recent_activity(&self, user_ids: &[Uuid], limit: usize) -> StoreResult<Vec<Activity>> {
            self.inner.recent_activity(user_ids, limit).await
        }
    }
}
