/// Persistence port
///
/// Every workflow service talks to storage through the [`Store`] trait, so the
/// same invariants hold whether records live in PostgreSQL ([`PgStore`]) or in
/// process memory ([`MemoryStore`], used by tests and local demos).
///
/// # Atomicity
///
/// Two writes span several records and must land together:
///
/// - [`Store::create_project`]: the project and its invitations
/// - [`Store::resolve_invitation`]: the membership change and the invitation
///   deletion
///
/// `PgStore` runs each inside one transaction; `MemoryStore` holds its write
/// lock for the whole operation. Everything else is a single-record write.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use teamboard_shared::store::{MemoryStore, Store};
///
/// # async fn example() -> Result<(), teamboard_shared::store::StoreError> {
/// let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
/// store.ping().await?;
/// # Ok(())
/// # }
/// ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::activity::{Activity, CreateActivity};
use crate::models::invitation::{Invitation, InvitationDecision};
use crate::models::project::{CreateProject, Project};
use crate::models::review::{Review, ReviewStatus};
use crate::models::session::{CreateSession, Session};
use crate::models::task::{CreateTask, Task, TaskStatus};
use crate::models::user::{CreateUser, User};
use crate::models::ParseEnumError;

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors returned by store implementations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A unique constraint was violated; names the conflicting field
    #[error("{0} already exists")]
    Conflict(&'static str),

    /// The record targeted by a write does not exist
    #[error("{0} not found")]
    NotFound(&'static str),

    /// A stored value could not be mapped back to a model
    #[error("corrupt record: {0}")]
    Corrupt(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The in-memory state lock was poisoned by a panicking writer
    #[error("store lock poisoned")]
    Poisoned,
}

impl From<ParseEnumError> for StoreError {
    fn from(err: ParseEnumError) -> Self {
        StoreError::Corrupt(err.to_string())
    }
}

/// Storage contract for users, sessions, projects, invitations, tasks and
/// the dashboard read models
#[async_trait]
pub trait Store: Send + Sync {
    /// Verifies the backing storage is reachable
    async fn ping(&self) -> StoreResult<()>;

    // ----- users -----

    /// Inserts a user
    ///
    /// # Errors
    ///
    /// [`StoreError::Conflict`] when the username or email is taken.
    async fn create_user(&self, input: CreateUser) -> StoreResult<User>;

    async fn find_user_by_id(&self, id: Uuid) -> StoreResult<Option<User>>;

    /// Looks up a user by normalized username
    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>>;

    /// Whether any user holds the normalized username or email
    async fn user_exists(&self, username: &str, email: &str) -> StoreResult<bool>;

    /// All users ordered by username
    async fn list_users(&self) -> StoreResult<Vec<User>>;

    /// Users with the given IDs; unknown IDs are skipped
    async fn find_users_by_ids(&self, ids: &[Uuid]) -> StoreResult<Vec<User>>;

    // ----- sessions -----

    async fn create_session(&self, input: CreateSession) -> StoreResult<Session>;

    async fn find_session(&self, id: Uuid) -> StoreResult<Option<Session>>;

    /// Swaps the refresh hash if the session is unrevoked and still holds
    /// `current_hash`
    ///
    /// Returns `false` when another rotation or a revocation won the race.
    async fn rotate_session(
        &self,
        id: Uuid,
        current_hash: &str,
        new_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> StoreResult<bool>;

    /// Marks a session revoked; returns `false` if it was already revoked or
    /// does not exist
    async fn revoke_session(&self, id: Uuid) -> StoreResult<bool>;

    /// Unrevoked, unexpired sessions of a user, newest first
    async fn list_active_sessions(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> StoreResult<Vec<Session>>;

    // ----- projects -----

    /// Inserts a project and one pending invitation per invitee atomically
    ///
    /// Invitees must be distinct, existing users other than the team lead;
    /// the caller validates this before writing.
    async fn create_project(
        &self,
        input: CreateProject,
        invitees: &[Uuid],
    ) -> StoreResult<(Project, Vec<Invitation>)>;

    async fn find_project(&self, id: Uuid) -> StoreResult<Option<Project>>;

    /// Projects where the user is lead or member, newest first
    async fn list_projects_for_user(&self, user_id: Uuid) -> StoreResult<Vec<Project>>;

    /// Most recently updated projects of the user
    async fn recent_projects_for_user(&self, user_id: Uuid, limit: usize)
        -> StoreResult<Vec<Project>>;

    /// Projects of the user whose status is not `Completed`
    async fn count_active_projects_for_user(&self, user_id: Uuid) -> StoreResult<i64>;

    // ----- invitations -----

    /// Creates pending invitations, skipping receivers that already hold one
    /// for this project
    async fn create_invitations(
        &self,
        project_id: Uuid,
        sender_id: Uuid,
        receivers: &[Uuid],
    ) -> StoreResult<Vec<Invitation>>;

    async fn find_invitation(&self, id: Uuid) -> StoreResult<Option<Invitation>>;

    /// Pending invitations addressed to the user, newest first
    async fn list_pending_invitations_for_user(&self, user_id: Uuid)
        -> StoreResult<Vec<Invitation>>;

    /// Pending invitations of a project
    async fn list_pending_invitations_for_project(
        &self,
        project_id: Uuid,
    ) -> StoreResult<Vec<Invitation>>;

    /// Applies the receiver's decision and deletes the invitation atomically
    ///
    /// On acceptance the receiver joins the member set (a no-op if already
    /// present) and the updated project is returned; on rejection nothing but
    /// the invitation changes and `None` is returned.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] when the invitation no longer exists.
    async fn resolve_invitation(
        &self,
        id: Uuid,
        decision: InvitationDecision,
    ) -> StoreResult<Option<Project>>;

    // ----- tasks -----

    async fn create_task(&self, input: CreateTask) -> StoreResult<Task>;

    async fn find_task(&self, id: Uuid) -> StoreResult<Option<Task>>;

    /// Tasks assigned to the user, newest first
    async fn list_tasks_assigned_to(&self, user_id: Uuid) -> StoreResult<Vec<Task>>;

    /// Tasks the user assigned, newest first
    async fn list_tasks_assigned_by(&self, user_id: Uuid) -> StoreResult<Vec<Task>>;

    /// Sets the status and keeps `completed` in step with it
    async fn update_task_status(&self, id: Uuid, status: TaskStatus) -> StoreResult<Option<Task>>;

    async fn count_completed_tasks_for_user(&self, user_id: Uuid) -> StoreResult<i64>;

    // ----- reviews -----

    /// Returns the task's open review for `reviewer_id`, opening one if none
    /// is pending
    async fn open_review(&self, task_id: Uuid, reviewer_id: Uuid) -> StoreResult<Review>;

    /// Closes every pending review of the task with `status`; returns how
    /// many were closed
    async fn close_reviews(&self, task_id: Uuid, status: ReviewStatus) -> StoreResult<u64>;

    async fn count_pending_reviews_for_reviewer(&self, reviewer_id: Uuid) -> StoreResult<i64>;

    // ----- activity -----

    async fn record_activity(&self, input: CreateActivity) -> StoreResult<Activity>;

    /// Latest activities by any of the given users
    async fn recent_activity(&self, user_ids: &[Uuid], limit: usize)
        -> StoreResult<Vec<Activity>>;
}
