//! In-memory store for tests and local demos.
//!
//! All state sits behind one `RwLock`, so multi-record writes are atomic by
//! holding the write guard for the whole operation. Ordered collections are
//! kept in insertion order; "newest first" queries walk them backwards.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{Store, StoreError, StoreResult};
use crate::models::activity::{Activity, CreateActivity};
use crate::models::invitation::{Invitation, InvitationDecision, InvitationStatus};
use crate::models::project::{CreateProject, Project};
use crate::models::review::{Review, ReviewStatus};
use crate::models::session::{CreateSession, Session};
use crate::models::task::{CreateTask, Task, TaskStatus};
use crate::models::user::{CreateUser, User};

/// Thread-safe in-memory store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<MemoryState>>,
}

#[derive(Debug, Default)]
struct MemoryState {
    users: HashMap<Uuid, User>,
    sessions: HashMap<Uuid, Session>,
    projects: Vec<Project>,
    invitations: Vec<Invitation>,
    tasks: Vec<Task>,
    reviews: Vec<Review>,
    activities: Vec<Activity>,
}

impl MemoryStore {
    /// Creates an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, MemoryState>> {
        self.state.read().map_err(|_| StoreError::Poisoned)
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, MemoryState>> {
        self.state.write().map_err(|_| StoreError::Poisoned)
    }
}

impl MemoryState {
    fn project_mut(&mut self, id: Uuid) -> Option<&mut Project> {
        self.projects.iter_mut().find(|p| p.id == id)
    }

    fn projects_of(&self, user_id: Uuid) -> impl DoubleEndedIterator<Item = &Project> + '_ {
        self.projects.iter().filter(move |p| p.is_participant(user_id))
    }

    fn insert_invitation(
        &mut self,
        project_id: Uuid,
        sender_id: Uuid,
        receiver_id: Uuid,
        now: DateTime<Utc>,
    ) -> Option<Invitation> {
        let exists = self
            .invitations
            .iter()
            .any(|i| i.project_id == project_id && i.receiver_id == receiver_id);
        if exists {
            return None;
        }

        let invitation = Invitation {
            id: Uuid::new_v4(),
            project_id,
            sender_id,
            receiver_id,
            status: InvitationStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        self.invitations.push(invitation.clone());
        Some(invitation)
    }
}

/// Newest-first ordering over an insertion-ordered collection
///
/// Reversing first keeps later inserts ahead when timestamps tie.
fn newest_first<'a, T: Clone + 'a>(
    items: impl DoubleEndedIterator<Item = &'a T>,
    key: impl Fn(&T) -> DateTime<Utc>,
) -> Vec<T> {
    let mut out: Vec<T> = items.rev().cloned().collect();
    out.sort_by(|a, b| key(b).cmp(&key(a)));
    out
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> StoreResult<()> {
        self.read().map(|_| ())
    }

    async fn create_user(&self, input: CreateUser) -> StoreResult<User> {
        let mut state = self.write()?;

        if state.users.values().any(|u| u.username == input.username) {
            return Err(StoreError::Conflict("username"));
        }
        if state.users.values().any(|u| u.email == input.email) {
            return Err(StoreError::Conflict("email"));
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            name: input.name,
            username: input.username,
            email: input.email,
            password_hash: input.password_hash,
            created_at: now,
            updated_at: now,
        };
        state.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        Ok(self.read()?.users.get(&id).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let state = self.read()?;
        Ok(state.users.values().find(|u| u.username == username).cloned())
    }

    async fn user_exists(&self, username: &str, email: &str) -> StoreResult<bool> {
        let state = self.read()?;
        Ok(state
            .users
            .values()
            .any(|u| u.username == username || u.email == email))
    }

    async fn list_users(&self) -> StoreResult<Vec<User>> {
        let state = self.read()?;
        let mut users: Vec<User> = state.users.values().cloned().collect();
        users.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(users)
    }

    async fn find_users_by_ids(&self, ids: &[Uuid]) -> StoreResult<Vec<User>> {
        let state = self.read()?;
        let wanted: HashSet<&Uuid> = ids.iter().collect();
        Ok(wanted
            .into_iter()
            .filter_map(|id| state.users.get(id).cloned())
            .collect())
    }

    async fn create_session(&self, input: CreateSession) -> StoreResult<Session> {
        let mut state = self.write()?;
        if state.sessions.contains_key(&input.id) {
            return Err(StoreError::Conflict("session"));
        }

        let now = Utc::now();
        let session = Session {
            id: input.id,
            user_id: input.user_id,
            refresh_token_hash: input.refresh_token_hash,
            user_agent: input.user_agent,
            created_at: now,
            last_used_at: now,
            expires_at: input.expires_at,
            revoked_at: None,
        };
        state.sessions.insert(session.id, session.clone());
        Ok(session)
    }

    async fn find_session(&self, id: Uuid) -> StoreResult<Option<Session>> {
        Ok(self.read()?.sessions.get(&id).cloned())
    }

    async fn rotate_session(
        &self,
        id: Uuid,
        current_hash: &str,
        new_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> StoreResult<bool> {
        let mut state = self.write()?;
        match state.sessions.get_mut(&id) {
            Some(session)
                if session.revoked_at.is_none() && session.refresh_token_hash == current_hash =>
            {
                session.refresh_token_hash = new_hash.to_string();
                session.expires_at = expires_at;
                session.last_used_at = Utc::now();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn revoke_session(&self, id: Uuid) -> StoreResult<bool> {
        let mut state = self.write()?;
        match state.sessions.get_mut(&id) {
            Some(session) if session.revoked_at.is_none() => {
                session.revoked_at = Some(Utc::now());
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn list_active_sessions(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> StoreResult<Vec<Session>> {
        let state = self.read()?;
        let mut sessions: Vec<Session> = state
            .sessions
            .values()
            .filter(|s| s.user_id == user_id && s.is_active(now))
            .cloned()
            .collect();
        sessions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(sessions)
    }

    async fn create_project(
        &self,
        input: CreateProject,
        invitees: &[Uuid],
    ) -> StoreResult<(Project, Vec<Invitation>)> {
        let mut state = self.write()?;

        if !state.users.contains_key(&input.team_lead) {
            return Err(StoreError::NotFound("team lead"));
        }
        if invitees.iter().any(|id| !state.users.contains_key(id)) {
            return Err(StoreError::NotFound("invitee"));
        }

        let now = Utc::now();
        let project = Project {
            id: Uuid::new_v4(),
            name: input.name,
            description: input.description,
            priority: input.priority,
            status: input.status,
            progress: input.progress,
            due_date: input.due_date,
            team_lead: input.team_lead,
            members: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        state.projects.push(project.clone());

        let invitations = invitees
            .iter()
            .filter_map(|receiver| {
                state.insert_invitation(project.id, project.team_lead, *receiver, now)
            })
            .collect();

        Ok((project, invitations))
    }

    async fn find_project(&self, id: Uuid) -> StoreResult<Option<Project>> {
        let state = self.read()?;
        Ok(state.projects.iter().find(|p| p.id == id).cloned())
    }

    async fn list_projects_for_user(&self, user_id: Uuid) -> StoreResult<Vec<Project>> {
        let state = self.read()?;
        Ok(newest_first(state.projects_of(user_id), |p| p.created_at))
    }

    async fn recent_projects_for_user(
        &self,
        user_id: Uuid,
        limit: usize,
    ) -> StoreResult<Vec<Project>> {
        let state = self.read()?;
        let mut projects = newest_first(state.projects_of(user_id), |p| p.updated_at);
        projects.truncate(limit);
        Ok(projects)
    }

    async fn count_active_projects_for_user(&self, user_id: Uuid) -> StoreResult<i64> {
        let state = self.read()?;
        let count = state
            .projects_of(user_id)
            .filter(|p| p.status.is_active())
            .count();
        Ok(count as i64)
    }

    async fn create_invitations(
        &self,
        project_id: Uuid,
        sender_id: Uuid,
        receivers: &[Uuid],
    ) -> StoreResult<Vec<Invitation>> {
        let mut state = self.write()?;
        if !state.projects.iter().any(|p| p.id == project_id) {
            return Err(StoreError::NotFound("project"));
        }

        let now = Utc::now();
        Ok(receivers
            .iter()
            .filter_map(|receiver| state.insert_invitation(project_id, sender_id, *receiver, now))
            .collect())
    }

    async fn find_invitation(&self, id: Uuid) -> StoreResult<Option<Invitation>> {
        let state = self.read()?;
        Ok(state.invitations.iter().find(|i| i.id == id).cloned())
    }

    async fn list_pending_invitations_for_user(
        &self,
        user_id: Uuid,
    ) -> StoreResult<Vec<Invitation>> {
        let state = self.read()?;
        let pending = state
            .invitations
            .iter()
            .filter(|i| i.receiver_id == user_id && i.status == InvitationStatus::Pending);
        Ok(newest_first(pending, |i| i.created_at))
    }

    async fn list_pending_invitations_for_project(
        &self,
        project_id: Uuid,
    ) -> StoreResult<Vec<Invitation>> {
        let state = self.read()?;
        Ok(state
            .invitations
            .iter()
            .filter(|i| i.project_id == project_id && i.status == InvitationStatus::Pending)
            .cloned()
            .collect())
    }

    async fn resolve_invitation(
        &self,
        id: Uuid,
        decision: InvitationDecision,
    ) -> StoreResult<Option<Project>> {
        let mut state = self.write()?;

        let index = state
            .invitations
            .iter()
            .position(|i| i.id == id)
            .ok_or(StoreError::NotFound("invitation"))?;
        let invitation = state.invitations.remove(index);

        match decision {
            InvitationDecision::Rejected => Ok(None),
            InvitationDecision::Accepted => {
                let project = state
                    .project_mut(invitation.project_id)
                    .ok_or(StoreError::NotFound("project"))?;
                if project.add_member(invitation.receiver_id) {
                    project.updated_at = Utc::now();
                }
                Ok(Some(project.clone()))
            }
        }
    }

    async fn create_task(&self, input: CreateTask) -> StoreResult<Task> {
        let mut state = self.write()?;
        if !state.projects.iter().any(|p| p.id == input.project_id) {
            return Err(StoreError::NotFound("project"));
        }

        let now = Utc::now();
        let status = TaskStatus::default();
        let task = Task {
            id: Uuid::new_v4(),
            project_id: input.project_id,
            title: input.title,
            description: input.description,
            due_date: input.due_date,
            priority: input.priority,
            status,
            completed: status.is_completed(),
            assigned_to: input.assigned_to,
            assignor: input.assignor,
            created_at: now,
            updated_at: now,
        };
        state.tasks.push(task.clone());
        Ok(task)
    }

    async fn find_task(&self, id: Uuid) -> StoreResult<Option<Task>> {
        let state = self.read()?;
        Ok(state.tasks.iter().find(|t| t.id == id).cloned())
    }

    async fn list_tasks_assigned_to(&self, user_id: Uuid) -> StoreResult<Vec<Task>> {
        let state = self.read()?;
        let tasks = state.tasks.iter().filter(|t| t.assigned_to == user_id);
        Ok(newest_first(tasks, |t| t.created_at))
    }

    async fn list_tasks_assigned_by(&self, user_id: Uuid) -> StoreResult<Vec<Task>> {
        let state = self.read()?;
        let tasks = state.tasks.iter().filter(|t| t.assignor == user_id);
        Ok(newest_first(tasks, |t| t.created_at))
    }

    async fn update_task_status(&self, id: Uuid, status: TaskStatus) -> StoreResult<Option<Task>> {
        let mut state = self.write()?;
        let Some(task) = state.tasks.iter_mut().find(|t| t.id == id) else {
            return Ok(None);
        };

        task.status = status;
        task.completed = status.is_completed();
        task.updated_at = Utc::now();
        Ok(Some(task.clone()))
    }

    async fn count_completed_tasks_for_user(&self, user_id: Uuid) -> StoreResult<i64> {
        let state = self.read()?;
        let count = state
            .tasks
            .iter()
            .filter(|t| t.assigned_to == user_id && t.completed)
            .count();
        Ok(count as i64)
    }

    async fn open_review(&self, task_id: Uuid, reviewer_id: Uuid) -> StoreResult<Review> {
        let mut state = self.write()?;

        let open = state.reviews.iter().find(|r| {
            r.task_id == task_id && r.reviewer_id == reviewer_id && r.status == ReviewStatus::Pending
        });
        if let Some(review) = open {
            return Ok(review.clone());
        }

        let review = Review {
            id: Uuid::new_v4(),
            task_id,
            reviewer_id,
            status: ReviewStatus::Pending,
            comments: None,
            submitted_at: Utc::now(),
            reviewed_at: None,
        };
        state.reviews.push(review.clone());
        Ok(review)
    }

    async fn close_reviews(&self, task_id: Uuid, status: ReviewStatus) -> StoreResult<u64> {
        let mut state = self.write()?;
        let now = Utc::now();

        let mut closed = 0;
        for review in state
            .reviews
            .iter_mut()
            .filter(|r| r.task_id == task_id && r.status == ReviewStatus::Pending)
        {
            review.status = status;
            review.reviewed_at = Some(now);
            closed += 1;
        }
        Ok(closed)
    }

    async fn count_pending_reviews_for_reviewer(&self, reviewer_id: Uuid) -> StoreResult<i64> {
        let state = self.read()?;
        let count = state
            .reviews
            .iter()
            .filter(|r| r.reviewer_id == reviewer_id && r.status == ReviewStatus::Pending)
            .count();
        Ok(count as i64)
    }

    async fn record_activity(&self, input: CreateActivity) -> StoreResult<Activity> {
        let mut state = self.write()?;
        let activity = Activity {
            id: Uuid::new_v4(),
            user_id: input.user_id,
            action: input.action,
            project_id: input.project_id,
            created_at: Utc::now(),
        };
        state.activities.push(activity.clone());
        Ok(activity)
    }

    async fn recent_activity(&self, user_ids: &[Uuid], limit: usize) -> StoreResult<Vec<Activity>> {
        let state = self.read()?;
        let actors: HashSet<&Uuid> = user_ids.iter().collect();
        let matching = state
            .activities
            .iter()
            .filter(|a| actors.contains(&a.user_id));

        let mut activities = newest_first(matching, |a| a.created_at);
        activities.truncate(limit);
        Ok(activities)
    }
}
