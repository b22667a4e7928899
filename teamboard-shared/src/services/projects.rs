//! Project creation, listing, detail and invitations to existing projects.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use tracing::info;
use uuid::Uuid;

use super::{record_activity, ServiceError, ServiceResult};
use crate::auth::authorization::{require_project_visibility, require_team_lead};
use crate::models::activity::CreateActivity;
use crate::models::invitation::Invitation;
use crate::models::project::{
    CreateProject, Priority, Project, ProjectDetail, ProjectStatus, MAX_PROGRESS, MIN_PROGRESS,
};
use crate::models::user::UserSummary;
use crate::store::Store;

#[derive(Debug, Clone)]
pub struct CreateProjectInput {
    pub name: String,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub status: Option<ProjectStatus>,
    pub progress: Option<i32>,
    pub due_date: DateTime<Utc>,

    /// Users to invite; the creator is skipped if listed
    pub members: Vec<Uuid>,
}

/// Distinct IDs in first-seen order, without `exclude`
fn distinct_except(ids: &[Uuid], exclude: Uuid) -> Vec<Uuid> {
    let mut seen = HashSet::new();
    ids.iter()
        .copied()
        .filter(|id| *id != exclude && seen.insert(*id))
        .collect()
}

/// Fails with a validation error naming any ID that is not a user
async fn require_known_users(store: &dyn Store, ids: &[Uuid]) -> ServiceResult<()> {
    if ids.is_empty() {
        return Ok(());
    }

    let found: HashSet<Uuid> = store
        .find_users_by_ids(ids)
        .await?
        .into_iter()
        .map(|u| u.id)
        .collect();

    let unknown: Vec<String> = ids
        .iter()
        .filter(|id| !found.contains(id))
        .map(Uuid::to_string)
        .collect();

    if unknown.is_empty() {
        Ok(())
    } else {
        Err(ServiceError::validation(format!(
            "Unknown user(s): {}",
            unknown.join(", ")
        )))
    }
}

/// Resolves leads and members of several projects with one user lookup
pub(crate) async fn compose_details(
    store: &dyn Store,
    projects: Vec<Project>,
) -> ServiceResult<Vec<ProjectDetail>> {
    let ids: Vec<Uuid> = projects
        .iter()
        .flat_map(|p| p.participants())
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();

    let users: HashMap<Uuid, UserSummary> = store
        .find_users_by_ids(&ids)
        .await?
        .iter()
        .map(|u| (u.id, u.summary()))
        .collect();

    Ok(projects
        .into_iter()
        .map(|p| ProjectDetail::compose(p, &users))
        .collect())
}

async fn compose_detail(store: &dyn Store, project: Project) -> ServiceResult<ProjectDetail> {
    compose_details(store, vec![project])
        .await?
        .pop()
        .ok_or_else(|| ServiceError::not_found("Project not found"))
}

/// Creates a project led by `lead_id` and invites the listed members
///
/// Nothing is written when any invitee is unknown.
pub async fn create_project(
    store: &dyn Store,
    lead_id: Uuid,
    input: CreateProjectInput,
) -> ServiceResult<ProjectDetail> {
    let name = input.name.trim().to_string();
    if name.is_empty() {
        return Err(ServiceError::validation("Project name is required"));
    }

    let progress = input.progress.unwrap_or(MIN_PROGRESS);
    if !(MIN_PROGRESS..=MAX_PROGRESS).contains(&progress) {
        return Err(ServiceError::validation(
            "Progress must be between 0 and 100",
        ));
    }

    let invitees = distinct_except(&input.members, lead_id);
    require_known_users(store, &invitees).await?;

    let (project, invitations) = store
        .create_project(
            CreateProject {
                name,
                description: input.description.unwrap_or_default().trim().to_string(),
                priority: input.priority.unwrap_or_default(),
                status: input.status.unwrap_or_default(),
                progress,
                due_date: input.due_date,
                team_lead: lead_id,
            },
            &invitees,
        )
        .await?;

    record_activity(
        store,
        CreateActivity::new(
            lead_id,
            format!("created project \"{}\"", project.name),
            Some(project.id),
        ),
    )
    .await;

    info!(
        project_id = %project.id,
        team_lead = %lead_id,
        invitations = invitations.len(),
        "Project created"
    );
    compose_detail(store, project).await
}

/// Projects the user leads or belongs to, newest first
pub async fn list_my_projects(
    store: &dyn Store,
    user_id: Uuid,
) -> ServiceResult<Vec<ProjectDetail>> {
    let projects = store.list_projects_for_user(user_id).await?;
    compose_details(store, projects).await
}

/// One project, visible to its lead, members and pending invitees
pub async fn project_detail(
    store: &dyn Store,
    user_id: Uuid,
    project_id: Uuid,
) -> ServiceResult<ProjectDetail> {
    let project = store
        .find_project(project_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Project not found"))?;

    require_project_visibility(store, &project, user_id).await?;
    compose_detail(store, project).await
}

/// Invites users to an existing project; team lead only
///
/// Users who are already on the project or already hold a pending
/// invitation are skipped. Returns the invitations actually created.
pub async fn invite_members(
    store: &dyn Store,
    user_id: Uuid,
    project_id: Uuid,
    members: &[Uuid],
) -> ServiceResult<Vec<Invitation>> {
    let project = store
        .find_project(project_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Project not found"))?;
    require_team_lead(&project, user_id)?;

    let candidates = distinct_except(members, project.team_lead);
    require_known_users(store, &candidates).await?;

    let invitees: Vec<Uuid> = candidates
        .into_iter()
        .filter(|id| !project.is_participant(*id))
        .collect();

    let created = store
        .create_invitations(project.id, user_id, &invitees)
        .await?;

    info!(project_id = %project.id, invitations = created.len(), "Members invited");
    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::{project_with_members, user};
    use crate::store::MemoryStore;

    fn input(name: &str, members: Vec<Uuid>) -> CreateProjectInput {
        CreateProjectInput {
            name: name.to_string(),
            description: None,
            priority: None,
            status: None,
            progress: None,
            due_date: Utc::now(),
            members,
        }
    }

    #[tokio::test]
    async fn test_create_applies_defaults_and_invites() {
        let store = MemoryStore::new();
        let alice = user(&store, "alice").await;
        let bob = user(&store, "bob").await;

        let project = create_project(
            &store,
            alice.id,
            input("  Apollo  ", vec![bob.id, bob.id, alice.id]),
        )
        .await
        .unwrap();

        assert_eq!(project.name, "Apollo");
        assert_eq!(project.priority, Priority::Medium);
        assert_eq!(project.status, ProjectStatus::NotStarted);
        assert_eq!(project.progress, 0);
        assert_eq!(project.team_lead.as_ref().map(|u| u.id), Some(alice.id));
        assert!(project.members.is_empty());

        let pending = store.list_pending_invitations_for_user(bob.id).await.unwrap();
        assert_eq!(pending.len(), 1);
        assert!(store
            .list_pending_invitations_for_user(alice.id)
            .await
            .unwrap()
            .is_empty());

        let activity = store.recent_activity(&[alice.id], 5).await.unwrap();
        assert_eq!(activity[0].action, "created project \"Apollo\"");
    }

    #[tokio::test]
    async fn test_create_with_unknown_member_writes_nothing() {
        let store = MemoryStore::new();
        let alice = user(&store, "alice").await;

        let err = create_project(&store, alice.id, input("Apollo", vec![Uuid::new_v4()]))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
        assert!(store.list_projects_for_user(alice.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_validates_fields() {
        let store = MemoryStore::new();
        let alice = user(&store, "alice").await;

        let blank = create_project(&store, alice.id, input("   ", vec![])).await;
        assert!(matches!(blank, Err(ServiceError::Validation(_))));

        let mut too_far = input("Apollo", vec![]);
        too_far.progress = Some(101);
        let result = create_project(&store, alice.id, too_far).await;
        assert!(matches!(result, Err(ServiceError::Validation(_))));
    }

    #[tokio::test]
    async fn test_detail_visibility() {
        let store = MemoryStore::new();
        let alice = user(&store, "alice").await;
        let bob = user(&store, "bob").await;
        let carol = user(&store, "carol").await;
        let dave = user(&store, "dave").await;

        let project = project_with_members(&store, &alice, &[&bob]).await;
        store
            .create_invitations(project.id, alice.id, &[carol.id])
            .await
            .unwrap();

        for viewer in [&alice, &bob, &carol] {
            let detail = project_detail(&store, viewer.id, project.id).await.unwrap();
            assert_eq!(detail.members.len(), 1);
            assert_eq!(detail.members[0].username, "bob");
        }

        assert!(matches!(
            project_detail(&store, dave.id, project.id).await,
            Err(ServiceError::Forbidden(_))
        ));
        assert!(matches!(
            project_detail(&store, alice.id, Uuid::new_v4()).await,
            Err(ServiceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_invite_members_skips_existing() {
        let store = MemoryStore::new();
        let alice = user(&store, "alice").await;
        let bob = user(&store, "bob").await;
        let carol = user(&store, "carol").await;
        let dave = user(&store, "dave").await;
        let project = project_with_members(&store, &alice, &[&bob]).await;

        let created = invite_members(&store, alice.id, project.id, &[bob.id, carol.id, alice.id])
            .await
            .unwrap();
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].receiver_id, carol.id);

        let again = invite_members(&store, alice.id, project.id, &[carol.id])
            .await
            .unwrap();
        assert!(again.is_empty());

        assert!(matches!(
            invite_members(&store, bob.id, project.id, &[dave.id]).await,
            Err(ServiceError::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn test_list_my_projects_includes_led_and_joined() {
        let store = MemoryStore::new();
        let alice = user(&store, "alice").await;
        let bob = user(&store, "bob").await;

        project_with_members(&store, &alice, &[&bob]).await;
        create_project(&store, bob.id, input("Gemini", vec![]))
            .await
            .unwrap();

        let bobs = list_my_projects(&store, bob.id).await.unwrap();
        let names: Vec<&str> = bobs.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Gemini", "Apollo"]);

        assert_eq!(list_my_projects(&store, alice.id).await.unwrap().len(), 1);
    }
}
