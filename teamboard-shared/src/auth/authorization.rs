/// Project-level permission checks
///
/// # Permission model
///
/// | Action                         | Allowed for                              |
/// |--------------------------------|------------------------------------------|
/// | View project detail            | team lead, members, pending invitees     |
/// | Invite to project              | team lead                                |
/// | Create task in project         | team lead, members                       |
/// | Be assigned a task             | team lead, members                       |
/// | Change a task's status         | assignee, assignor, project team lead    |
/// | Respond to invitation          | its receiver                             |
///
/// Checks take already-loaded records; only [`require_project_visibility`]
/// needs the store, to look for a pending invitation.

use uuid::Uuid;

use crate::models::invitation::Invitation;
use crate::models::project::{Project, ProjectRole};
use crate::models::task::Task;
use crate::store::{Store, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum AuthzError {
    #[error("not a member of project {0}")]
    NotParticipant(Uuid),

    #[error("only the team lead of project {0} may do this")]
    NotTeamLead(Uuid),

    #[error("not allowed to update task {0}")]
    NotTaskParty(Uuid),

    #[error("invitation {0} is addressed to another user")]
    NotReceiver(Uuid),

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Requires the user to be the project's team lead or a member
pub fn require_participant(project: &Project, user_id: Uuid) -> Result<ProjectRole, AuthzError> {
    project
        .role_of(user_id)
        .ok_or(AuthzError::NotParticipant(project.id))
}

pub fn require_team_lead(project: &Project, user_id: Uuid) -> Result<(), AuthzError> {
    match project.role_of(user_id) {
        Some(ProjectRole::TeamLead) => Ok(()),
        _ => Err(AuthzError::NotTeamLead(project.id)),
    }
}

/// Requires the user to be a participant or to hold a pending invitation
pub async fn require_project_visibility(
    store: &dyn Store,
    project: &Project,
    user_id: Uuid,
) -> Result<(), AuthzError> {
    if project.is_participant(user_id) {
        return Ok(());
    }

    let invited = store
        .list_pending_invitations_for_project(project.id)
        .await?
        .iter()
        .any(|i| i.receiver_id == user_id);

    if invited {
        Ok(())
    } else {
        Err(AuthzError::NotParticipant(project.id))
    }
}

pub fn require_task_status_permission(
    task: &Task,
    project: &Project,
    user_id: Uuid,
) -> Result<(), AuthzError> {
    if task.can_update_status(user_id, project) {
        Ok(())
    } else {
        Err(AuthzError::NotTaskParty(task.id))
    }
}

pub fn require_receiver(invitation: &Invitation, user_id: Uuid) -> Result<(), AuthzError> {
    if invitation.receiver_id == user_id {
        Ok(())
    } else {
        Err(AuthzError::NotReceiver(invitation.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::project::{CreateProject, Priority, ProjectStatus};
    use crate::models::user::CreateUser;
    use crate::store::MemoryStore;
    use chrono::Utc;

    fn project(lead: Uuid, members: Vec<Uuid>) -> Project {
        let now = Utc::now();
        Project {
            id: Uuid::new_v4(),
            name: "Apollo".to_string(),
            description: String::new(),
            priority: Priority::Medium,
            status: ProjectStatus::NotStarted,
            progress: 0,
            due_date: now,
            team_lead: lead,
            members,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_participant_and_lead_checks() {
        let (lead, member, outsider) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let p = project(lead, vec![member]);

        assert_eq!(require_participant(&p, lead).unwrap(), ProjectRole::TeamLead);
        assert_eq!(require_participant(&p, member).unwrap(), ProjectRole::Member);
        assert!(matches!(
            require_participant(&p, outsider),
            Err(AuthzError::NotParticipant(_))
        ));

        assert!(require_team_lead(&p, lead).is_ok());
        assert!(matches!(
            require_team_lead(&p, member),
            Err(AuthzError::NotTeamLead(_))
        ));
    }

    #[tokio::test]
    async fn test_pending_invitee_can_view() {
        let store = MemoryStore::new();
        let mut ids = Vec::new();
        for name in ["lead", "invitee", "outsider"] {
            let user = store
                .create_user(CreateUser::new(name, name, &format!("{name}@x.io"), "h".into()))
                .await
                .unwrap();
            ids.push(user.id);
        }
        let (lead, invitee, outsider) = (ids[0], ids[1], ids[2]);

        let (p, _) = store
            .create_project(
                CreateProject {
                    name: "Apollo".to_string(),
                    description: String::new(),
                    priority: Priority::Medium,
                    status: ProjectStatus::NotStarted,
                    progress: 0,
                    due_date: Utc::now(),
                    team_lead: lead,
                },
                &[invitee],
            )
            .await
            .unwrap();

        assert!(require_project_visibility(&store, &p, lead).await.is_ok());
        assert!(require_project_visibility(&store, &p, invitee).await.is_ok());
        assert!(require_project_visibility(&store, &p, outsider).await.is_err());
    }
}
