//! Pending invitations and the accept/reject decision.

use std::collections::HashMap;

use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use super::projects::compose_details;
use super::{record_activity, ServiceError, ServiceResult};
use crate::auth::authorization::require_receiver;
use crate::models::activity::CreateActivity;
use crate::models::invitation::{InvitationDecision, PendingInvitation};
use crate::models::project::{Project, ProjectDetail};
use crate::models::user::User;
use crate::store::{Store, StoreError};

/// Outcome of answering an invitation
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvitationResponse {
    /// The project after joining; `None` when the invitation was rejected
    pub project: Option<ProjectDetail>,

    #[serde(skip)]
    pub message: &'static str,
}

/// Pending invitations addressed to the user, with project and sender
///
/// Invitations whose project or sender has since disappeared are skipped.
pub async fn pending_for_user(
    store: &dyn Store,
    user_id: Uuid,
) -> ServiceResult<Vec<PendingInvitation>> {
    let invitations = store.list_pending_invitations_for_user(user_id).await?;

    let mut projects: HashMap<Uuid, Project> = HashMap::new();
    for invitation in &invitations {
        if !projects.contains_key(&invitation.project_id) {
            if let Some(project) = store.find_project(invitation.project_id).await? {
                projects.insert(project.id, project);
            }
        }
    }

    let sender_ids: Vec<Uuid> = invitations.iter().map(|i| i.sender_id).collect();
    let senders: HashMap<Uuid, User> = store
        .find_users_by_ids(&sender_ids)
        .await?
        .into_iter()
        .map(|u| (u.id, u))
        .collect();

    Ok(invitations
        .iter()
        .filter_map(|invitation| {
            let project = projects.get(&invitation.project_id)?;
            let sender = senders.get(&invitation.sender_id)?;
            Some(PendingInvitation::compose(invitation, project, sender))
        })
        .collect())
}

/// Applies the receiver's decision
///
/// # Errors
///
/// - [`ServiceError::NotFound`] when the invitation does not exist (or was
///   already answered)
/// - [`ServiceError::Forbidden`] when the caller is not its receiver
pub async fn respond(
    store: &dyn Store,
    user_id: Uuid,
    invitation_id: Uuid,
    decision: InvitationDecision,
) -> ServiceResult<InvitationResponse> {
    let invitation = store
        .find_invitation(invitation_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Invitation not found"))?;
    require_receiver(&invitation, user_id)?;

    let project = store
        .resolve_invitation(invitation.id, decision)
        .await
        .map_err(|e| match e {
            StoreError::NotFound(_) => ServiceError::not_found("Invitation not found"),
            other => other.into(),
        })?;

    let Some(project) = project else {
        info!(invitation_id = %invitation.id, user_id = %user_id, "Invitation rejected");
        return Ok(InvitationResponse {
            project: None,
            message: "You have rejected the invitation.",
        });
    };

    record_activity(
        store,
        CreateActivity::new(
            user_id,
            format!("joined project \"{}\"", project.name),
            Some(project.id),
        ),
    )
    .await;

    info!(
        invitation_id = %invitation.id,
        project_id = %project.id,
        user_id = %user_id,
        "Invitation accepted"
    );

    let detail = compose_details(store, vec![project]).await?.pop();
    Ok(InvitationResponse {
        project: detail,
        message: "You have joined the project!",
    })
}
