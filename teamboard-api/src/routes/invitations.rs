/// Invitation endpoints
///
/// - `GET  /api/requests` - Pending invitations addressed to the caller
/// - `POST /api/respond` - Accept or reject one of them

use axum::extract::State;
use serde::Deserialize;
use teamboard_shared::{
    auth::middleware::AuthContext,
    models::invitation::{InvitationDecision, PendingInvitation},
    services::invitations::{self as invitation_service, InvitationResponse},
};
use uuid::Uuid;
use validator::Validate;

use crate::{app::AppState, error::ApiResult, extract::ValidatedJson, response::ApiResponse};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RespondRequest {
    pub invitation_id: Uuid,

    /// `accepted` or `rejected`
    pub response: InvitationDecision,
}

pub async fn requests(
    State(state): State<AppState>,
    auth: AuthContext,
) -> ApiResult<ApiResponse<Vec<PendingInvitation>>> {
    let invitations =
        invitation_service::pending_for_user(state.store.as_ref(), auth.user_id).await?;
    Ok(ApiResponse::ok(invitations, "Pending invitations"))
}

/// Answer an invitation
///
/// Returns `{ "project": ... }` with the joined project, or
/// `{ "project": null }` after a rejection.
///
/// # Errors
///
/// - `400 Bad Request`: `response` is not `accepted` or `rejected`
/// - `404 Not Found`: No such pending invitation
/// - `403 Forbidden`: The invitation is addressed to someone else
pub async fn respond(
    State(state): State<AppState>,
    auth: AuthContext,
    ValidatedJson(req): ValidatedJson<RespondRequest>,
) -> ApiResult<ApiResponse<InvitationResponse>> {
    let outcome = invitation_service::respond(
        state.store.as_ref(),
        auth.user_id,
        req.invitation_id,
        req.response,
    )
    .await?;

    let message = outcome.message;
    Ok(ApiResponse::ok(outcome, message))
}
