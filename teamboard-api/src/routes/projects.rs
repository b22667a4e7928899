/// Project endpoints
///
/// - `POST /api/createProject` - Create a project and invite members
/// - `GET  /api/myProjects` - Projects the caller leads or belongs to
/// - `GET  /api/projects/:id` - One project with lead and members
/// - `POST /api/projects/:id/invite` - Invite more users (team lead only)

use axum::extract::{Path, State};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use teamboard_shared::{
    auth::middleware::AuthContext,
    models::{
        invitation::Invitation,
        project::{Priority, ProjectDetail, ProjectStatus},
    },
    services::projects::{self as project_service, CreateProjectInput},
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    app::AppState,
    error::ApiResult,
    extract::{parse_id, ValidatedJson},
    response::ApiResponse,
};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectRequest {
    #[validate(length(min = 1, max = 200, message = "Project name is required"))]
    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub priority: Option<Priority>,

    #[serde(default)]
    pub status: Option<ProjectStatus>,

    #[validate(range(min = 0, max = 100, message = "Progress must be between 0 and 100"))]
    #[serde(default)]
    pub progress: Option<i32>,

    /// RFC 3339 timestamp or `YYYY-MM-DD`
    #[serde(deserialize_with = "teamboard_shared::models::datetime::deserialize")]
    pub due_date: DateTime<Utc>,

    /// Users to invite
    #[serde(default)]
    pub members: Vec<Uuid>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct InviteRequest {
    #[validate(length(min = 1, message = "At least one member is required"))]
    pub members: Vec<Uuid>,
}

/// Create a project led by the caller
///
/// Listed members receive invitations; none of them is a member until they
/// accept.
///
/// # Errors
///
/// - `400 Bad Request`: Missing name or due date, progress out of range,
///   unknown member IDs
pub async fn create_project(
    State(state): State<AppState>,
    auth: AuthContext,
    ValidatedJson(req): ValidatedJson<CreateProjectRequest>,
) -> ApiResult<ApiResponse<ProjectDetail>> {
    let project = project_service::create_project(
        state.store.as_ref(),
        auth.user_id,
        CreateProjectInput {
            name: req.name,
            description: req.description,
            priority: req.priority,
            status: req.status,
            progress: req.progress,
            due_date: req.due_date,
            members: req.members,
        },
    )
    .await?;

    Ok(ApiResponse::created(
        project,
        "Project created successfully and invitations sent",
    ))
}

pub async fn my_projects(
    State(state): State<AppState>,
    auth: AuthContext,
) -> ApiResult<ApiResponse<Vec<ProjectDetail>>> {
    let projects = project_service::list_my_projects(state.store.as_ref(), auth.user_id).await?;
    Ok(ApiResponse::ok(projects, "Fetched user's projects"))
}

/// # Errors
///
/// - `404 Not Found`: No such project
/// - `403 Forbidden`: Caller is not lead, member or pending invitee
pub async fn project_detail(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<String>,
) -> ApiResult<ApiResponse<ProjectDetail>> {
    let project_id = parse_id(&id, "project")?;
    let project =
        project_service::project_detail(state.store.as_ref(), auth.user_id, project_id).await?;
    Ok(ApiResponse::ok(project, "Project fetched"))
}

/// Invite users to an existing project
///
/// Users already on the project or already invited are skipped; the
/// response lists the invitations actually created.
pub async fn invite_members(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<InviteRequest>,
) -> ApiResult<ApiResponse<Vec<Invitation>>> {
    let project_id = parse_id(&id, "project")?;
    let invitations = project_service::invite_members(
        state.store.as_ref(),
        auth.user_id,
        project_id,
        &req.members,
    )
    .await?;

    Ok(ApiResponse::created(invitations, "Invitations sent"))
}
