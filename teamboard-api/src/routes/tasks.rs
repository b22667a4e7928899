/// Task endpoints
///
/// - `POST  /api/createTask` - Create a task on one of the caller's projects
/// - `GET   /api/myTask` - Tasks assigned to the caller
/// - `GET   /api/taskInReview` - Tasks the caller assigned
/// - `PATCH /api/:taskId/status` - Move a task to another status

use axum::extract::{Path, State};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use teamboard_shared::{
    auth::middleware::AuthContext,
    models::{
        project::Priority,
        task::{TaskStatus, TaskView},
    },
    services::tasks::{self as task_service, CreateTaskInput},
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
pub struct CreateTaskRequest {
    #[validate(length(min = 1, max = 200, message = "Task title is required"))]
    pub title: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(
        default,
        deserialize_with = "teamboard_shared::models::datetime::deserialize_option"
    )]
    pub due_date: Option<DateTime<Utc>>,

    #[serde(default)]
    pub priority: Option<Priority>,

    pub project_id: Uuid,

    pub assigned_to: Uuid,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateStatusRequest {
    /// `In Progress`, `In Review` or `Completed`
    pub status: TaskStatus,
}

/// # Errors
///
/// - `404 Not Found`: No such project
/// - `403 Forbidden`: Caller is not lead or member of the project
/// - `400 Bad Request`: Assignee is not lead or member of the project
pub async fn create_task(
    State(state): State<AppState>,
    auth: AuthContext,
    ValidatedJson(req): ValidatedJson<CreateTaskRequest>,
) -> ApiResult<ApiResponse<TaskView>> {
    let task = task_service::create_task(
        state.store.as_ref(),
        auth.user_id,
        CreateTaskInput {
            project_id: req.project_id,
            title: req.title,
            description: req.description,
            due_date: req.due_date,
            priority: req.priority,
            assigned_to: req.assigned_to,
        },
    )
    .await?;

    Ok(ApiResponse::created(task, "Task created successfully"))
}

pub async fn my_tasks(
    State(state): State<AppState>,
    auth: AuthContext,
) -> ApiResult<ApiResponse<Vec<TaskView>>> {
    let tasks = task_service::my_tasks(state.store.as_ref(), auth.user_id).await?;
    Ok(ApiResponse::ok(tasks, "Fetched assigned tasks"))
}

pub async fn tasks_in_review(
    State(state): State<AppState>,
    auth: AuthContext,
) -> ApiResult<ApiResponse<Vec<TaskView>>> {
    let tasks = task_service::tasks_in_review(state.store.as_ref(), auth.user_id).await?;
    Ok(ApiResponse::ok(tasks, "Fetched tasks you assigned"))
}

/// # Errors
///
/// - `400 Bad Request`: Unknown status value or malformed task ID
/// - `404 Not Found`: No such task
/// - `403 Forbidden`: Caller is not the assignee, assignor or team lead
pub async fn update_status(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(task_id): Path<String>,
    ValidatedJson(req): ValidatedJson<UpdateStatusRequest>,
) -> ApiResult<ApiResponse<TaskView>> {
    let task_id = parse_id(&task_id, "task")?;
    let task =
        task_service::update_status(state.store.as_ref(), auth.user_id, task_id, req.status)
            .await?;
    Ok(ApiResponse::ok(task, "Task updated"))
}
