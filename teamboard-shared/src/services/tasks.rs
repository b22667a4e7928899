//! Task creation, listing and status transitions.
//!
//! Status changes also drive the review read model: entering `In Review`
//! opens a pending review for the assignor, `Completed` approves it, and
//! going back to `In Progress` rejects it.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tracing::info;
use uuid::Uuid;

use super::{record_activity, ServiceError, ServiceResult};
use crate::auth::authorization::{require_participant, require_task_status_permission};
use crate::models::activity::CreateActivity;
use crate::models::project::{Priority, Project};
use crate::models::review::ReviewStatus;
use crate::models::task::{CreateTask, Task, TaskStatus, TaskView};
use crate::models::user::UserSummary;
use crate::store::Store;

#[derive(Debug, Clone)]
pub struct CreateTaskInput {
    pub project_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub priority: Option<Priority>,
    pub assigned_to: Uuid,
}

async fn compose_views(store: &dyn Store, tasks: Vec<Task>) -> ServiceResult<Vec<TaskView>> {
    let mut projects: HashMap<Uuid, Project> = HashMap::new();
    for task in &tasks {
        if !projects.contains_key(&task.project_id) {
            if let Some(project) = store.find_project(task.project_id).await? {
                projects.insert(project.id, project);
            }
        }
    }

    let assignee_ids: Vec<Uuid> = tasks.iter().map(|t| t.assigned_to).collect();
    let assignees: HashMap<Uuid, UserSummary> = store
        .find_users_by_ids(&assignee_ids)
        .await?
        .iter()
        .map(|u| (u.id, u.summary()))
        .collect();

    Ok(tasks
        .into_iter()
        .map(|task| {
            let project = projects.get(&task.project_id);
            let assignee = assignees.get(&task.assigned_to).cloned();
            TaskView::compose(task, project, assignee)
        })
        .collect())
}

async fn compose_view(store: &dyn Store, task: Task) -> ServiceResult<TaskView> {
    compose_views(store, vec![task])
        .await?
        .pop()
        .ok_or_else(|| ServiceError::not_found("Task not found"))
}

/// Creates a task on a project the caller belongs to
///
/// # Errors
///
/// - [`ServiceError::NotFound`] when the project does not exist
/// - [`ServiceError::Forbidden`] when the caller is not lead or member
/// - [`ServiceError::Validation`] when the title is blank or the assignee is
///   not lead or member
pub async fn create_task(
    store: &dyn Store,
    assignor_id: Uuid,
    input: CreateTaskInput,
) -> ServiceResult<TaskView> {
    let title = input.title.trim().to_string();
    if title.is_empty() {
        return Err(ServiceError::validation("Task title is required"));
    }

    let project = store
        .find_project(input.project_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Project not found"))?;

    require_participant(&project, assignor_id)?;

    if !project.is_participant(input.assigned_to) {
        return Err(ServiceError::validation(
            "Assignee must be the team lead or a member of the project",
        ));
    }

    let task = store
        .create_task(CreateTask {
            project_id: project.id,
            title,
            description: input.description.unwrap_or_default().trim().to_string(),
            due_date: input.due_date,
            priority: input.priority.unwrap_or_default(),
            assigned_to: input.assigned_to,
            assignor: assignor_id,
        })
        .await?;

    record_activity(
        store,
        CreateActivity::new(
            assignor_id,
            format!("created task \"{}\"", task.title),
            Some(project.id),
        ),
    )
    .await;

    info!(
        task_id = %task.id,
        project_id = %project.id,
        assigned_to = %task.assigned_to,
        "Task created"
    );
    compose_view(store, task).await
}

/// Tasks assigned to the user, newest first
pub async fn my_tasks(store: &dyn Store, user_id: Uuid) -> ServiceResult<Vec<TaskView>> {
    let tasks = store.list_tasks_assigned_to(user_id).await?;
    compose_views(store, tasks).await
}

/// Tasks the user assigned to others (or themselves), newest first
pub async fn tasks_in_review(store: &dyn Store, user_id: Uuid) -> ServiceResult<Vec<TaskView>> {
    let tasks = store.list_tasks_assigned_by(user_id).await?;
    compose_views(store, tasks).await
}

/// Moves a task to `status`
///
/// Allowed for the assignee, the assignor and the project's team lead.
pub async fn update_status(
    store: &dyn Store,
    user_id: Uuid,
    task_id: Uuid,
    status: TaskStatus,
) -> ServiceResult<TaskView> {
    let task = store
        .find_task(task_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Task not found"))?;

    let project = store
        .find_project(task.project_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Project not found"))?;

    require_task_status_permission(&task, &project, user_id)?;

    let previous = task.status;
    let updated = store
        .update_task_status(task.id, status)
        .await?
        .ok_or_else(|| ServiceError::not_found("Task not found"))?;

    match ReviewStatus::closing_for(status) {
        None => {
            store.open_review(updated.id, updated.assignor).await?;
        }
        Some(outcome) => {
            store.close_reviews(updated.id, outcome).await?;
        }
    }

    if previous != status {
        record_activity(
            store,
            CreateActivity::new(
                user_id,
                format!("moved task \"{}\" to {}", updated.title, status.as_str()),
                Some(project.id),
            ),
        )
        .await;
    }

    info!(
        task_id = %updated.id,
        from = previous.as_str(),
        to = status.as_str(),
        "Task status updated"
    );
    compose_view(store, updated).await
}
