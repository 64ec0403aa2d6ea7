/// Task endpoints
///
/// All endpoints are scoped to the caller's organization. Reading is open to
/// every role; creating, updating and deleting require Admin (Owner inherits).
/// Every successful mutation appends an audit entry.
///
/// # Endpoints
///
/// - `GET /api/tasks` - List tasks
/// - `POST /api/tasks` - Create task
/// - `PUT /api/tasks/:id` - Update task
/// - `DELETE /api/tasks/:id` - Delete task

use crate::{
    app::{AppState, CurrentUser},
    error::{ApiError, ApiResult, ValidationErrorDetail},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde_json::json;
use taskdeck_shared::{
    auth::authorization::{require_roles, TASK_EDITORS, TASK_READERS},
    models::task::{Task, TaskForm, TaskPatch},
};
use uuid::Uuid;
use validator::Validate;

/// List tasks
///
/// Returns the organization's tasks in creation order.
///
/// # Endpoint
///
/// ```text
/// GET /api/tasks
/// Authorization: Bearer <session_token>
/// ```
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> ApiResult<Json<Vec<Task>>> {
    require_roles(user.role, TASK_READERS)?;

    Ok(Json(state.store.list_tasks(user.organization_id).await))
}

/// Create task
///
/// # Endpoint
///
/// ```text
/// POST /api/tasks
/// Authorization: Bearer <session_token>
/// Content-Type: application/json
///
/// {
///   "title": "Migration to v2",
///   "description": "Move the API to the new schema",
///   "category": "work",
///   "status": "todo",
///   "priority": "High"
/// }
/// ```
///
/// # Errors
///
/// - `403 Forbidden`: Viewer role
/// - `422 Unprocessable Entity`: Empty title or description
pub async fn create_task(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(form): Json<TaskForm>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    require_roles(user.role, TASK_EDITORS)?;
    form.validate()?;

    let task = state.store.create_task(&user, form).await;
    state
        .store
        .record(&user, "create", "task", task.id, Some(json!({ "title": task.title })))
        .await;

    tracing::info!(task_id = %task.id, user_id = %user.id, "Task created");

    Ok((StatusCode::CREATED, Json(task)))
}

/// Update task
///
/// Accepts any subset of the task's editable fields.
///
/// # Errors
///
/// - `400 Bad Request`: Empty patch
/// - `403 Forbidden`: Viewer role
/// - `404 Not Found`: No such task in the organization
pub async fn update_task(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(patch): Json<TaskPatch>,
) -> ApiResult<Json<Task>> {
    require_roles(user.role, TASK_EDITORS)?;

    if patch.is_empty() {
        return Err(ApiError::BadRequest("No fields to update".to_string()));
    }
    if matches!(&patch.title, Some(title) if title.trim().is_empty()) {
        return Err(ApiError::ValidationError(vec![ValidationErrorDetail {
            field: "title".to_string(),
            message: "Title is required".to_string(),
        }]));
    }

    let task = state.store.update_task(user.organization_id, id, &patch).await?;
    state
        .store
        .record(&user, "update", "task", task.id, serde_json::to_value(&patch).ok())
        .await;

    tracing::info!(task_id = %task.id, status = task.status.as_str(), "Task updated");

    Ok(Json(task))
}

/// Delete task
///
/// # Errors
///
/// - `403 Forbidden`: Viewer role
/// - `404 Not Found`: No such task in the organization
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    require_roles(user.role, TASK_EDITORS)?;

    let task = state.store.delete_task(user.organization_id, id).await?;
    state
        .store
        .record(&user, "delete", "task", task.id, Some(json!({ "title": task.title })))
        .await;

    tracing::info!(task_id = %task.id, user_id = %user.id, "Task deleted");

    Ok(StatusCode::NO_CONTENT)
}
