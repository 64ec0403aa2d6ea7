/// Audit log endpoints
///
/// # Endpoints
///
/// - `GET /api/audit-log` - Organization audit log, newest first (Admin, Owner)
/// - `POST /api/audit-log` - Append a client-side audit entry (any role)

use crate::{
    app::{AppState, CurrentUser},
    error::ApiResult,
};
use axum::{extract::State, http::StatusCode, Extension, Json};
use taskdeck_shared::{
    auth::authorization::{require_roles, AUDIT_READERS},
    models::audit_log::{AuditLogEntry, NewAuditEntry},
};
use validator::Validate;

/// List audit log
///
/// # Errors
///
/// - `403 Forbidden`: Viewer role
pub async fn list_audit_log(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> ApiResult<Json<Vec<AuditLogEntry>>> {
    require_roles(user.role, AUDIT_READERS)?;

    Ok(Json(state.store.list_audit(user.organization_id).await))
}

/// Append audit entry
///
/// ```text
/// POST /api/audit-log
/// Authorization: Bearer <session_token>
/// Content-Type: application/json
///
/// { "action": "export", "details": { "format": "csv" } }
/// ```
pub async fn create_audit_entry(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(entry): Json<NewAuditEntry>,
) -> ApiResult<(StatusCode, Json<AuditLogEntry>)> {
    entry.validate()?;

    let entry = state.store.append_audit(&user, entry).await;
    tracing::debug!(action = %entry.action, user_id = %user.id, "Audit entry recorded");

    Ok((StatusCode::CREATED, Json(entry)))
}
