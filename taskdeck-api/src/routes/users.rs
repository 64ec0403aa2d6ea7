/// User endpoints
///
/// # Endpoints
///
/// - `PUT /api/users/:id` - Update own profile, security settings or preferences

use crate::{
    app::{AppState, CurrentUser},
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use taskdeck_shared::{
    auth::authorization::{require_roles, AuthzError, SECURITY_MANAGERS},
    models::user::{User, UserPatch},
};
use uuid::Uuid;
use validator::Validate;

/// Update user
///
/// Users may only update themselves. Changing `mfaEnabled` or
/// `sessionTimeout` additionally requires the Owner role. Unknown fields,
/// including `email` and `role`, are rejected.
///
/// # Endpoint
///
/// ```text
/// PUT /api/users/:id
/// Authorization: Bearer <session_token>
/// Content-Type: application/json
///
/// { "name": "Jane Doe" }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Empty patch
/// - `403 Forbidden`: Another user's record, or security fields without Owner role
/// - `422 Unprocessable Entity`: Field out of range or unknown field
pub async fn update_user(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(patch): Json<UserPatch>,
) -> ApiResult<Json<User>> {
    if id != user.id {
        return Err(AuthzError::NotAuthorized.into());
    }
    if patch.is_empty() {
        return Err(ApiError::BadRequest("No fields to update".to_string()));
    }
    if patch.touches_security() {
        require_roles(user.role, SECURITY_MANAGERS)?;
    }

    patch.validate()?;

    let updated = state.store.update_user(user.id, &patch).await?;
    state
        .store
        .record(&user, "update", "user", user.id, serde_json::to_value(&patch).ok())
        .await;

    tracing::info!(user_id = %user.id, security = patch.touches_security(), "User updated");

    Ok(Json(updated))
}
