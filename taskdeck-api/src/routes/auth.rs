/// Authentication endpoints
///
/// Sign-in happens at the identity provider; this API only resolves the
/// session to the user record.
///
/// # Endpoints
///
/// - `GET /api/auth/me` - Current user

use crate::app::CurrentUser;
use axum::{Extension, Json};
use taskdeck_shared::models::user::User;

/// Current user
///
/// # Endpoint
///
/// ```text
/// GET /api/auth/me
/// Authorization: Bearer <session_token>
/// ```
///
/// # Response
///
/// ```json
/// {
///   "id": "uuid",
///   "email": "admin@test.com",
///   "role": "Owner",
///   "organizationId": "uuid",
///   "name": "Demo Owner"
/// }
/// ```
///
/// # Errors
///
/// - `401 Unauthorized`: Missing, invalid or expired token, or unknown user
pub async fn me(Extension(CurrentUser(user)): Extension<CurrentUser>) -> Json<User> {
    Json(user)
}
