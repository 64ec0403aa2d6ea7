/// Authentication and authorization utilities
///
/// # Modules
///
/// - [`jwt`]: Session token validation (HS256)
/// - [`middleware`]: Bearer authentication middleware for Axum
/// - [`authorization`]: Role-based access policy
///
/// # Example
///
/// ```
/// use taskdeck_shared::auth::authorization::authorize;
/// use taskdeck_shared::models::user::UserRole;
///
/// assert!(authorize(UserRole::Owner, &[UserRole::Admin]));
/// ```

pub mod authorization;
pub mod jwt;
pub mod middleware;
