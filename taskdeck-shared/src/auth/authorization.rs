/// Role-based authorization policy
///
/// Every protected action or route declares the set of roles permitted to use
/// it. [`authorize`] decides whether a role may proceed.
///
/// # Rules
///
/// 1. A role listed in the permitted set is allowed
/// 2. **Owner** is allowed for any permitted set
/// 3. **Admin** is allowed whenever **Viewer** is permitted
/// 4. Everything else is denied
///
/// Rule 3 is the only inheritance Admin gets: a set containing only `Owner`
/// still denies Admin. The hierarchy is therefore not a clean lattice
/// (Owner ⊇ Admin ⊇ Viewer for Viewer resources, but Admin ⊉ Owner-only
/// resources).
///
/// # Example
///
/// ```
/// use taskdeck_shared::auth::authorization::{authorize, check_access, AccessDecision, Denial};
/// use taskdeck_shared::models::user::UserRole;
///
/// assert!(authorize(UserRole::Owner, &[UserRole::Viewer]));
/// assert!(authorize(UserRole::Admin, &[UserRole::Viewer]));
/// assert!(!authorize(UserRole::Admin, &[UserRole::Owner]));
///
/// assert_eq!(
///     check_access(None, &[UserRole::Viewer]),
///     AccessDecision::Deny(Denial::Unauthenticated)
/// );
/// ```

use crate::models::user::UserRole;

/// Error type for authorization checks
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthzError {
    /// No authenticated user
    #[error("Not authenticated")]
    Unauthenticated,

    /// User's role is not permitted
    #[error("Insufficient permissions: role {role} is not permitted (requires one of {permitted:?})")]
    Forbidden {
        role: UserRole,
        permitted: Vec<UserRole>,
    },

    /// Resource belongs to another user or organization
    #[error("Not authorized to access this resource")]
    NotAuthorized,
}

/// Why access was denied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Denial {
    /// No user: send them to the login page
    Unauthenticated,

    /// User present but role not permitted: send them to the landing page
    Forbidden,
}

/// Outcome of an access check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    Allow,
    Deny(Denial),
}

impl AccessDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, AccessDecision::Allow)
    }
}

/// Decides whether `role` may use something open to `permitted`
pub fn authorize(role: UserRole, permitted: &[UserRole]) -> bool {
    if permitted.contains(&role) {
        return true;
    }

    match role {
        UserRole::Owner => true,
        UserRole::Admin => permitted.contains(&UserRole::Viewer),
        UserRole::Viewer => false,
    }
}

/// Full access check including the missing-user case
///
/// # Arguments
///
/// * `role` - Role of the current user, `None` when nobody is signed in
/// * `permitted` - Roles the action or route is declared for
pub fn check_access(role: Option<UserRole>, permitted: &[UserRole]) -> AccessDecision {
    match role {
        None => AccessDecision::Deny(Denial::Unauthenticated),
        Some(role) if authorize(role, permitted) => AccessDecision::Allow,
        Some(_) => AccessDecision::Deny(Denial::Forbidden),
    }
}

/// Same as [`authorize`] but as a `Result`, for use with `?`
///
/// # Errors
///
/// Returns `AuthzError::Forbidden` if the role is not permitted
pub fn require_roles(role: UserRole, permitted: &[UserRole]) -> Result<(), AuthzError> {
    if !authorize(role, permitted) {
        return Err(AuthzError::Forbidden {
            role,
            permitted: permitted.to_vec(),
        });
    }

    Ok(())
}

/// Roles allowed to read tasks
pub const TASK_READERS: &[UserRole] = &[UserRole::Viewer];

/// Roles allowed to create, update and delete tasks
pub const TASK_EDITORS: &[UserRole] = &[UserRole::Admin];

/// Roles allowed to read the audit log
pub const AUDIT_READERS: &[UserRole] = &[UserRole::Admin, UserRole::Owner];

/// Roles allowed to view and edit security settings
pub const SECURITY_MANAGERS: &[UserRole] = &[UserRole::Owner];
