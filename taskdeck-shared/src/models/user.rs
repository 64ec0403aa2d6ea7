/// User model
///
/// Users are owned by the identity provider and mirrored by the API. Each user
/// belongs to exactly one organization and carries a single role inside it.
///
/// # Wire format
///
/// ```json
/// {
///   "id": "8f0c...",
///   "email": "owner@example.com",
///   "role": "Owner",
///   "organizationId": "2b1e...",
///   "name": "Jane Doe",
///   "mfaEnabled": false,
///   "sessionTimeout": 30
/// }
/// ```
///
/// # Example
///
/// ```
/// use taskdeck_shared::models::user::{User, UserPatch, UserRole};
/// use uuid::Uuid;
///
/// let mut user = User::new("owner@example.com", UserRole::Owner, Uuid::new_v4());
/// UserPatch::name("Jane").apply_to(&mut user);
/// assert_eq!(user.display_name(), "Jane");
/// ```

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use super::settings::Preferences;

/// Roles inside an organization
///
/// Serialized with their capitalized names (`"Owner"`, `"Admin"`, `"Viewer"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UserRole {
    /// Full control of the organization, including security settings
    Owner,

    /// Manages tasks and reads the audit log
    Admin,

    /// Read-only access to tasks
    Viewer,
}

impl UserRole {
    /// Every role, highest first
    pub const ALL: [UserRole; 3] = [UserRole::Owner, UserRole::Admin, UserRole::Viewer];

    /// Converts role to its wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Owner => "Owner",
            UserRole::Admin => "Admin",
            UserRole::Viewer => "Viewer",
        }
    }

    /// Whether the role may create, edit, move or delete tasks
    pub fn can_edit_tasks(&self) -> bool {
        !matches!(self, UserRole::Viewer)
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Authenticated user profile as returned by `GET /auth/me`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// User ID (the identity provider's subject)
    pub id: Uuid,

    /// Email address (read-only on the client)
    pub email: String,

    /// Role in the organization (read-only on the client)
    pub role: UserRole,

    /// Organization the user belongs to
    pub organization_id: Uuid,

    /// Optional display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Whether multi-factor authentication is enabled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mfa_enabled: Option<bool>,

    /// Session timeout in minutes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_timeout: Option<u32>,

    /// UI preferences
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferences: Option<Preferences>,
}

impl User {
    /// Creates a user with only the required fields set
    pub fn new(email: impl Into<String>, role: UserRole, organization_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            email: email.into(),
            role,
            organization_id,
            name: None,
            mfa_enabled: None,
            session_timeout: None,
            preferences: None,
        }
    }

    /// Display name, falling back to `"User"` when unset or blank
    pub fn display_name(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => "User",
        }
    }
}

/// Partial user update
///
/// This is the body of `PUT /users/:id`. The populated fields decide what kind
/// of update it is: profile (`name`), security (`mfaEnabled`,
/// `sessionTimeout`) or preferences. Email and role are not part of the payload
/// and unknown fields are rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UserPatch {
    #[validate(
        length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"),
        custom(function = "not_blank")
    )]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mfa_enabled: Option<bool>,

    /// Session timeout in minutes
    #[validate(range(min = 5, max = 1440, message = "Session timeout must be between 5 and 1440 minutes"))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_timeout: Option<u32>,

    #[validate(nested)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferences: Option<Preferences>,
}

/// Rejects whitespace-only names; empty names are left to the length rule
fn not_blank(name: &str) -> Result<(), ValidationError> {
    if !name.is_empty() && name.trim().is_empty() {
        return Err(ValidationError::new("blank")
            .with_message(Cow::Borrowed("Name must not be blank")));
    }
    Ok(())
}

impl UserPatch {
    /// Profile update changing only the display name
    pub fn name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    /// Returns true if no field is set
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.mfa_enabled.is_none()
            && self.session_timeout.is_none()
            && self.preferences.is_none()
    }

    /// Returns true if the patch changes security fields
    pub fn touches_security(&self) -> bool {
        self.mfa_enabled.is_some() || self.session_timeout.is_some()
    }

    /// Merges the populated fields into `user`
    pub fn apply_to(&self, user: &mut User) {
        if let Some(name) = &self.name {
            user.name = Some(name.clone());
        }
        if let Some(mfa_enabled) = self.mfa_enabled {
            user.mfa_enabled = Some(mfa_enabled);
        }
        if let Some(session_timeout) = self.session_timeout {
            user.session_timeout = Some(session_timeout);
        }
        if let Some(preferences) = &self.preferences {
            user.preferences = Some(preferences.clone());
        }
    }
}
