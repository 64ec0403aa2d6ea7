/// User settings
///
/// Settings are a view over the user record split into four sub-records that
/// can be read and saved independently:
///
/// - **profile**: name, email and role (email and role are read-only)
/// - **organization**: the tenant the user belongs to
/// - **security**: MFA flag and session timeout
/// - **preferences**: theme, default view and page size
///
/// Missing fields on the user fall back to the defaults below.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::user::{User, UserPatch, UserRole};

/// Default session timeout in minutes
pub const DEFAULT_SESSION_TIMEOUT: u32 = 30;

/// Default number of items per page
pub const DEFAULT_ITEMS_PER_PAGE: u32 = 20;

/// Color theme
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    /// Follow the operating system preference
    #[default]
    System,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
            Theme::System => "system",
        }
    }
}

/// Default layout of the task page
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DefaultView {
    #[default]
    Kanban,
    List,
}

/// UI preferences sub-record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    #[serde(default)]
    pub theme: Theme,

    #[serde(default)]
    pub default_view: DefaultView,

    #[validate(range(min = 5, max = 100, message = "Items per page must be between 5 and 100"))]
    #[serde(default = "default_items_per_page")]
    pub items_per_page: u32,
}

fn default_items_per_page() -> u32 {
    DEFAULT_ITEMS_PER_PAGE
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            theme: Theme::System,
            default_view: DefaultView::Kanban,
            items_per_page: DEFAULT_ITEMS_PER_PAGE,
        }
    }
}

/// Security sub-record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SecuritySettings {
    pub mfa_enabled: bool,

    /// Session timeout in minutes
    #[validate(range(min = 5, max = 1440, message = "Session timeout must be between 5 and 1440 minutes"))]
    pub session_timeout: u32,
}

impl Default for SecuritySettings {
    fn default() -> Self {
        Self {
            mfa_enabled: false,
            session_timeout: DEFAULT_SESSION_TIMEOUT,
        }
    }
}

impl SecuritySettings {
    /// Update payload for `PUT /users/:id`
    pub fn to_patch(&self) -> UserPatch {
        UserPatch {
            mfa_enabled: Some(self.mfa_enabled),
            session_timeout: Some(self.session_timeout),
            ..Default::default()
        }
    }
}

/// Profile sub-record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSettings {
    pub email: String,

    pub role: UserRole,

    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    pub name: String,
}

/// Organization sub-record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationSettings {
    pub id: Uuid,

    #[validate(length(min = 1, max = 100, message = "Organization name must be between 1 and 100 characters"))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// All settings of the current user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSettings {
    pub profile: ProfileSettings,
    pub organization: OrganizationSettings,
    pub security: SecuritySettings,
    pub preferences: Preferences,
}

impl UserSettings {
    /// Derives settings from a user record, filling defaults
    pub fn from_user(user: &User) -> Self {
        Self {
            profile: ProfileSettings {
                email: user.email.clone(),
                role: user.role,
                name: user.display_name().to_string(),
            },
            organization: OrganizationSettings {
                id: user.organization_id,
                name: None,
            },
            security: SecuritySettings {
                mfa_enabled: user.mfa_enabled.unwrap_or(false),
                session_timeout: user.session_timeout.unwrap_or(DEFAULT_SESSION_TIMEOUT),
            },
            preferences: user.preferences.clone().unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_bare_user() {
        let user = User::new("v@example.com", UserRole::Viewer, Uuid::new_v4());
        let settings = UserSettings::from_user(&user);

        assert_eq!(settings.profile.name, "User");
        assert_eq!(settings.profile.role, UserRole::Viewer);
        assert_eq!(settings.organization.id, user.organization_id);
        assert!(!settings.security.mfa_enabled);
        assert_eq!(settings.security.session_timeout, 30);
        assert_eq!(settings.preferences.theme, Theme::System);
        assert_eq!(settings.preferences.default_view, DefaultView::Kanban);
        assert_eq!(settings.preferences.items_per_page, 20);
    }

    #[test]
    fn test_security_validation() {
        let ok = SecuritySettings {
            mfa_enabled: true,
            session_timeout: 60,
        };
        assert!(ok.validate().is_ok());

        let too_short = SecuritySettings {
            mfa_enabled: true,
            session_timeout: 1,
        };
        assert!(too_short.validate().is_err());
    }

    #[test]
    fn test_preferences_wire_format() {
        let prefs: Preferences =
            serde_json::from_value(serde_json::json!({ "theme": "dark" })).unwrap();
        assert_eq!(prefs.theme, Theme::Dark);
        assert_eq!(prefs.items_per_page, 20);

        let json = serde_json::to_value(&Preferences::default()).unwrap();
        assert_eq!(json["defaultView"], "kanban");
        assert_eq!(json["itemsPerPage"], 20);
    }

    #[test]
    fn test_security_patch_shape() {
        let patch = SecuritySettings::default().to_patch();
        assert!(patch.touches_security());
        assert!(patch.name.is_none());
    }
}
