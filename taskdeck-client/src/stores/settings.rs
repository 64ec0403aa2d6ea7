/// Settings container
///
/// Loads the current user's settings from `GET /auth/me` and saves each
/// sub-record independently through `PUT /users/:id`. After a successful save
/// the settings are reloaded and the fresh user record is pushed into the auth
/// store.
///
/// # Permissions
///
/// - Organization: visible to every role
/// - Security: visible and editable by Owner only
///
/// The organization sub-record has no endpoint; edits stay local.

use std::sync::Arc;
use tokio::sync::watch;
use validator::Validate;

use crate::{
    api::ApiClient,
    error::{ClientError, ClientResult},
    stores::auth::AuthStore,
};
use taskdeck_shared::{
    auth::authorization::{authorize, require_roles, SECURITY_MANAGERS},
    models::{
        settings::{OrganizationSettings, Preferences, ProfileSettings, SecuritySettings, UserSettings},
        user::UserPatch,
    },
};

struct SettingsInner {
    api: ApiClient,
    auth: AuthStore,
    settings: watch::Sender<Option<UserSettings>>,
}

#[derive(Clone)]
pub struct SettingsStore {
    inner: Arc<SettingsInner>,
}

impl SettingsStore {
    pub fn new(api: ApiClient, auth: AuthStore) -> Self {
        let (settings, _) = watch::channel(None);

        Self {
            inner: Arc::new(SettingsInner { api, auth, settings }),
        }
    }

    /// Reloads settings from the current user record
    pub async fn load(&self) -> ClientResult<UserSettings> {
        let user = self.inner.api.me().await?;
        let mut settings = UserSettings::from_user(&user);

        // Organization names only ever live locally
        if let Some(previous) = self.inner.settings.borrow().as_ref() {
            if previous.organization.id == settings.organization.id {
                settings.organization.name = previous.organization.name.clone();
            }
        }

        self.inner.auth.set_user(user);
        self.inner.settings.send_replace(Some(settings.clone()));
        Ok(settings)
    }

    /// Changes the display name
    pub async fn update_profile(&self, name: impl Into<String>) -> ClientResult<UserSettings> {
        let user = self.inner.auth.user().ok_or(ClientError::NotAuthenticated)?;
        let profile = ProfileSettings {
            email: user.email,
            role: user.role,
            name: name.into(),
        };
        profile.validate()?;

        self.persist(UserPatch::name(profile.name)).await
    }

    /// Changes MFA and session timeout (Owner only)
    pub async fn update_security(&self, security: SecuritySettings) -> ClientResult<UserSettings> {
        let role = self.inner.auth.role().ok_or(ClientError::NotAuthenticated)?;
        require_roles(role, SECURITY_MANAGERS)?;
        security.validate()?;

        self.persist(security.to_patch()).await
    }

    /// Changes UI preferences
    pub async fn update_preferences(&self, preferences: Preferences) -> ClientResult<UserSettings> {
        preferences.validate()?;

        self.persist(UserPatch {
            preferences: Some(preferences),
            ..Default::default()
        })
        .await
    }

    /// Applies organization settings locally
    pub fn update_organization(&self, organization: OrganizationSettings) -> ClientResult<()> {
        organization.validate()?;

        let mut applied = false;
        self.inner.settings.send_if_modified(|settings| match settings {
            Some(settings) if settings.organization.id == organization.id => {
                settings.organization = organization;
                applied = true;
                true
            }
            _ => false,
        });

        if !applied {
            return Err(ClientError::Status {
                status: reqwest::StatusCode::NOT_FOUND,
                message: "Organization not found".to_string(),
            });
        }

        tracing::info!("Organization settings updated locally");
        Ok(())
    }

    async fn persist(&self, patch: UserPatch) -> ClientResult<UserSettings> {
        let user = self.inner.auth.user().ok_or(ClientError::NotAuthenticated)?;

        self.inner.api.update_user(user.id, &patch).await?;
        tracing::info!(user_id = %user.id, "Settings saved");

        self.load().await
    }

    pub fn settings(&self) -> Option<UserSettings> {
        self.inner.settings.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<UserSettings>> {
        self.inner.settings.subscribe()
    }

    pub fn can_view_organization(&self) -> bool {
        self.inner.auth.is_authenticated()
    }

    pub fn can_view_security(&self) -> bool {
        self.inner
            .auth
            .role()
            .is_some_and(|role| authorize(role, SECURITY_MANAGERS))
    }

    pub fn can_edit_security(&self) -> bool {
        self.can_view_security()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::ClientConfig, router::Location, session::MemorySessionProvider};
    use taskdeck_shared::{
        auth::authorization::AuthzError,
        models::user::{User, UserRole},
    };
    use uuid::Uuid;

    fn store_with(role: Option<UserRole>) -> SettingsStore {
        let api = ApiClient::new(&ClientConfig::new("http://127.0.0.1:9/api")).unwrap();
        let auth = AuthStore::new(api.clone(), Arc::new(MemorySessionProvider::new()), Location::default());
        if let Some(role) = role {
            auth.set_user(User::new("u@example.com", role, Uuid::new_v4()));
        }
        SettingsStore::new(api, auth)
    }

    #[tokio::test]
    async fn test_security_requires_owner_before_any_request() {
        let admin = store_with(Some(UserRole::Admin));

        let err = admin
            .update_security(SecuritySettings::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Forbidden(AuthzError::Forbidden { .. })));
        assert!(!admin.can_view_security());
        assert!(!admin.can_edit_security());
        assert!(admin.can_view_organization());

        let anonymous = store_with(None);
        let err = anonymous
            .update_security(SecuritySettings::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::NotAuthenticated));
        assert!(!anonymous.can_view_organization());
    }

    #[tokio::test]
    async fn test_owner_security_validation() {
        let owner = store_with(Some(UserRole::Owner));
        assert!(owner.can_edit_security());

        let err = owner
            .update_security(SecuritySettings {
                mfa_enabled: true,
                session_timeout: 2,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));
    }

    #[tokio::test]
    async fn test_profile_name_is_validated() {
        let viewer = store_with(Some(UserRole::Viewer));

        let err = viewer.update_profile("").await.unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));
    }

    #[test]
    fn test_organization_update_requires_loaded_settings() {
        let owner = store_with(Some(UserRole::Owner));

        let err = owner
            .update_organization(OrganizationSettings {
                id: Uuid::new_v4(),
                name: Some("Acme".to_string()),
            })
            .unwrap_err();
        assert_eq!(err.status(), Some(reqwest::StatusCode::NOT_FOUND));
    }
}
