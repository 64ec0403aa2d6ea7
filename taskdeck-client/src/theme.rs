/// Theme state
///
/// Holds the selected color theme. When attached to a settings store, every
/// change is saved to the user's preferences in the background.

use std::sync::Arc;
use tokio::{sync::watch, task::JoinHandle};

use crate::stores::settings::SettingsStore;
use taskdeck_shared::models::settings::{Theme, UserSettings};

#[derive(Clone)]
pub struct ThemeState {
    theme: Arc<watch::Sender<Theme>>,
    settings: Option<SettingsStore>,
}

impl ThemeState {
    /// Local-only theme state
    pub fn new(initial: Theme) -> Self {
        let (theme, _) = watch::channel(initial);
        Self {
            theme: Arc::new(theme),
            settings: None,
        }
    }

    /// Theme state that persists changes through `settings`
    pub fn with_settings(settings: SettingsStore) -> Self {
        let initial = settings
            .settings()
            .map(|s| s.preferences.theme)
            .unwrap_or_default();

        Self {
            settings: Some(settings),
            ..Self::new(initial)
        }
    }

    pub fn theme(&self) -> Theme {
        *self.theme.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<Theme> {
        self.theme.subscribe()
    }

    /// Selects a theme; returns the background save, if one was started
    ///
    /// Nothing is saved until the settings store has loaded, so the other
    /// preferences are never overwritten with defaults.
    pub fn set_theme(&self, theme: Theme) -> Option<JoinHandle<()>> {
        self.theme.send_replace(theme);

        let settings = self.settings.clone()?;
        let mut preferences = settings.settings()?.preferences;
        preferences.theme = theme;

        Some(tokio::spawn(async move {
            if let Err(e) = settings.update_preferences(preferences).await {
                tracing::warn!(theme = theme.as_str(), "Failed to save theme: {}", e);
            }
        }))
    }

    /// Flips between dark and light. `System` flips to dark.
    pub fn toggle(&self) -> Option<JoinHandle<()>> {
        let next = match self.theme() {
            Theme::Dark => Theme::Light,
            Theme::Light | Theme::System => Theme::Dark,
        };
        self.set_theme(next)
    }

    /// Whether dark styling applies, resolving `System` with the OS preference
    pub fn is_dark(&self, system_prefers_dark: bool) -> bool {
        match self.theme() {
            Theme::Dark => true,
            Theme::Light => false,
            Theme::System => system_prefers_dark,
        }
    }

    /// Adopts the theme from freshly loaded settings without saving
    pub fn sync_from(&self, settings: &UserSettings) {
        self.theme.send_if_modified(|theme| {
            let changed = *theme != settings.preferences.theme;
            *theme = settings.preferences.theme;
            changed
        });
    }
}

impl Default for ThemeState {
    fn default() -> Self {
        Self::new(Theme::System)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        api::ApiClient, config::ClientConfig, router::Location, session::MemorySessionProvider,
        stores::auth::AuthStore,
    };
    use taskdeck_shared::models::user::{User, UserRole};
    use uuid::Uuid;

    #[test]
    fn test_toggle_and_resolution() {
        let state = ThemeState::default();
        assert!(state.is_dark(true));
        assert!(!state.is_dark(false));

        assert!(state.toggle().is_none());
        assert_eq!(state.theme(), Theme::Dark);
        assert!(state.is_dark(false));

        state.toggle();
        assert_eq!(state.theme(), Theme::Light);
        assert!(!state.is_dark(true));
    }

    #[test]
    fn test_sync_from_settings() {
        let state = ThemeState::new(Theme::Light);
        let mut changes = state.subscribe();

        let user = User::new("u@example.com", UserRole::Viewer, Uuid::new_v4());
        let mut settings = UserSettings::from_user(&user);
        settings.preferences.theme = Theme::Dark;
        state.sync_from(&settings);

        assert_eq!(state.theme(), Theme::Dark);
        assert!(changes.has_changed().unwrap());
        changes.borrow_and_update();

        state.sync_from(&settings);
        assert!(!changes.has_changed().unwrap());
    }

    #[tokio::test]
    async fn test_unloaded_settings_are_not_saved() {
        let api = ApiClient::new(&ClientConfig::new("http://127.0.0.1:9/api")).unwrap();
        let auth = AuthStore::new(api.clone(), Arc::new(MemorySessionProvider::new()), Location::default());
        let state = ThemeState::with_settings(SettingsStore::new(api, auth));

        assert!(state.set_theme(Theme::Dark).is_none());
        assert_eq!(state.theme(), Theme::Dark);
    }
}
