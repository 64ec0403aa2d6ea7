/// Authentication state container
///
/// Tracks the signed-in user, the loading flag and the session token, and
/// keeps them in sync with the identity provider.
///
/// # Lifecycle
///
/// ```text
/// new()           loading = true, user = None, token = None
///   └─> init()    get_session ─┬─ session ─> fetch_profile()  (GET /auth/me)
///                              └─ none ────> loading = false
///                 then listen for session changes until shutdown()
/// ```
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use taskdeck_client::{api::ApiClient, config::ClientConfig, router::Location};
/// use taskdeck_client::session::{MemorySessionProvider, Session};
/// use taskdeck_client::stores::auth::AuthStore;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let api = ApiClient::new(&ClientConfig::default())?;
/// let provider = Arc::new(MemorySessionProvider::with_session(Session::new("token")));
/// let auth = AuthStore::new(api, provider, Location::default());
///
/// auth.init().await;
/// if let Some(user) = auth.user() {
///     println!("Signed in as {}", user.email);
/// }
/// # Ok(())
/// # }
/// ```

use futures::StreamExt;
use std::sync::Arc;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::{
    api::ApiClient,
    router::{Location, Route},
    session::{SessionChange, SessionProvider},
};
use taskdeck_shared::models::user::{User, UserPatch, UserRole};

struct AuthInner {
    api: ApiClient,
    provider: Arc<dyn SessionProvider>,
    location: Location,
    user: watch::Sender<Option<User>>,
    loading: watch::Sender<bool>,
    shutdown: CancellationToken,
}

/// Cheap-to-clone handle over the authentication state
#[derive(Clone)]
pub struct AuthStore {
    inner: Arc<AuthInner>,
}

impl AuthStore {
    pub fn new(api: ApiClient, provider: Arc<dyn SessionProvider>, location: Location) -> Self {
        let (user, _) = watch::channel(None);
        let (loading, _) = watch::channel(true);

        Self {
            inner: Arc::new(AuthInner {
                api,
                provider,
                location,
                user,
                loading,
                shutdown: CancellationToken::new(),
            }),
        }
    }

    /// Loads the initial session and starts listening for session changes
    pub async fn init(&self) {
        let session = match self.inner.provider.get_session().await {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!(provider = self.inner.provider.name(), "Failed to read session: {}", e);
                None
            }
        };

        self.inner
            .api
            .set_token(session.as_ref().map(|s| s.access_token.clone()));

        if session.is_some() {
            self.fetch_profile().await;
        } else {
            self.inner.loading.send_replace(false);
        }

        self.listen();
    }

    fn listen(&self) {
        let mut changes = self.inner.provider.subscribe();
        let shutdown = self.inner.shutdown.clone();
        let store = self.clone();

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = shutdown.cancelled() => break,
                    change = changes.next() => match change {
                        Some(change) => store.apply_session_change(change).await,
                        None => break,
                    },
                }
            }

            tracing::debug!("Session listener stopped");
        });
    }

    async fn apply_session_change(&self, change: SessionChange) {
        tracing::debug!(event = ?change.event, "Session changed");

        self.inner
            .api
            .set_token(change.session.as_ref().map(|s| s.access_token.clone()));

        if change.session.is_some() {
            self.fetch_profile().await;
        } else {
            self.inner.user.send_replace(None);
        }

        self.inner.loading.send_replace(false);
    }

    /// Fetches the current user record (`GET /auth/me`)
    ///
    /// On failure the user is cleared and the error is logged.
    pub async fn fetch_profile(&self) {
        self.inner.loading.send_replace(true);

        match self.inner.api.me().await {
            Ok(user) => {
                tracing::debug!(user_id = %user.id, role = %user.role, "Profile loaded");
                self.inner.user.send_replace(Some(user));
            }
            Err(e) => {
                tracing::error!("Failed to fetch profile: {}", e);
                self.inner.user.send_replace(None);
            }
        }

        self.inner.loading.send_replace(false);
    }

    /// Signs out and navigates to the login page
    ///
    /// User and token are cleared even if the provider fails to sign out.
    pub async fn logout(&self) {
        if let Err(e) = self.inner.provider.sign_out().await {
            tracing::warn!(provider = self.inner.provider.name(), "Sign-out failed: {}", e);
        }

        self.inner.user.send_replace(None);
        self.inner.api.set_token(None);
        self.inner.location.set(Route::Login);
    }

    /// Merges `patch` into the cached user, if any
    pub fn update_user(&self, patch: &UserPatch) {
        self.inner.user.send_if_modified(|user| match user {
            Some(user) => {
                patch.apply_to(user);
                true
            }
            None => false,
        });
    }

    /// Replaces the cached user with a fresh server copy
    pub fn set_user(&self, user: User) {
        self.inner.user.send_replace(Some(user));
    }

    pub fn user(&self) -> Option<User> {
        self.inner.user.borrow().clone()
    }

    pub fn role(&self) -> Option<UserRole> {
        self.inner.user.borrow().as_ref().map(|user| user.role)
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.user.borrow().is_some()
    }

    pub fn is_loading(&self) -> bool {
        *self.inner.loading.borrow()
    }

    pub fn token(&self) -> Option<String> {
        self.inner.api.token()
    }

    pub fn subscribe_user(&self) -> watch::Receiver<Option<User>> {
        self.inner.user.subscribe()
    }

    pub fn subscribe_loading(&self) -> watch::Receiver<bool> {
        self.inner.loading.subscribe()
    }

    /// Resolves once loading is false
    pub async fn wait_until_loaded(&self) {
        let mut loading = self.inner.loading.subscribe();
        // The sender lives as long as this store, so the wait cannot fail
        let _ = loading.wait_for(|loading| !*loading).await;
    }

    /// Stops the session listener
    pub fn shutdown(&self) {
        self.inner.shutdown.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::ClientConfig, session::MemorySessionProvider};
    use uuid::Uuid;

    fn store(provider: Arc<MemorySessionProvider>) -> AuthStore {
        let api = ApiClient::new(&ClientConfig::new("http://127.0.0.1:9/api")).unwrap();
        AuthStore::new(api, provider, Location::default())
    }

    #[tokio::test]
    async fn test_initial_state() {
        let auth = store(Arc::new(MemorySessionProvider::new()));

        assert!(auth.is_loading());
        assert!(!auth.is_authenticated());
        assert!(auth.token().is_none());
    }

    #[tokio::test]
    async fn test_init_without_session_stops_loading() {
        let auth = store(Arc::new(MemorySessionProvider::new()));

        auth.init().await;
        auth.wait_until_loaded().await;

        assert!(!auth.is_loading());
        assert!(auth.user().is_none());
        auth.shutdown();
    }

    #[tokio::test]
    async fn test_update_user_merges_into_present_user() {
        let auth = store(Arc::new(MemorySessionProvider::new()));

        auth.update_user(&UserPatch::name("Nobody"));
        assert!(auth.user().is_none());

        auth.set_user(User::new("a@example.com", UserRole::Admin, Uuid::new_v4()));
        auth.update_user(&UserPatch::name("Alice"));

        let user = auth.user().unwrap();
        assert_eq!(user.name.as_deref(), Some("Alice"));
        assert_eq!(user.role, UserRole::Admin);
        assert_eq!(auth.role(), Some(UserRole::Admin));
    }

    #[tokio::test]
    async fn test_logout_survives_sign_out_failure() {
        let provider = Arc::new(MemorySessionProvider::new());
        provider.set_fail_sign_out(true);

        let location = Location::new(Route::Tasks);
        let api = ApiClient::new(&ClientConfig::new("http://127.0.0.1:9/api")).unwrap();
        api.set_token(Some("token".to_string()));
        let auth = AuthStore::new(api, provider, location.clone());
        auth.set_user(User::new("a@example.com", UserRole::Owner, Uuid::new_v4()));

        auth.logout().await;

        assert!(auth.user().is_none());
        assert!(auth.token().is_none());
        assert_eq!(location.current(), Route::Login);
    }
}
