/// Routes, route guards and navigation
///
/// # Route Table
///
/// ```text
/// /                    -> /dashboard/tasks
/// /login               public
/// /signup              public
/// /dashboard           auth guard
///   ├── tasks          (default child)
///   ├── audit          role guard [Admin, Owner]
///   └── settings       role guard [Owner, Admin, Viewer]
/// anything else        -> /dashboard/tasks
/// ```
///
/// Guards wait for the auth store to finish loading before deciding. A failed
/// auth check lands on the login page; a failed role check lands on the task
/// board.

use std::sync::Arc;
use tokio::sync::watch;

use crate::stores::auth::AuthStore;
use taskdeck_shared::{
    auth::authorization::{check_access, AccessDecision, Denial},
    models::user::UserRole,
};

/// Roles declared for the audit log page
pub const AUDIT_ROUTE_ROLES: &[UserRole] = &[UserRole::Admin, UserRole::Owner];

/// Roles declared for the settings page
pub const SETTINGS_ROUTE_ROLES: &[UserRole] = &[UserRole::Owner, UserRole::Admin, UserRole::Viewer];

/// Client-side pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Signup,
    Tasks,
    Audit,
    Settings,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::Signup => "/signup",
            Route::Tasks => "/dashboard/tasks",
            Route::Audit => "/dashboard/audit",
            Route::Settings => "/dashboard/settings",
        }
    }

    /// Resolves a path, applying the table's redirects
    pub fn from_path(path: &str) -> Route {
        let path = path.split(['?', '#']).next().unwrap_or_default();

        match path.trim_end_matches('/') {
            "/login" => Route::Login,
            "/signup" => Route::Signup,
            "/dashboard/audit" => Route::Audit,
            "/dashboard/settings" => Route::Settings,
            _ => Route::Tasks,
        }
    }

    /// Whether the route sits under the authenticated dashboard
    pub fn requires_auth(&self) -> bool {
        matches!(self, Route::Tasks | Route::Audit | Route::Settings)
    }

    /// Roles declared by the route's role guard
    pub fn permitted_roles(&self) -> Option<&'static [UserRole]> {
        match self {
            Route::Audit => Some(AUDIT_ROUTE_ROLES),
            Route::Settings => Some(SETTINGS_ROUTE_ROLES),
            _ => None,
        }
    }
}

/// Outcome of a guard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    Redirect(Route),
}

/// Requires a signed-in user
pub async fn auth_guard(auth: &AuthStore) -> GuardDecision {
    if auth.is_authenticated() {
        return GuardDecision::Allow;
    }

    auth.wait_until_loaded().await;

    if auth.is_authenticated() {
        GuardDecision::Allow
    } else {
        GuardDecision::Redirect(Route::Login)
    }
}

/// Requires a user whose role is permitted by the authorization policy
pub async fn role_guard(auth: &AuthStore, permitted: &[UserRole]) -> GuardDecision {
    auth.wait_until_loaded().await;

    match check_access(auth.role(), permitted) {
        AccessDecision::Allow => GuardDecision::Allow,
        AccessDecision::Deny(Denial::Unauthenticated) => GuardDecision::Redirect(Route::Login),
        AccessDecision::Deny(Denial::Forbidden) => GuardDecision::Redirect(Route::Tasks),
    }
}

/// Current location, shared by the navigator and the stores that redirect
#[derive(Clone)]
pub struct Location {
    current: Arc<watch::Sender<Route>>,
}

impl Location {
    pub fn new(initial: Route) -> Self {
        let (current, _) = watch::channel(initial);
        Self {
            current: Arc::new(current),
        }
    }

    pub fn current(&self) -> Route {
        *self.current.borrow()
    }

    pub fn set(&self, route: Route) {
        tracing::debug!(path = route.path(), "Navigated");
        self.current.send_replace(route);
    }

    pub fn subscribe(&self) -> watch::Receiver<Route> {
        self.current.subscribe()
    }
}

impl Default for Location {
    fn default() -> Self {
        Self::new(Route::Login)
    }
}

/// Runs guards and moves the location
#[derive(Clone)]
pub struct Navigator {
    auth: AuthStore,
    location: Location,
}

impl Navigator {
    pub fn new(auth: AuthStore, location: Location) -> Self {
        Self { auth, location }
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    /// Navigates to `route`, or to the guard's fallback; returns where it landed
    pub async fn navigate(&self, route: Route) -> Route {
        let landed = self.resolve(route).await;
        self.location.set(landed);
        landed
    }

    /// Same as [`Navigator::navigate`] for a raw path
    pub async fn navigate_path(&self, path: &str) -> Route {
        self.navigate(Route::from_path(path)).await
    }

    async fn resolve(&self, route: Route) -> Route {
        if route.requires_auth() {
            if let GuardDecision::Redirect(fallback) = auth_guard(&self.auth).await {
                return fallback;
            }
        }

        if let Some(permitted) = route.permitted_roles() {
            if let GuardDecision::Redirect(fallback) = role_guard(&self.auth, permitted).await {
                return fallback;
            }
        }

        route
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{api::ApiClient, config::ClientConfig, session::MemorySessionProvider};
    use taskdeck_shared::models::user::User;
    use uuid::Uuid;

    async fn navigator_for(role: Option<UserRole>) -> Navigator {
        let api = ApiClient::new(&ClientConfig::new("http://127.0.0.1:9/api")).unwrap();
        let location = Location::default();
        let auth = AuthStore::new(api, Arc::new(MemorySessionProvider::new()), location.clone());

        auth.init().await;
        if let Some(role) = role {
            auth.set_user(User::new("u@example.com", role, Uuid::new_v4()));
        }

        Navigator::new(auth, location)
    }

    #[test]
    fn test_from_path() {
        assert_eq!(Route::from_path("/"), Route::Tasks);
        assert_eq!(Route::from_path(""), Route::Tasks);
        assert_eq!(Route::from_path("/dashboard"), Route::Tasks);
        assert_eq!(Route::from_path("/dashboard/audit"), Route::Audit);
        assert_eq!(Route::from_path("/dashboard/settings/"), Route::Settings);
        assert_eq!(Route::from_path("/login?next=/x"), Route::Login);
        assert_eq!(Route::from_path("/nowhere"), Route::Tasks);

        for route in [Route::Login, Route::Signup, Route::Tasks, Route::Audit, Route::Settings] {
            assert_eq!(Route::from_path(route.path()), route);
        }
    }

    #[tokio::test]
    async fn test_anonymous_user_lands_on_login() {
        let navigator = navigator_for(None).await;

        assert_eq!(navigator.navigate(Route::Tasks).await, Route::Login);
        assert_eq!(navigator.navigate(Route::Audit).await, Route::Login);
        assert_eq!(navigator.navigate(Route::Signup).await, Route::Signup);
    }

    #[tokio::test]
    async fn test_audit_route_roles() {
        let viewer = navigator_for(Some(UserRole::Viewer)).await;
        assert_eq!(viewer.navigate(Route::Audit).await, Route::Tasks);
        assert_eq!(viewer.navigate(Route::Settings).await, Route::Settings);

        let admin = navigator_for(Some(UserRole::Admin)).await;
        assert_eq!(admin.navigate_path("/dashboard/audit").await, Route::Audit);

        let owner = navigator_for(Some(UserRole::Owner)).await;
        assert_eq!(owner.navigate(Route::Audit).await, Route::Audit);
        assert_eq!(owner.location().current(), Route::Audit);
    }
}
