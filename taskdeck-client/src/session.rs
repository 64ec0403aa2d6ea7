/// Identity provider seam
///
/// Sign-in, sign-up and token refresh happen at a third-party identity
/// provider. The client only needs three things from it: the current session,
/// a stream of session changes and sign-out. [`SessionProvider`] captures that
/// contract; [`MemorySessionProvider`] is an in-process implementation used for
/// tokens obtained out of band (CLI, environment) and in tests.
///
/// # Example
///
/// ```
/// use taskdeck_client::session::{MemorySessionProvider, Session, SessionProvider};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let provider = MemorySessionProvider::new();
/// provider.sign_in(Session::new("token"));
///
/// let session = provider.get_session().await?;
/// assert_eq!(session.map(|s| s.access_token), Some("token".to_string()));
/// # Ok(())
/// # }
/// ```

use async_trait::async_trait;
use futures::stream::{BoxStream, StreamExt};
use serde::{Deserialize, Serialize};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Mutex,
};
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;

use crate::error::{ClientError, ClientResult};

/// An authenticated session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Bearer token for the REST API
    pub access_token: String,
}

impl Session {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
        }
    }
}

/// Kind of session change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionEvent {
    SignedIn,
    SignedOut,
    TokenRefreshed,
}

/// Notification emitted by the provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionChange {
    pub event: SessionEvent,

    /// Session after the change, `None` once signed out
    pub session: Option<Session>,
}

/// Contract of the external identity provider
#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// Provider name for logs
    fn name(&self) -> &str;

    /// Current session, if any
    async fn get_session(&self) -> ClientResult<Option<Session>>;

    /// Ends the session at the provider
    async fn sign_out(&self) -> ClientResult<()>;

    /// Session changes from now on
    fn subscribe(&self) -> BoxStream<'static, SessionChange>;
}

/// In-process session provider
pub struct MemorySessionProvider {
    session: Mutex<Option<Session>>,
    changes: broadcast::Sender<SessionChange>,
    fail_sign_out: AtomicBool,
}

impl MemorySessionProvider {
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(16);

        Self {
            session: Mutex::new(None),
            changes,
            fail_sign_out: AtomicBool::new(false),
        }
    }

    /// Provider that starts out signed in
    pub fn with_session(session: Session) -> Self {
        let provider = Self::new();
        provider.replace(Some(session));
        provider
    }

    fn replace(&self, session: Option<Session>) {
        match self.session.lock() {
            Ok(mut guard) => *guard = session,
            Err(poisoned) => *poisoned.into_inner() = session,
        }
    }

    fn current(&self) -> Option<Session> {
        match self.session.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn emit(&self, event: SessionEvent, session: Option<Session>) {
        // Err only means there are no subscribers
        let _ = self.changes.send(SessionChange { event, session });
    }

    /// Signs in and notifies subscribers
    pub fn sign_in(&self, session: Session) {
        self.replace(Some(session.clone()));
        self.emit(SessionEvent::SignedIn, Some(session));
    }

    /// Replaces the token of the current session and notifies subscribers
    pub fn refresh(&self, access_token: impl Into<String>) {
        let session = Session::new(access_token);
        self.replace(Some(session.clone()));
        self.emit(SessionEvent::TokenRefreshed, Some(session));
    }

    /// Makes the next sign-out calls fail (simulates a provider outage)
    pub fn set_fail_sign_out(&self, fail: bool) {
        self.fail_sign_out.store(fail, Ordering::SeqCst);
    }
}

impl Default for MemorySessionProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionProvider for MemorySessionProvider {
    fn name(&self) -> &str {
        "memory"
    }

    async fn get_session(&self) -> ClientResult<Option<Session>> {
        Ok(self.current())
    }

    async fn sign_out(&self) -> ClientResult<()> {
        if self.fail_sign_out.load(Ordering::SeqCst) {
            return Err(ClientError::Session("sign-out request failed".to_string()));
        }

        self.replace(None);
        self.emit(SessionEvent::SignedOut, None);
        Ok(())
    }

    fn subscribe(&self) -> BoxStream<'static, SessionChange> {
        BroadcastStream::new(self.changes.subscribe())
            .filter_map(|change| async move {
                match change {
                    Ok(change) => Some(change),
                    Err(e) => {
                        tracing::warn!("Session change stream lagged: {}", e);
                        None
                    }
                }
            })
            .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sign_in_and_out_are_broadcast() {
        let provider = MemorySessionProvider::new();
        let mut changes = provider.subscribe();

        provider.sign_in(Session::new("t1"));
        provider.refresh("t2");
        provider.sign_out().await.unwrap();

        let first = changes.next().await.unwrap();
        assert_eq!(first.event, SessionEvent::SignedIn);
        assert_eq!(first.session, Some(Session::new("t1")));

        let second = changes.next().await.unwrap();
        assert_eq!(second.event, SessionEvent::TokenRefreshed);

        let third = changes.next().await.unwrap();
        assert_eq!(third.event, SessionEvent::SignedOut);
        assert!(third.session.is_none());

        assert!(provider.get_session().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_failing_sign_out_keeps_session() {
        let provider = MemorySessionProvider::with_session(Session::new("t"));
        provider.set_fail_sign_out(true);

        assert!(matches!(provider.sign_out().await, Err(ClientError::Session(_))));
        assert!(provider.get_session().await.unwrap().is_some());
    }
}
