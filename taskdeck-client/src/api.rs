/// HTTP client for the TaskDeck REST API
///
/// Owns the current session token. Every request carries
/// `Authorization: Bearer <token>` while a token is set; the auth store keeps
/// the token in sync with the identity provider.
///
/// # Example
///
/// ```no_run
/// use taskdeck_client::{api::ApiClient, config::ClientConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let api = ApiClient::new(&ClientConfig::default())?;
/// api.set_token(Some("session-token".to_string()));
///
/// let tasks = api.list_tasks().await?;
/// println!("{} tasks", tasks.len());
/// # Ok(())
/// # }
/// ```

use reqwest::{Method, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::watch;
use uuid::Uuid;

use crate::{
    config::ClientConfig,
    error::{ClientError, ClientResult},
};
use taskdeck_shared::models::{
    audit_log::{AuditLogEntry, NewAuditEntry},
    task::{RawTask, Task, TaskPatch},
    user::{User, UserPatch},
};

/// Error body returned by the API
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Cheap-to-clone API handle
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Arc<str>,
    token: Arc<watch::Sender<Option<String>>>,
}

impl ApiClient {
    /// Creates a client for the configured API
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Http` if the HTTP client cannot be built
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        let (token, _) = watch::channel(config.access_token.clone());

        Ok(Self {
            http,
            base_url: Arc::from(config.api_url.as_str()),
            token: Arc::new(token),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Current session token
    pub fn token(&self) -> Option<String> {
        self.token.borrow().clone()
    }

    /// Replaces the session token
    pub fn set_token(&self, token: Option<String>) {
        self.token.send_replace(token);
    }

    /// Watches token changes
    pub fn subscribe_token(&self) -> watch::Receiver<Option<String>> {
        self.token.subscribe()
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.http.request(method, format!("{}{}", self.base_url, path));

        match self.token.borrow().as_deref() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn check(response: Response) -> ClientResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&text)
            .map(|body| body.message)
            .unwrap_or(text);

        Err(ClientError::Status { status, message })
    }

    async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> ClientResult<T> {
        let response = Self::check(builder.send().await?).await?;
        Ok(response.json::<T>().await?)
    }

    async fn send_with<B: Serialize, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        self.send_json(self.request(method, path).json(body)).await
    }

    /// `GET /tasks`, un-normalized
    pub async fn list_tasks(&self) -> ClientResult<Vec<RawTask>> {
        self.send_json(self.request(Method::GET, "/tasks")).await
    }

    /// `POST /tasks`
    pub async fn create_task(&self, patch: &TaskPatch) -> ClientResult<Task> {
        let raw: RawTask = self.send_with(Method::POST, "/tasks", patch).await?;
        Ok(raw.normalize())
    }

    /// `PUT /tasks/:id`
    pub async fn update_task(&self, id: Uuid, patch: &TaskPatch) -> ClientResult<Task> {
        let raw: RawTask = self
            .send_with(Method::PUT, &format!("/tasks/{}", id), patch)
            .await?;
        Ok(raw.normalize())
    }

    /// `DELETE /tasks/:id`
    pub async fn delete_task(&self, id: Uuid) -> ClientResult<()> {
        let response = self
            .request(Method::DELETE, &format!("/tasks/{}", id))
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    /// `GET /audit-log`
    pub async fn list_audit_log(&self) -> ClientResult<Vec<AuditLogEntry>> {
        self.send_json(self.request(Method::GET, "/audit-log")).await
    }

    /// `POST /audit-log`
    pub async fn append_audit(&self, entry: &NewAuditEntry) -> ClientResult<AuditLogEntry> {
        self.send_with(Method::POST, "/audit-log", entry).await
    }

    /// `GET /auth/me`
    pub async fn me(&self) -> ClientResult<User> {
        self.send_json(self.request(Method::GET, "/auth/me")).await
    }

    /// `PUT /users/:id`
    pub async fn update_user(&self, id: Uuid, patch: &UserPatch) -> ClientResult<User> {
        self.send_with(Method::PUT, &format!("/users/{}", id), patch)
            .await
    }
}
