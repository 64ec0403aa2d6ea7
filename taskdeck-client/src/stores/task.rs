/// Task state container
///
/// Holds the organization's task collection as last fetched from the API.
/// Every mutation is followed by a full refetch, so the cache always mirrors
/// the server after a successful write.
///
/// # Observables
///
/// | Cell      | Type             | Updated by                          |
/// |-----------|------------------|-------------------------------------|
/// | `tasks`   | `Vec<Task>`      | `fetch_all`                         |
/// | `loading` | `bool`           | `fetch_all` (true for the duration) |
/// | `error`   | `Option<String>` | `fetch_all`                         |
/// | `stats`   | `TaskStats`      | recomputed with `tasks`             |

use std::sync::Arc;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;
use uuid::Uuid;
use validator::Validate;

use crate::{api::ApiClient, error::ClientResult};
use taskdeck_shared::models::task::{RawTask, Task, TaskForm, TaskPatch, TaskStats};

/// Error message published when the task list cannot be loaded
pub const LOAD_ERROR: &str = "Failed to load tasks";

struct TaskInner {
    api: ApiClient,
    tasks: watch::Sender<Vec<Task>>,
    loading: watch::Sender<bool>,
    error: watch::Sender<Option<String>>,
    stats: watch::Sender<TaskStats>,
}

#[derive(Clone)]
pub struct TaskStore {
    inner: Arc<TaskInner>,
}

impl TaskStore {
    pub fn new(api: ApiClient) -> Self {
        let (tasks, _) = watch::channel(Vec::new());
        let (loading, _) = watch::channel(false);
        let (error, _) = watch::channel(None);
        let (stats, _) = watch::channel(TaskStats::default());

        Self {
            inner: Arc::new(TaskInner {
                api,
                tasks,
                loading,
                error,
                stats,
            }),
        }
    }

    /// Reloads the collection (`GET /tasks`)
    ///
    /// Failures are absorbed into the error cell; loading is cleared either way.
    pub async fn fetch_all(&self) {
        self.inner.loading.send_replace(true);

        match self.inner.api.list_tasks().await {
            Ok(raw) => {
                let tasks: Vec<Task> = raw.into_iter().map(RawTask::normalize).collect();
                tracing::debug!(count = tasks.len(), "Tasks loaded");

                self.inner.stats.send_replace(TaskStats::from_tasks(&tasks));
                self.inner.tasks.send_replace(tasks);
                self.inner.error.send_replace(None);
            }
            Err(e) => {
                tracing::error!("Failed to fetch tasks: {}", e);
                self.inner.error.send_replace(Some(LOAD_ERROR.to_string()));
            }
        }

        self.inner.loading.send_replace(false);
    }

    /// Creates a task (`POST /tasks`) and refetches
    pub async fn create(&self, patch: TaskPatch) -> ClientResult<Task> {
        let task = self.inner.api.create_task(&patch).await?;
        tracing::info!(task_id = %task.id, "Task created");

        self.fetch_all().await;
        Ok(task)
    }

    /// Validates a form, then creates the task
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Validation` without issuing a request if the form
    /// is incomplete
    pub async fn create_from_form(&self, form: TaskForm) -> ClientResult<Task> {
        form.validate()?;
        self.create(form.into_patch()).await
    }

    /// Updates a task (`PUT /tasks/:id`) and refetches
    pub async fn update(&self, id: Uuid, patch: TaskPatch) -> ClientResult<Task> {
        let task = self.inner.api.update_task(id, &patch).await?;
        tracing::info!(task_id = %id, "Task updated");

        self.fetch_all().await;
        Ok(task)
    }

    /// Deletes a task (`DELETE /tasks/:id`) and refetches
    pub async fn delete(&self, id: Uuid) -> ClientResult<()> {
        self.inner.api.delete_task(id).await?;
        tracing::info!(task_id = %id, "Task deleted");

        self.fetch_all().await;
        Ok(())
    }

    pub fn tasks(&self) -> Vec<Task> {
        self.inner.tasks.borrow().clone()
    }

    pub fn is_loading(&self) -> bool {
        *self.inner.loading.borrow()
    }

    pub fn error(&self) -> Option<String> {
        self.inner.error.borrow().clone()
    }

    pub fn stats(&self) -> TaskStats {
        *self.inner.stats.borrow()
    }

    pub fn subscribe_tasks(&self) -> watch::Receiver<Vec<Task>> {
        self.inner.tasks.subscribe()
    }

    pub fn subscribe_loading(&self) -> watch::Receiver<bool> {
        self.inner.loading.subscribe()
    }

    pub fn subscribe_error(&self) -> watch::Receiver<Option<String>> {
        self.inner.error.subscribe()
    }

    /// Stream of stats, starting with the current value
    pub fn stats_stream(&self) -> WatchStream<TaskStats> {
        WatchStream::new(self.inner.stats.subscribe())
    }
}
