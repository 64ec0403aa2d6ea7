/// Task model
///
/// Tasks belong to exactly one organization and move between three statuses on
/// the board:
///
/// ```text
/// todo ⇄ in-progress ⇄ completed
/// ```
///
/// Any status can be set directly (drag-and-drop or the edit form), so there is
/// no transition table.
///
/// # Normalization
///
/// The API may return legacy or differently-cased values. [`RawTask`] accepts
/// anything for status, category and priority and [`RawTask::normalize`] maps
/// them onto the canonical enums:
///
/// - status: lowercased, spaces become hyphens, unknown → `todo`
/// - category: lowercased, unknown → `other`
/// - priority: exact name, unknown → none (ranks lowest)
///
/// # Example
///
/// ```
/// use taskdeck_shared::models::task::{TaskCategory, TaskStatus};
///
/// assert_eq!(TaskStatus::normalize("In Progress"), TaskStatus::InProgress);
/// assert_eq!(TaskStatus::normalize("archived"), TaskStatus::Todo);
/// assert_eq!(TaskCategory::normalize("ERRANDS"), TaskCategory::Other);
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;
use uuid::Uuid;
use validator::Validate;

/// Board status of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskStatus {
    #[serde(rename = "todo")]
    Todo,

    #[serde(rename = "in-progress")]
    InProgress,

    #[serde(rename = "completed")]
    Completed,
}

impl TaskStatus {
    /// Every status in board order
    pub const ALL: [TaskStatus; 3] = [TaskStatus::Todo, TaskStatus::InProgress, TaskStatus::Completed];

    /// Converts status to its wire value
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in-progress",
            TaskStatus::Completed => "completed",
        }
    }

    /// Human-readable column title
    pub fn label(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "To Do",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Completed => "Completed",
        }
    }

    /// Maps a raw server value onto a canonical status
    ///
    /// Matching is case-insensitive and treats spaces as hyphens, so `"TODO"`,
    /// `"in progress"` and `"In-Progress"` are all recognized. Anything else is
    /// `Todo`.
    pub fn normalize(raw: &str) -> Self {
        let candidate = raw.to_lowercase().replace(' ', "-");
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == candidate)
            .unwrap_or(TaskStatus::Todo)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Task category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskCategory {
    Work,
    Personal,
    Shopping,
    Other,
}

impl TaskCategory {
    pub const ALL: [TaskCategory; 4] = [
        TaskCategory::Work,
        TaskCategory::Personal,
        TaskCategory::Shopping,
        TaskCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskCategory::Work => "work",
            TaskCategory::Personal => "personal",
            TaskCategory::Shopping => "shopping",
            TaskCategory::Other => "other",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TaskCategory::Work => "Work",
            TaskCategory::Personal => "Personal",
            TaskCategory::Shopping => "Shopping",
            TaskCategory::Other => "Other",
        }
    }

    /// Maps a raw server value onto a canonical category, case-insensitively.
    /// Unknown values become `Other`.
    pub fn normalize(raw: &str) -> Self {
        let candidate = raw.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == candidate)
            .unwrap_or(TaskCategory::Other)
    }
}

impl fmt::Display for TaskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Task priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskPriority {
    Low,
    Medium,
    High,
}

impl TaskPriority {
    pub const ALL: [TaskPriority; 3] = [TaskPriority::Low, TaskPriority::Medium, TaskPriority::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::Low => "Low",
            TaskPriority::Medium => "Medium",
            TaskPriority::High => "High",
        }
    }

    /// Parses an exact wire value
    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|priority| priority.as_str() == raw)
    }

    /// Sort weight: High=3, Medium=2, Low=1
    pub fn rank(&self) -> u8 {
        match self {
            TaskPriority::High => 3,
            TaskPriority::Medium => 2,
            TaskPriority::Low => 1,
        }
    }

    /// Sort weight of an optional priority; missing or unknown ranks 0
    pub fn rank_of(priority: Option<TaskPriority>) -> u8 {
        priority.map(|p| p.rank()).unwrap_or(0)
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Task with canonical status, category and priority
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique task ID
    pub id: Uuid,

    pub title: String,

    pub description: String,

    pub category: TaskCategory,

    pub status: TaskStatus,

    /// Priority, `None` when the server sent no recognizable value
    pub priority: Option<TaskPriority>,

    /// Owning organization
    pub organization_id: Uuid,

    /// User who created the task
    pub created_by: Uuid,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

/// Task exactly as received from the API, before normalization
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTask {
    pub id: Uuid,

    pub title: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub category: JsonValue,

    #[serde(default)]
    pub status: JsonValue,

    #[serde(default)]
    pub priority: JsonValue,

    pub organization_id: Uuid,

    pub created_by: Uuid,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

/// Renders a raw JSON value the way it would be stringified for matching
fn raw_text(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl RawTask {
    /// Converts into a [`Task`] with canonical enum values
    pub fn normalize(self) -> Task {
        Task {
            id: self.id,
            title: self.title,
            description: self.description.unwrap_or_default(),
            category: TaskCategory::normalize(&raw_text(&self.category)),
            status: TaskStatus::normalize(&raw_text(&self.status)),
            priority: TaskPriority::parse(&raw_text(&self.priority)),
            organization_id: self.organization_id,
            created_by: self.created_by,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Partial task used for create and update payloads
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<TaskCategory>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<TaskPriority>,
}

impl TaskPatch {
    /// Patch that only moves the task to `status`
    pub fn status(status: TaskStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.status.is_none()
            && self.priority.is_none()
    }

    /// Merges the populated fields into `task` and bumps `updated_at`
    pub fn apply_to(&self, task: &mut Task) {
        if let Some(title) = &self.title {
            task.title = title.clone();
        }
        if let Some(description) = &self.description {
            task.description = description.clone();
        }
        if let Some(category) = self.category {
            task.category = category;
        }
        if let Some(status) = self.status {
            task.status = status;
        }
        if let Some(priority) = self.priority {
            task.priority = Some(priority);
        }
        task.updated_at = Utc::now();
    }
}

/// Create/edit form contents
///
/// All fields are required. An invalid form never produces a request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TaskForm {
    #[validate(length(min = 1, max = 255, message = "Title is required"))]
    pub title: String,

    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,

    #[serde(default = "default_category")]
    pub category: TaskCategory,

    #[serde(default = "default_status")]
    pub status: TaskStatus,

    #[serde(default = "default_priority")]
    pub priority: TaskPriority,
}

fn default_category() -> TaskCategory {
    TaskCategory::Work
}

fn default_status() -> TaskStatus {
    TaskStatus::Todo
}

fn default_priority() -> TaskPriority {
    TaskPriority::Medium
}

impl Default for TaskForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            category: default_category(),
            status: default_status(),
            priority: default_priority(),
        }
    }
}

impl TaskForm {
    /// Form pre-filled from an existing task (edit mode)
    pub fn from_task(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone(),
            category: task.category,
            status: task.status,
            priority: task.priority.unwrap_or_else(default_priority),
        }
    }

    /// Converts the whole form into a patch
    pub fn into_patch(self) -> TaskPatch {
        TaskPatch {
            title: Some(self.title),
            description: Some(self.description),
            category: Some(self.category),
            status: Some(self.status),
            priority: Some(self.priority),
        }
    }
}

/// Task counts per status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStats {
    pub todo: usize,
    pub in_progress: usize,
    pub completed: usize,
    pub total: usize,
}

impl TaskStats {
    pub fn from_tasks(tasks: &[Task]) -> Self {
        let count = |status: TaskStatus| tasks.iter().filter(|t| t.status == status).count();

        Self {
            todo: count(TaskStatus::Todo),
            in_progress: count(TaskStatus::InProgress),
            completed: count(TaskStatus::Completed),
            total: tasks.len(),
        }
    }

    pub fn count(&self, status: TaskStatus) -> usize {
        match status {
            TaskStatus::Todo => self.todo,
            TaskStatus::InProgress => self.in_progress,
            TaskStatus::Completed => self.completed,
        }
    }

    /// Share of `value` in the total, in percent. 0 when there are no tasks.
    pub fn percentage(&self, value: usize) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        value as f64 / self.total as f64 * 100.0
    }
}
