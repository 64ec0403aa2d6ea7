/// Domain models shared by the API and the client
///
/// # Models
///
/// - `user`: Users, roles and partial user updates
/// - `task`: Tasks, status/category/priority enums, normalization and stats
/// - `audit_log`: Append-only audit log entries
/// - `settings`: Per-user settings sub-records
///
/// # Example
///
/// ```
/// use taskdeck_shared::models::task::{TaskPatch, TaskStatus};
///
/// let patch = TaskPatch::status(TaskStatus::Completed);
/// assert!(!patch.is_empty());
/// ```

pub mod audit_log;
pub mod settings;
pub mod task;
pub mod user;
