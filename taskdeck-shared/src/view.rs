//! Task list view-model
//!
//! Pure derivation of what the board shows from the cached task collection and
//! the current filter inputs. Nothing here talks to the network; callers
//! recompute whenever an input changes.
//!
//! Pipeline:
//!
//! ```text
//! tasks ─▶ search ─▶ category ─▶ sort ─▶ group by status
//! ```
//!
//! # Example
//!
//! ```
//! use taskdeck_shared::view::{TaskQuery, SortOption};
//!
//! let query = TaskQuery {
//!     search: "mig".to_string(),
//!     sort: SortOption::Title,
//!     ..Default::default()
//! };
//! let visible = query.apply(&[]);
//! assert!(visible.is_empty());
//! ```

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::models::task::{Task, TaskCategory, TaskPatch, TaskPriority, TaskStatus};

/// Sort order of the task list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOption {
    /// Most recently created first
    #[default]
    Newest,
    /// Oldest first
    Oldest,
    /// High, Medium, Low, then unknown
    Priority,
    /// Title ascending
    Title,
}

impl SortOption {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOption::Newest => "newest",
            SortOption::Oldest => "oldest",
            SortOption::Priority => "priority",
            SortOption::Title => "title",
        }
    }

    fn compare(&self, a: &Task, b: &Task) -> Ordering {
        match self {
            SortOption::Newest => b.created_at.cmp(&a.created_at),
            SortOption::Oldest => a.created_at.cmp(&b.created_at),
            SortOption::Priority => {
                TaskPriority::rank_of(b.priority).cmp(&TaskPriority::rank_of(a.priority))
            }
            SortOption::Title => a
                .title
                .to_lowercase()
                .cmp(&b.title.to_lowercase())
                .then_with(|| a.title.cmp(&b.title)),
        }
    }
}

impl FromStr for SortOption {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "newest" => Ok(SortOption::Newest),
            "oldest" => Ok(SortOption::Oldest),
            "priority" => Ok(SortOption::Priority),
            "title" => Ok(SortOption::Title),
            other => Err(format!("unknown sort option: {}", other)),
        }
    }
}

impl fmt::Display for SortOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Category filter: a single category or everything
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(TaskCategory),
}

impl CategoryFilter {
    pub fn matches(&self, category: TaskCategory) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(selected) => *selected == category,
        }
    }
}

/// Filter and sort inputs of the task list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskQuery {
    /// Free-text search over title and description
    pub search: String,
    pub category: CategoryFilter,
    pub sort: SortOption,
}

impl TaskQuery {
    /// Case-insensitive substring match on title or description.
    /// A blank query matches everything.
    pub fn matches_search(&self, task: &Task) -> bool {
        let needle = self.search.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        task.title.to_lowercase().contains(&needle)
            || task.description.to_lowercase().contains(&needle)
    }

    /// Filters and sorts `tasks`. The sort is stable, so ties keep their
    /// original relative order.
    pub fn apply(&self, tasks: &[Task]) -> Vec<Task> {
        let mut visible: Vec<Task> = tasks
            .iter()
            .filter(|task| self.matches_search(task))
            .filter(|task| self.category.matches(task.category))
            .cloned()
            .collect();

        visible.sort_by(|a, b| self.sort.compare(a, b));
        visible
    }
}

/// Tasks partitioned into the three board columns
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Buckets {
    pub todo: Vec<Task>,
    pub in_progress: Vec<Task>,
    pub completed: Vec<Task>,
}

impl Buckets {
    /// Partitions an already filtered and sorted list, preserving order
    pub fn group(tasks: Vec<Task>) -> Self {
        let mut buckets = Buckets::default();
        for task in tasks {
            buckets.bucket_mut(task.status).push(task);
        }
        buckets
    }

    pub fn bucket(&self, status: TaskStatus) -> &[Task] {
        match status {
            TaskStatus::Todo => &self.todo,
            TaskStatus::InProgress => &self.in_progress,
            TaskStatus::Completed => &self.completed,
        }
    }

    fn bucket_mut(&mut self, status: TaskStatus) -> &mut Vec<Task> {
        match status {
            TaskStatus::Todo => &mut self.todo,
            TaskStatus::InProgress => &mut self.in_progress,
            TaskStatus::Completed => &mut self.completed,
        }
    }

    pub fn len(&self) -> usize {
        self.todo.len() + self.in_progress.len() + self.completed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A card dropped on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropEvent {
    pub task_id: Uuid,
    /// Column the card was dragged from
    pub source: TaskStatus,
    /// Column the card was dropped on
    pub target: TaskStatus,
}

impl DropEvent {
    /// Update to persist for this drop. Reordering inside one column changes
    /// nothing on the server, so it yields `None`.
    pub fn status_change(&self) -> Option<TaskPatch> {
        if self.source == self.target {
            return None;
        }
        Some(TaskPatch::status(self.target))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn task(title: &str, description: &str, minutes: i64) -> Task {
        let created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::minutes(minutes);
        Task {
            id: Uuid::new_v4(),
            title: title.to_string(),
            description: description.to_string(),
            category: TaskCategory::Work,
            status: TaskStatus::Todo,
            priority: Some(TaskPriority::Medium),
            organization_id: Uuid::nil(),
            created_by: Uuid::nil(),
            created_at: created,
            updated_at: created,
        }
    }

    fn titles(tasks: &[Task]) -> Vec<&str> {
        tasks.iter().map(|t| t.title.as_str()).collect()
    }

    #[test]
    fn test_newest_and_title_sort() {
        let tasks = vec![task("Alpha", "", 0), task("Beta", "", 10)];

        let newest = TaskQuery::default().apply(&tasks);
        assert_eq!(titles(&newest), vec!["Beta", "Alpha"]);

        let oldest = TaskQuery {
            sort: SortOption::Oldest,
            ..Default::default()
        }
        .apply(&tasks);
        assert_eq!(titles(&oldest), vec!["Alpha", "Beta"]);

        let by_title = TaskQuery {
            sort: SortOption::Title,
            ..Default::default()
        }
        .apply(&[task("Beta", "", 0), task("alpha", "", 1)]);
        assert_eq!(titles(&by_title), vec!["alpha", "Beta"]);
    }

    #[test]
    fn test_priority_sort_is_stable() {
        let mut low = task("low", "", 0);
        low.priority = Some(TaskPriority::Low);
        let mut high = task("high", "", 1);
        high.priority = Some(TaskPriority::High);
        let mut unknown = task("unknown", "", 2);
        unknown.priority = None;
        let first_medium = task("medium-1", "", 3);
        let second_medium = task("medium-2", "", 4);

        let sorted = TaskQuery {
            sort: SortOption::Priority,
            ..Default::default()
        }
        .apply(&[unknown, first_medium, low, high, second_medium]);

        assert_eq!(
            titles(&sorted),
            vec!["high", "medium-1", "medium-2", "low", "unknown"]
        );
    }

    #[test]
    fn test_search_matches_title_or_description() {
        let tasks = vec![
            task("Migration to v2", "", 0),
            task("Review budget", "", 1),
            task("Plan", "database MIGRATION notes", 2),
        ];

        let query = TaskQuery {
            search: "mig".to_string(),
            ..Default::default()
        };
        let found = query.apply(&tasks);

        assert_eq!(found.len(), 2);
        assert!(found.iter().any(|t| t.title == "Migration to v2"));
        assert!(found.iter().all(|t| t.title != "Review budget"));
    }

    #[test]
    fn test_blank_search_passes_all() {
        let tasks = vec![task("a", "", 0), task("b", "", 1)];
        let query = TaskQuery {
            search: "   ".to_string(),
            ..Default::default()
        };
        assert_eq!(query.apply(&tasks).len(), 2);
    }

    #[test]
    fn test_category_filter() {
        let mut shopping = task("milk", "", 0);
        shopping.category = TaskCategory::Shopping;
        let tasks = vec![shopping, task("report", "", 1)];

        let query = TaskQuery {
            category: CategoryFilter::Only(TaskCategory::Shopping),
            ..Default::default()
        };
        assert_eq!(titles(&query.apply(&tasks)), vec!["milk"]);
    }

    #[test]
    fn test_group_by_status() {
        let mut doing = task("doing", "", 0);
        doing.status = TaskStatus::InProgress;
        let mut done = task("done", "", 1);
        done.status = TaskStatus::Completed;
        let todo = task("todo", "", 2);

        let buckets = Buckets::group(vec![doing, done, todo]);
        assert_eq!(titles(buckets.bucket(TaskStatus::Todo)), vec!["todo"]);
        assert_eq!(titles(buckets.bucket(TaskStatus::InProgress)), vec!["doing"]);
        assert_eq!(titles(buckets.bucket(TaskStatus::Completed)), vec!["done"]);
        assert_eq!(buckets.len(), 3);
    }

    #[test]
    fn test_drop_event() {
        let id = Uuid::new_v4();
        let same = DropEvent {
            task_id: id,
            source: TaskStatus::Todo,
            target: TaskStatus::Todo,
        };
        assert!(same.status_change().is_none());

        let moved = DropEvent {
            task_id: id,
            source: TaskStatus::Todo,
            target: TaskStatus::Completed,
        };
        assert_eq!(
            moved.status_change(),
            Some(TaskPatch::status(TaskStatus::Completed))
        );
    }

    #[test]
    fn test_sort_option_parse() {
        assert_eq!("priority".parse::<SortOption>().unwrap(), SortOption::Priority);
        assert!("random".parse::<SortOption>().is_err());
    }
}
