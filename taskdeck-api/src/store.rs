/// In-memory data store
///
/// Holds users, tasks and audit entries for every organization behind a single
/// `RwLock`. All task and audit queries are scoped to an organization; a task
/// from another organization behaves exactly like a missing one.
///
/// # Example
///
/// ```
/// use taskdeck_api::store::Store;
/// use taskdeck_shared::models::task::TaskForm;
/// use taskdeck_shared::models::user::{User, UserRole};
/// use uuid::Uuid;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store = Store::new();
/// let owner = User::new("owner@example.com", UserRole::Owner, Uuid::new_v4());
/// store.insert_user(owner.clone()).await;
///
/// let form = TaskForm {
///     title: "Ship v2".to_string(),
///     description: "Cut the release".to_string(),
///     ..Default::default()
/// };
/// let task = store.create_task(&owner, form).await;
/// assert_eq!(store.list_tasks(owner.organization_id).await.len(), 1);
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use taskdeck_shared::models::{
    audit_log::{AuditLogEntry, NewAuditEntry},
    task::{Task, TaskCategory, TaskForm, TaskPatch, TaskPriority, TaskStatus},
    user::{User, UserPatch, UserRole},
};

/// Error type for store operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// Record does not exist (or belongs to another organization)
    #[error("{0} not found")]
    NotFound(&'static str),
}

#[derive(Default)]
struct StoreInner {
    users: HashMap<Uuid, User>,

    /// Tasks in creation order
    tasks: Vec<Task>,

    /// Audit entries with their organization, in append order
    audit: Vec<(Uuid, AuditLogEntry)>,
}

/// Organization-scoped in-memory store
#[derive(Default)]
pub struct Store {
    inner: RwLock<StoreInner>,
}

/// Users created by [`Store::seed_demo`]
#[derive(Debug, Clone)]
pub struct DemoSeed {
    pub organization_id: Uuid,
    pub owner: User,
    pub admin: User,
    pub viewer: User,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a user
    pub async fn insert_user(&self, user: User) {
        self.inner.write().await.users.insert(user.id, user);
    }

    pub async fn find_user(&self, id: Uuid) -> Option<User> {
        self.inner.read().await.users.get(&id).cloned()
    }

    /// Applies a partial update to a user
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the user does not exist
    pub async fn update_user(&self, id: Uuid, patch: &UserPatch) -> Result<User, StoreError> {
        let mut inner = self.inner.write().await;
        let user = inner.users.get_mut(&id).ok_or(StoreError::NotFound("User"))?;
        patch.apply_to(user);
        Ok(user.clone())
    }

    /// Lists the tasks of an organization in creation order
    pub async fn list_tasks(&self, organization_id: Uuid) -> Vec<Task> {
        self.inner
            .read()
            .await
            .tasks
            .iter()
            .filter(|task| task.organization_id == organization_id)
            .cloned()
            .collect()
    }

    /// Creates a task in the creator's organization
    pub async fn create_task(&self, creator: &User, form: TaskForm) -> Task {
        let now = Utc::now();
        let task = Task {
            id: Uuid::new_v4(),
            title: form.title,
            description: form.description,
            category: form.category,
            status: form.status,
            priority: Some(form.priority),
            organization_id: creator.organization_id,
            created_by: creator.id,
            created_at: now,
            updated_at: now,
        };

        self.inner.write().await.tasks.push(task.clone());
        task
    }

    /// Updates a task of the organization
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if no such task exists in the organization
    pub async fn update_task(
        &self,
        organization_id: Uuid,
        id: Uuid,
        patch: &TaskPatch,
    ) -> Result<Task, StoreError> {
        let mut inner = self.inner.write().await;
        let task = inner
            .tasks
            .iter_mut()
            .find(|task| task.id == id && task.organization_id == organization_id)
            .ok_or(StoreError::NotFound("Task"))?;

        patch.apply_to(task);
        Ok(task.clone())
    }

    /// Deletes a task of the organization and returns it
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if no such task exists in the organization
    pub async fn delete_task(&self, organization_id: Uuid, id: Uuid) -> Result<Task, StoreError> {
        let mut inner = self.inner.write().await;
        let index = inner
            .tasks
            .iter()
            .position(|task| task.id == id && task.organization_id == organization_id)
            .ok_or(StoreError::NotFound("Task"))?;

        Ok(inner.tasks.remove(index))
    }

    /// Lists the audit log of an organization, newest first
    pub async fn list_audit(&self, organization_id: Uuid) -> Vec<AuditLogEntry> {
        self.inner
            .read()
            .await
            .audit
            .iter()
            .rev()
            .filter(|(org, _)| *org == organization_id)
            .map(|(_, entry)| entry.clone())
            .collect()
    }

    /// Appends an audit entry on behalf of `actor`
    pub async fn append_audit(&self, actor: &User, entry: NewAuditEntry) -> AuditLogEntry {
        let entry = AuditLogEntry {
            id: Uuid::new_v4(),
            user_id: actor.id,
            action: entry.action,
            resource_type: entry.resource_type.unwrap_or_else(|| "client".to_string()),
            resource_id: entry.resource_id,
            timestamp: Utc::now(),
            details: entry.details,
        };

        self.inner
            .write()
            .await
            .audit
            .push((actor.organization_id, entry.clone()));
        entry
    }

    /// Records a server-side action on a resource
    pub async fn record(
        &self,
        actor: &User,
        action: &str,
        resource_type: &str,
        resource_id: Uuid,
        details: Option<JsonValue>,
    ) -> AuditLogEntry {
        self.append_audit(
            actor,
            NewAuditEntry {
                action: action.to_string(),
                resource_type: Some(resource_type.to_string()),
                resource_id: Some(resource_id.to_string()),
                details,
            },
        )
        .await
    }

    /// Seeds one organization with an owner, an admin, a viewer and a few tasks
    pub async fn seed_demo(&self) -> DemoSeed {
        let organization_id = Uuid::new_v4();

        let mut owner = User::new("admin@test.com", UserRole::Owner, organization_id);
        owner.name = Some("Demo Owner".to_string());
        let mut admin = User::new("manager@test.com", UserRole::Admin, organization_id);
        admin.name = Some("Demo Admin".to_string());
        let mut viewer = User::new("user@test.com", UserRole::Viewer, organization_id);
        viewer.name = Some("Demo Viewer".to_string());

        for user in [&owner, &admin, &viewer] {
            self.insert_user(user.clone()).await;
        }

        let samples = [
            ("Migration to v2", "Move the API to the new schema", TaskCategory::Work, TaskStatus::InProgress, TaskPriority::High),
            ("Review budget", "Quarterly numbers for finance", TaskCategory::Work, TaskStatus::Todo, TaskPriority::Medium),
            ("Groceries", "Milk, eggs, coffee", TaskCategory::Shopping, TaskStatus::Todo, TaskPriority::Low),
            ("Book dentist", "Annual check-up", TaskCategory::Personal, TaskStatus::Completed, TaskPriority::Low),
        ];

        let base = Utc::now() - Duration::days(samples.len() as i64);
        let mut inner = self.inner.write().await;
        for (offset, (title, description, category, status, priority)) in samples.into_iter().enumerate() {
            let created_at = base + Duration::days(offset as i64);
            inner.tasks.push(Task {
                id: Uuid::new_v4(),
                title: title.to_string(),
                description: description.to_string(),
                category,
                status,
                priority: Some(priority),
                organization_id,
                created_by: owner.id,
                created_at,
                updated_at: created_at,
            });
        }

        DemoSeed {
            organization_id,
            owner,
            admin,
            viewer,
        }
    }
}
