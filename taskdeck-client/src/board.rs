/// Task board view-model
///
/// Combines the task store with the filter inputs, the editor dialog and the
/// board's keyboard shortcuts. Everything the board renders is derived on
/// demand from the store's current collection and the current [`TaskQuery`].
///
/// # Shortcuts
///
/// Registered under [`ShortcutCategory::Global`] while mounted:
///
/// | Key | Action            |
/// |-----|-------------------|
/// | `n` | open the editor   |
/// | `f` | focus the search  |

use std::sync::Arc;
use tokio::sync::watch;
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::{ClientError, ClientResult},
    shortcuts::{Shortcut, ShortcutCategory, ShortcutRegistry},
    stores::{auth::AuthStore, task::TaskStore},
};
use taskdeck_shared::{
    auth::authorization::{require_roles, TASK_EDITORS},
    models::task::{Task, TaskCategory, TaskForm, TaskStatus},
    view::{Buckets, CategoryFilter, DropEvent, SortOption, TaskQuery},
};

/// State of the create/edit dialog
#[derive(Debug, Clone, Default, PartialEq)]
pub enum EditorState {
    #[default]
    Closed,
    Creating,
    Editing(Task),
}

impl EditorState {
    pub fn is_open(&self) -> bool {
        !matches!(self, EditorState::Closed)
    }

    /// Initial form contents for the dialog
    pub fn form(&self) -> TaskForm {
        match self {
            EditorState::Editing(task) => TaskForm::from_task(task),
            _ => TaskForm::default(),
        }
    }
}

#[derive(Clone)]
pub struct TaskBoard {
    tasks: TaskStore,
    auth: AuthStore,
    shortcuts: ShortcutRegistry,
    query: Arc<watch::Sender<TaskQuery>>,
    editor: Arc<watch::Sender<EditorState>>,
    search_focus: Arc<watch::Sender<u64>>,
}

impl TaskBoard {
    pub fn new(tasks: TaskStore, auth: AuthStore, shortcuts: ShortcutRegistry) -> Self {
        let (query, _) = watch::channel(TaskQuery::default());
        let (editor, _) = watch::channel(EditorState::Closed);
        let (search_focus, _) = watch::channel(0);

        Self {
            tasks,
            auth,
            shortcuts,
            query: Arc::new(query),
            editor: Arc::new(editor),
            search_focus: Arc::new(search_focus),
        }
    }

    /// Loads tasks and registers the board shortcuts
    pub async fn mount(&self) {
        let editor = Arc::clone(&self.editor);
        self.shortcuts.register(Shortcut::new(
            "n",
            "Create new task",
            ShortcutCategory::Global,
            move || {
                editor.send_replace(EditorState::Creating);
            },
        ));

        let search_focus = Arc::clone(&self.search_focus);
        self.shortcuts.register(Shortcut::new(
            "f",
            "Focus search",
            ShortcutCategory::Global,
            move || search_focus.send_modify(|requests| *requests += 1),
        ));

        self.tasks.fetch_all().await;
    }

    pub fn unmount(&self) {
        self.shortcuts.unregister(Some(ShortcutCategory::Global));
    }

    pub fn store(&self) -> &TaskStore {
        &self.tasks
    }

    pub fn query(&self) -> TaskQuery {
        self.query.borrow().clone()
    }

    pub fn subscribe_query(&self) -> watch::Receiver<TaskQuery> {
        self.query.subscribe()
    }

    pub fn set_search(&self, search: impl Into<String>) {
        let search = search.into();
        self.query.send_modify(|query| query.search = search);
    }

    pub fn set_category(&self, category: CategoryFilter) {
        self.query.send_modify(|query| query.category = category);
    }

    pub fn set_sort(&self, sort: SortOption) {
        self.query.send_modify(|query| query.sort = sort);
    }

    /// Clears search and category and restores the newest-first sort
    pub fn reset_filters(&self) {
        self.query.send_modify(|query| {
            query.search.clear();
            query.category = CategoryFilter::All;
            query.sort = SortOption::Newest;
        });
    }

    /// Filtered and sorted tasks
    pub fn visible_tasks(&self) -> Vec<Task> {
        self.query.borrow().apply(&self.tasks.tasks())
    }

    /// Visible tasks grouped into board columns
    pub fn buckets(&self) -> Buckets {
        Buckets::group(self.visible_tasks())
    }

    /// Whether the current user may create, edit, move and delete tasks
    pub fn can_edit(&self) -> bool {
        self.auth.role().is_some_and(|role| role.can_edit_tasks())
    }

    fn require_editor(&self) -> ClientResult<()> {
        let role = self.auth.role().ok_or(ClientError::NotAuthenticated)?;
        require_roles(role, TASK_EDITORS)?;
        Ok(())
    }

    /// Persists a card drop; returns false when nothing needed saving
    pub async fn drop_task(&self, event: DropEvent) -> ClientResult<bool> {
        let Some(patch) = event.status_change() else {
            return Ok(false);
        };
        self.require_editor()?;

        tracing::debug!(task_id = %event.task_id, from = %event.source, to = %event.target, "Task moved");
        self.tasks.update(event.task_id, patch).await?;
        Ok(true)
    }

    pub fn editor(&self) -> EditorState {
        self.editor.borrow().clone()
    }

    pub fn subscribe_editor(&self) -> watch::Receiver<EditorState> {
        self.editor.subscribe()
    }

    pub fn open_create(&self) {
        self.editor.send_replace(EditorState::Creating);
    }

    pub fn open_edit(&self, task: Task) {
        self.editor.send_replace(EditorState::Editing(task));
    }

    pub fn close_editor(&self) {
        self.editor.send_replace(EditorState::Closed);
    }

    /// Saves the dialog's form and closes it
    ///
    /// Creates a task unless an existing task is being edited. On error the
    /// dialog stays open.
    pub async fn submit(&self, form: TaskForm) -> ClientResult<Task> {
        form.validate()?;
        self.require_editor()?;

        let task = match self.editor() {
            EditorState::Editing(task) => self.tasks.update(task.id, form.into_patch()).await?,
            EditorState::Creating | EditorState::Closed => self.tasks.create(form.into_patch()).await?,
        };

        self.close_editor();
        Ok(task)
    }

    pub async fn delete_task(&self, id: Uuid) -> ClientResult<()> {
        self.require_editor()?;
        self.tasks.delete(id).await
    }

    /// Incremented each time the search box should take focus
    pub fn subscribe_search_focus(&self) -> watch::Receiver<u64> {
        self.search_focus.subscribe()
    }

    pub fn status_label(status: TaskStatus) -> &'static str {
        status.label()
    }

    pub fn category_label(category: TaskCategory) -> &'static str {
        category.label()
    }
}
