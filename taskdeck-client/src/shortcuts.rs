/// Keyboard shortcut registry
///
/// Components register shortcuts when they mount and unregister them when they
/// unmount. Key events are routed through [`ShortcutRegistry::handle_key`].
///
/// # Rules
///
/// - Keys typed into text inputs, text areas and editable content are ignored
/// - Keys match case-insensitively
/// - A matched shortcut closes the help overlay before running
/// - `?` toggles the help overlay
///
/// # Example
///
/// ```
/// use taskdeck_client::shortcuts::{KeyTarget, Shortcut, ShortcutCategory, ShortcutRegistry};
///
/// let registry = ShortcutRegistry::new();
/// registry.register(Shortcut::new("n", "New task", ShortcutCategory::Global, || {}));
///
/// assert!(registry.handle_key("N", KeyTarget::Document));
/// assert!(!registry.handle_key("n", KeyTarget::TextInput));
/// ```

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};
use tokio::sync::watch;

/// Key that toggles the help overlay
pub const HELP_KEY: &str = "?";

/// Group shown in the help overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShortcutCategory {
    Global,
    TaskBoard,
}

/// Element that had focus when the key was pressed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyTarget {
    Document,
    TextInput,
    TextArea,
    ContentEditable,
}

impl KeyTarget {
    pub fn is_editable(&self) -> bool {
        !matches!(self, KeyTarget::Document)
    }
}

pub type ShortcutAction = Arc<dyn Fn() + Send + Sync>;

#[derive(Clone)]
pub struct Shortcut {
    pub key: String,
    pub description: String,
    pub category: ShortcutCategory,
    pub action: ShortcutAction,
}

impl Shortcut {
    pub fn new(
        key: impl Into<String>,
        description: impl Into<String>,
        category: ShortcutCategory,
        action: impl Fn() + Send + Sync + 'static,
    ) -> Self {
        Self {
            key: key.into(),
            description: description.into(),
            category,
            action: Arc::new(action),
        }
    }
}

impl fmt::Debug for Shortcut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shortcut")
            .field("key", &self.key)
            .field("description", &self.description)
            .field("category", &self.category)
            .finish_non_exhaustive()
    }
}

struct RegistryInner {
    shortcuts: Mutex<Vec<Shortcut>>,
    help_open: watch::Sender<bool>,
}

/// Shared shortcut registry handle
#[derive(Clone)]
pub struct ShortcutRegistry {
    inner: Arc<RegistryInner>,
}

static GLOBAL: OnceLock<ShortcutRegistry> = OnceLock::new();

impl ShortcutRegistry {
    pub fn new() -> Self {
        let (help_open, _) = watch::channel(false);
        Self {
            inner: Arc::new(RegistryInner {
                shortcuts: Mutex::new(Vec::new()),
                help_open,
            }),
        }
    }

    /// Process-wide registry
    pub fn global() -> ShortcutRegistry {
        GLOBAL.get_or_init(ShortcutRegistry::new).clone()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Shortcut>> {
        match self.inner.shortcuts.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    pub fn register(&self, shortcut: Shortcut) {
        tracing::debug!(key = %shortcut.key, category = ?shortcut.category, "Shortcut registered");
        self.lock().push(shortcut);
    }

    /// Removes the shortcuts of `category`, or all of them
    pub fn unregister(&self, category: Option<ShortcutCategory>) {
        let mut shortcuts = self.lock();
        match category {
            Some(category) => shortcuts.retain(|s| s.category != category),
            None => shortcuts.clear(),
        }
    }

    pub fn shortcuts(&self) -> Vec<Shortcut> {
        self.lock().clone()
    }

    /// Dispatches a key press; returns true if it was handled
    pub fn handle_key(&self, key: &str, target: KeyTarget) -> bool {
        if target.is_editable() {
            return false;
        }

        if key == HELP_KEY {
            self.toggle_help();
            return true;
        }

        let action = self
            .lock()
            .iter()
            .find(|s| s.key.eq_ignore_ascii_case(key))
            .map(|s| Arc::clone(&s.action));

        match action {
            Some(action) => {
                self.inner.help_open.send_replace(false);
                action();
                true
            }
            None => false,
        }
    }

    pub fn toggle_help(&self) {
        self.inner.help_open.send_modify(|open| *open = !*open);
    }

    pub fn is_help_open(&self) -> bool {
        *self.inner.help_open.borrow()
    }

    pub fn subscribe_help(&self) -> watch::Receiver<bool> {
        self.inner.help_open.subscribe()
    }
}

impl Default for ShortcutRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting(key: &str, category: ShortcutCategory, hits: &Arc<AtomicUsize>) -> Shortcut {
        let hits = Arc::clone(hits);
        Shortcut::new(key, "count", category, move || {
            hits.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn test_editable_targets_are_ignored() {
        let registry = ShortcutRegistry::new();
        let hits = Arc::new(AtomicUsize::new(0));
        registry.register(counting("f", ShortcutCategory::Global, &hits));

        for target in [KeyTarget::TextInput, KeyTarget::TextArea, KeyTarget::ContentEditable] {
            assert!(!registry.handle_key("f", target));
        }
        assert!(registry.handle_key("F", KeyTarget::Document));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_help_toggle_and_close_on_action() {
        let registry = ShortcutRegistry::new();
        let hits = Arc::new(AtomicUsize::new(0));
        registry.register(counting("n", ShortcutCategory::Global, &hits));

        registry.handle_key("?", KeyTarget::Document);
        assert!(registry.is_help_open());

        registry.handle_key("n", KeyTarget::Document);
        assert!(!registry.is_help_open());
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        assert!(!registry.handle_key("x", KeyTarget::Document));
    }

    #[test]
    fn test_unregister_by_category() {
        let registry = ShortcutRegistry::new();
        let hits = Arc::new(AtomicUsize::new(0));
        registry.register(counting("n", ShortcutCategory::Global, &hits));
        registry.register(counting("d", ShortcutCategory::TaskBoard, &hits));

        registry.unregister(Some(ShortcutCategory::Global));
        assert_eq!(registry.shortcuts().len(), 1);
        assert_eq!(registry.shortcuts()[0].key, "d");

        registry.unregister(None);
        assert!(registry.shortcuts().is_empty());
    }

    #[test]
    fn test_action_may_reenter_registry() {
        let registry = ShortcutRegistry::new();
        let inner = registry.clone();
        registry.register(Shortcut::new("c", "clear", ShortcutCategory::Global, move || {
            inner.unregister(None);
        }));

        assert!(registry.handle_key("c", KeyTarget::Document));
        assert!(registry.shortcuts().is_empty());
    }
}
