//! Bookkeeping for several open projects.

use std::path::Path;

use log::warn;

use crate::config::EditorConfig;
use crate::context::Context;

/// All open projects, one [`Context`] each, plus which one has focus.
#[derive(Debug, Default)]
pub struct ContextManager {
    config: EditorConfig,
    contexts: Vec<Context>,
    active: Option<usize>,
}

impl ContextManager {
    /// No projects open; new ones use `config`.
    pub fn new(config: EditorConfig) -> Self {
        ContextManager {
            config,
            contexts: Vec::new(),
            active: None,
        }
    }

    /// Number of open projects.
    pub fn len(&self) -> usize {
        self.contexts.len()
    }

    /// Whether no project is open.
    pub fn is_empty(&self) -> bool {
        self.contexts.is_empty()
    }

    /// Open projects in the order they were opened.
    pub fn iter(&self) -> impl Iterator<Item = &Context> {
        self.contexts.iter()
    }

    /// Index of the focused project.
    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    /// The focused project, if any.
    pub fn active(&self) -> Option<&Context> {
        self.active.and_then(|i| self.contexts.get(i))
    }

    /// Mutable access to the focused project.
    pub fn active_mut(&mut self) -> Option<&mut Context> {
        self.active.and_then(|i| self.contexts.get_mut(i))
    }

    /// Focuses the project at `index`; `false` if there is none.
    pub fn set_active(&mut self, index: usize) -> bool {
        if index >= self.contexts.len() {
            warn!("No open project at index {}", index);
            return false;
        }
        self.active = Some(index);
        true
    }

    /// Opens a fresh project and focuses it.
    pub fn open_new(&mut self, name: &str, width: u32, height: u32) -> usize {
        let mut ctx = Context::new(self.config.clone());
        ctx.new_project(name, width, height);
        self.push(ctx)
    }

    /// Loads `path` into a new context and focuses it; `None` if loading fails.
    pub fn open_file(&mut self, path: impl AsRef<Path>) -> Option<usize> {
        let mut ctx = Context::new(self.config.clone());
        if !ctx.load_project(path) {
            return None;
        }
        Some(self.push(ctx))
    }

    fn push(&mut self, ctx: Context) -> usize {
        self.contexts.push(ctx);
        let index = self.contexts.len() - 1;
        self.active = Some(index);
        index
    }

    /// Closes a project. Focus stays on the same project where possible,
    /// otherwise moves to its neighbour.
    pub fn close(&mut self, index: usize) -> Option<Context> {
        if index >= self.contexts.len() {
            warn!("No open project at index {}", index);
            return None;
        }
        let ctx = self.contexts.remove(index);
        self.active = match self.active {
            _ if self.contexts.is_empty() => None,
            Some(a) if a > index => Some(a - 1),
            Some(a) => Some(a.min(self.contexts.len() - 1)),
            None => None,
        };
        Some(ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(manager: &ContextManager) -> Vec<String> {
        manager.iter().map(|c| c.project().name.clone()).collect()
    }

    #[test]
    fn open_focuses_newest() {
        let mut manager = ContextManager::default();
        assert!(manager.active().is_none());
        manager.open_new("a", 2, 2);
        manager.open_new("b", 2, 2);
        assert_eq!(manager.active_index(), Some(1));
        assert_eq!(manager.active().unwrap().project().name, "b");
    }

    #[test]
    fn close_adjusts_focus() {
        let mut manager = ContextManager::default();
        for name in ["a", "b", "c"] {
            manager.open_new(name, 1, 1);
        }
        manager.set_active(2);
        manager.close(0);
        assert_eq!(names(&manager), ["b", "c"]);
        assert_eq!(manager.active().unwrap().project().name, "c");

        manager.close(1);
        assert_eq!(manager.active().unwrap().project().name, "b");
        manager.close(0);
        assert!(manager.is_empty());
        assert!(manager.active().is_none());
        assert!(manager.close(0).is_none());
    }

    #[test]
    fn failed_open_adds_nothing() {
        let mut manager = ContextManager::default();
        assert!(manager.open_file("missing/project.json").is_none());
        assert!(manager.is_empty());
        assert!(!manager.set_active(0));
    }

    #[test]
    fn contexts_are_independent() {
        let mut manager = ContextManager::default();
        manager.open_new("a", 2, 2);
        manager.open_new("b", 2, 2);
        manager.active_mut().unwrap().add_layer("extra");
        manager.set_active(0);
        assert_eq!(manager.active().unwrap().layer_stack().layer_count(), 1);
    }
}
