//! Bounded undo/redo record of executed commands.

use std::collections::VecDeque;

use crate::command::Command;
use crate::stack::LayerStack;
use log::debug;

/// Default bound for each of the undo and redo stacks.
pub const MAX_HISTORY: usize = 1000;

/// Bounded undo/redo stacks. When a stack is full the oldest entry is dropped.
#[derive(Debug)]
pub struct CommandHistory {
    undo_stack: VecDeque<Command>,
    redo_stack: VecDeque<Command>,
    capacity: usize,
}

impl Default for CommandHistory {
    fn default() -> Self {
        CommandHistory::new()
    }
}

impl CommandHistory {
    /// History bounded at [`MAX_HISTORY`] entries per stack.
    pub fn new() -> Self {
        CommandHistory::with_capacity(MAX_HISTORY)
    }

    /// History bounded at `capacity` entries per stack; at least 1.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        CommandHistory {
            undo_stack: VecDeque::new(),
            redo_stack: VecDeque::new(),
            capacity,
        }
    }

    /// Bound on each stack.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Whether `undo` would do anything.
    #[inline]
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Whether `redo` would do anything.
    #[inline]
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Number of edits that can be undone.
    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    /// Number of edits that can be redone.
    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    /// Label of the edit `undo` would revert.
    pub fn last_undo_name(&self) -> Option<&'static str> {
        self.undo_stack.back().map(Command::name)
    }

    /// Label of the edit `redo` would re-apply.
    pub fn last_redo_name(&self) -> Option<&'static str> {
        self.redo_stack.back().map(Command::name)
    }

    fn push_bounded(stack: &mut VecDeque<Command>, cmd: Command, capacity: usize) {
        stack.push_back(cmd);
        while stack.len() > capacity {
            stack.pop_front();
        }
    }

    /// Runs `cmd` and records it. If the top of the undo stack reports `cmd`
    /// as redundant, `cmd` is dropped without running and `false` is returned.
    /// A recorded edit discards everything that could have been redone.
    pub fn execute(&mut self, mut cmd: Command, stack: &mut LayerStack) -> bool {
        if let Some(top) = self.undo_stack.back() {
            if top.validate(&cmd) {
                debug!("Dropping redundant {}", cmd.name());
                return false;
            }
        }

        debug!("Execute {}", cmd.name());
        cmd.execute(stack);
        Self::push_bounded(&mut self.undo_stack, cmd, self.capacity);
        self.redo_stack.clear();
        true
    }

    /// Reverts the newest edit and moves it to the redo stack.
    /// Returns `false` when there is nothing to undo.
    pub fn undo(&mut self, stack: &mut LayerStack) -> bool {
        let Some(mut cmd) = self.undo_stack.pop_back() else {
            return false;
        };
        debug!("Undo {}", cmd.name());
        cmd.undo(stack);
        Self::push_bounded(&mut self.redo_stack, cmd, self.capacity);
        true
    }

    /// Re-applies the newest undone edit. Returns `false` when there is none.
    pub fn redo(&mut self, stack: &mut LayerStack) -> bool {
        let Some(mut cmd) = self.redo_stack.pop_back() else {
            return false;
        };
        debug!("Redo {}", cmd.name());
        cmd.execute(stack);
        Self::push_bounded(&mut self.undo_stack, cmd, self.capacity);
        true
    }

    /// Forgets every recorded edit.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}
