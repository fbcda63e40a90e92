use crate::layer::TileLayer;
use crate::stack::LayerStack;
use log::warn;

/// Appends a layer. An empty name becomes `"Layer {n}"`, `n` being the
/// layer count at first execution.
#[derive(Debug, Clone)]
pub struct LayerAddCommand {
    /// Name of the new layer; filled in on first execute when empty
    pub name: String,
    index: Option<usize>,
}

impl LayerAddCommand {
    /// An empty `name` is resolved on first execute.
    pub fn new(name: impl Into<String>) -> Self {
        LayerAddCommand {
            name: name.into(),
            index: None,
        }
    }

    /// Where the layer was placed, once executed.
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    /// Appends the layer, or re-inserts it where it first landed.
    pub fn execute(&mut self, stack: &mut LayerStack) {
        match self.index {
            None => {
                if self.name.is_empty() {
                    self.name = format!("Layer {}", stack.layer_count());
                }
                self.index = Some(stack.add_layer(&self.name));
            }
            Some(index) => {
                stack.insert_layer(index, &self.name);
            }
        }
    }

    /// Removes the added layer.
    pub fn undo(&mut self, stack: &mut LayerStack) {
        if let Some(index) = self.index {
            stack.remove_layer(index);
        }
    }

    /// Adds are never merged.
    pub fn validate(&self, _other: &Self) -> bool {
        false
    }
}

/// Inserts a layer at `index` (clamped to the stack).
#[derive(Debug, Clone)]
pub struct LayerInsertCommand {
    /// Requested position
    pub index: usize,
    /// Name of the new layer
    pub name: String,
    placed: Option<usize>,
}

impl LayerInsertCommand {
    /// Insert of `name` at `index`.
    pub fn new(index: usize, name: impl Into<String>) -> Self {
        LayerInsertCommand {
            index,
            name: name.into(),
            placed: None,
        }
    }

    /// Where the layer was placed, once executed.
    pub fn placed(&self) -> Option<usize> {
        self.placed
    }

    /// Inserts the layer, reusing the resolved index on redo.
    pub fn execute(&mut self, stack: &mut LayerStack) {
        match self.placed {
            None => {
                if self.name.is_empty() {
                    self.name = format!("Layer {}", stack.layer_count());
                }
                self.placed = Some(stack.insert_layer(self.index, &self.name));
            }
            Some(index) => {
                stack.insert_layer(index, &self.name);
            }
        }
    }

    /// Removes the inserted layer.
    pub fn undo(&mut self, stack: &mut LayerStack) {
        if let Some(index) = self.placed {
            stack.remove_layer(index);
        }
    }

    /// Inserts are never merged.
    pub fn validate(&self, _other: &Self) -> bool {
        false
    }
}

/// Removes a layer, keeping it so undo can put it back in place.
#[derive(Debug, Clone)]
pub struct LayerDeleteCommand {
    /// Layer to remove
    pub index: usize,
    removed: Option<TileLayer>,
}

impl LayerDeleteCommand {
    /// Deletion of the layer at `index`.
    pub fn new(index: usize) -> Self {
        LayerDeleteCommand {
            index,
            removed: None,
        }
    }

    /// Removes the layer; an invalid index removes nothing.
    pub fn execute(&mut self, stack: &mut LayerStack) {
        self.removed = stack.remove_layer(self.index);
    }

    /// Re-inserts the removed layer with its content.
    pub fn undo(&mut self, stack: &mut LayerStack) {
        let Some(layer) = self.removed.take() else {
            return;
        };
        let index = stack.insert_layer(self.index, &layer.name);
        stack.replace_layer(index, layer);
    }

    /// Deletes are never merged.
    pub fn validate(&self, _other: &Self) -> bool {
        false
    }
}

/// Empties a layer, keeping its prior content for undo.
#[derive(Debug, Clone)]
pub struct LayerClearCommand {
    /// Layer to clear
    pub index: usize,
    snapshot: Option<TileLayer>,
}

impl LayerClearCommand {
    /// Clear of the layer at `index`.
    pub fn new(index: usize) -> Self {
        LayerClearCommand {
            index,
            snapshot: None,
        }
    }

    /// Resets every tile, snapshotting the layer the first time.
    pub fn execute(&mut self, stack: &mut LayerStack) {
        if !stack.is_valid_layer_index(self.index) {
            warn!("Cannot clear layer {}: out of range", self.index);
            return;
        }
        if self.snapshot.is_none() {
            self.snapshot = Some(stack.get_layer(self.index).clone());
        }
        stack.clear_layer(self.index);
    }

    /// Restores the snapshot.
    pub fn undo(&mut self, stack: &mut LayerStack) {
        if let Some(snapshot) = &self.snapshot {
            stack.replace_layer(self.index, snapshot.clone());
        }
    }

    /// Clears are never merged.
    pub fn validate(&self, _other: &Self) -> bool {
        false
    }
}

/// Moves a layer one step toward the bottom (`index - 1`).
#[derive(Debug, Clone)]
pub struct LayerMoveUpCommand {
    /// Layer to move
    pub index: usize,
    moved: bool,
}

impl LayerMoveUpCommand {
    /// Move of the layer at `index` toward the bottom.
    pub fn new(index: usize) -> Self {
        LayerMoveUpCommand {
            index,
            moved: false,
        }
    }

    /// Swaps with the layer below, if there is one.
    pub fn execute(&mut self, stack: &mut LayerStack) {
        self.moved = stack.move_layer_up(self.index);
    }

    /// Moves the layer back if it actually moved.
    pub fn undo(&mut self, stack: &mut LayerStack) {
        if self.moved {
            stack.move_layer_down(self.index - 1);
            self.moved = false;
        }
    }

    /// Moves are never merged.
    pub fn validate(&self, _other: &Self) -> bool {
        false
    }
}

/// Moves a layer one step toward the top (`index + 1`).
#[derive(Debug, Clone)]
pub struct LayerMoveDownCommand {
    /// Layer to move
    pub index: usize,
    moved: bool,
}

impl LayerMoveDownCommand {
    /// Move of the layer at `index` toward the top.
    pub fn new(index: usize) -> Self {
        LayerMoveDownCommand {
            index,
            moved: false,
        }
    }

    /// Swaps with the layer above, if there is one.
    pub fn execute(&mut self, stack: &mut LayerStack) {
        self.moved = stack.move_layer_down(self.index);
    }

    /// Moves the layer back if it actually moved.
    pub fn undo(&mut self, stack: &mut LayerStack) {
        if self.moved {
            stack.move_layer_up(self.index + 1);
            self.moved = false;
        }
    }

    /// Moves are never merged.
    pub fn validate(&self, _other: &Self) -> bool {
        false
    }
}

/// Swaps two layers. Its own inverse.
#[derive(Debug, Clone)]
pub struct LayerSwapCommand {
    /// First layer
    pub a: usize,
    /// Second layer
    pub b: usize,
}

impl LayerSwapCommand {
    /// Swap of layers `a` and `b`.
    pub fn new(a: usize, b: usize) -> Self {
        LayerSwapCommand { a, b }
    }

    /// Swaps the two layers; out-of-range indices do nothing.
    pub fn execute(&mut self, stack: &mut LayerStack) {
        stack.swap_layers(self.a, self.b);
    }

    /// Swaps them back.
    pub fn undo(&mut self, stack: &mut LayerStack) {
        stack.swap_layers(self.a, self.b);
    }

    /// Swaps are never merged.
    pub fn validate(&self, _other: &Self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile::Tile;
    use macroquad::math::vec4;

    fn names(stack: &LayerStack) -> Vec<String> {
        stack.layers().iter().map(|l| l.name.clone()).collect()
    }

    fn stack_abc() -> LayerStack {
        let mut stack = LayerStack::new(2, 2);
        for name in ["a", "b", "c"] {
            stack.add_layer(name);
        }
        stack
    }

    #[test]
    fn add_names_layers_by_count() {
        let mut stack = LayerStack::new(2, 2);
        let mut first = LayerAddCommand::new("");
        let mut second = LayerAddCommand::new("");
        first.execute(&mut stack);
        second.execute(&mut stack);
        assert_eq!(names(&stack), ["Layer 0", "Layer 1"]);

        second.undo(&mut stack);
        assert_eq!(names(&stack), ["Layer 0"]);

        second.execute(&mut stack);
        assert_eq!(names(&stack), ["Layer 0", "Layer 1"]);
    }

    #[test]
    fn insert_replays_at_resolved_index() {
        let mut stack = stack_abc();
        let mut cmd = LayerInsertCommand::new(50, "top");
        cmd.execute(&mut stack);
        assert_eq!(cmd.placed(), Some(3));
        cmd.undo(&mut stack);
        assert_eq!(names(&stack), ["a", "b", "c"]);
        cmd.execute(&mut stack);
        assert_eq!(names(&stack), ["a", "b", "c", "top"]);
    }

    #[test]
    fn delete_restores_layer_and_content() {
        let mut stack = stack_abc();
        let t = Tile::colored(vec4(0.0, 0.0, 1.0, 1.0));
        *stack.get_tile_mut(1, 1, 0) = t;
        let before = stack.clone();

        let mut cmd = LayerDeleteCommand::new(1);
        cmd.execute(&mut stack);
        assert_eq!(names(&stack), ["a", "c"]);
        cmd.undo(&mut stack);
        assert_eq!(stack, before);

        cmd.execute(&mut stack);
        assert_eq!(names(&stack), ["a", "c"]);
    }

    #[test]
    fn delete_invalid_index_undo_is_harmless() {
        let mut stack = stack_abc();
        let before = stack.clone();
        let mut cmd = LayerDeleteCommand::new(9);
        cmd.execute(&mut stack);
        cmd.undo(&mut stack);
        assert_eq!(stack, before);
    }

    #[test]
    fn clear_and_undo() {
        let mut stack = stack_abc();
        *stack.get_tile_mut(0, 0, 0) = Tile::colored(vec4(1.0, 1.0, 0.0, 1.0));
        let before = stack.clone();

        let mut cmd = LayerClearCommand::new(0);
        cmd.execute(&mut stack);
        assert!(stack.get_layer(0).tiles().iter().all(Tile::is_default));
        cmd.undo(&mut stack);
        assert_eq!(stack, before);
    }

    #[test]
    fn moves_invert_and_respect_bounds() {
        let mut stack = stack_abc();
        let mut up = LayerMoveUpCommand::new(2);
        up.execute(&mut stack);
        assert_eq!(names(&stack), ["a", "c", "b"]);
        up.undo(&mut stack);
        assert_eq!(names(&stack), ["a", "b", "c"]);

        let mut down = LayerMoveDownCommand::new(0);
        down.execute(&mut stack);
        assert_eq!(names(&stack), ["b", "a", "c"]);
        down.undo(&mut stack);
        assert_eq!(names(&stack), ["a", "b", "c"]);

        let mut stuck_up = LayerMoveUpCommand::new(0);
        stuck_up.execute(&mut stack);
        stuck_up.undo(&mut stack);
        let mut stuck_down = LayerMoveDownCommand::new(2);
        stuck_down.execute(&mut stack);
        stuck_down.undo(&mut stack);
        assert_eq!(names(&stack), ["a", "b", "c"]);
    }

    #[test]
    fn move_with_maximal_index_does_nothing() {
        let mut stack = stack_abc();
        let mut down = LayerMoveDownCommand::new(usize::MAX);
        down.execute(&mut stack);
        down.undo(&mut stack);
        let mut up = LayerMoveUpCommand::new(usize::MAX);
        up.execute(&mut stack);
        up.undo(&mut stack);
        assert_eq!(names(&stack), ["a", "b", "c"]);
    }

    #[test]
    fn swap_is_self_inverse() {
        let mut stack = stack_abc();
        let mut cmd = LayerSwapCommand::new(0, 2);
        cmd.execute(&mut stack);
        assert_eq!(names(&stack), ["c", "b", "a"]);
        cmd.undo(&mut stack);
        assert_eq!(names(&stack), ["a", "b", "c"]);
    }
}
