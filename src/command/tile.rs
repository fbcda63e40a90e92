use crate::stack::LayerStack;
use crate::tile::Tile;
use log::warn;

/// Resolves a command's target cell, or `None` if it no longer exists.
pub(crate) fn target(stack: &LayerStack, layer: usize, x: i32, y: i32) -> Option<(u32, u32)> {
    if !stack.is_valid_layer_index(layer) || !stack.is_valid_position(x, y) {
        return None;
    }
    Some((x as u32, y as u32))
}

/// Paints one cell with `tile`.
#[derive(Debug, Clone)]
pub struct TilePaintCommand {
    /// Column on the grid
    pub x: i32,
    /// Row on the grid
    pub y: i32,
    /// Target layer
    pub layer: usize,
    /// Tile to write
    pub tile: Tile,
    previous: Option<Tile>,
}

impl TilePaintCommand {
    /// Paint of `tile` at `(x, y)` on `layer`.
    pub fn new(x: i32, y: i32, layer: usize, tile: Tile) -> Self {
        TilePaintCommand {
            x,
            y,
            layer,
            tile,
            previous: None,
        }
    }

    /// Writes the tile, remembering what it replaced.
    pub fn execute(&mut self, stack: &mut LayerStack) {
        let Some((x, y)) = target(stack, self.layer, self.x, self.y) else {
            warn!(
                "Paint at ({}, {}) on layer {} is outside the grid",
                self.x, self.y, self.layer
            );
            return;
        };
        let current = stack.get_tile_mut(self.layer, x, y);
        if self.previous.is_none() {
            self.previous = Some(*current);
        }
        if *current == self.tile {
            return;
        }
        *current = self.tile;
    }

    /// Puts back the replaced tile.
    pub fn undo(&mut self, stack: &mut LayerStack) {
        let (Some(previous), Some((x, y))) =
            (self.previous, target(stack, self.layer, self.x, self.y))
        else {
            return;
        };
        *stack.get_tile_mut(self.layer, x, y) = previous;
    }

    /// Paints are never merged.
    pub fn validate(&self, _other: &Self) -> bool {
        false
    }
}

/// Resets one cell to the empty tile.
#[derive(Debug, Clone)]
pub struct TileEraseCommand {
    /// Column on the grid
    pub x: i32,
    /// Row on the grid
    pub y: i32,
    /// Target layer
    pub layer: usize,
    previous: Option<Tile>,
}

impl TileEraseCommand {
    /// Erase of the cell at `(x, y)` on `layer`.
    pub fn new(x: i32, y: i32, layer: usize) -> Self {
        TileEraseCommand {
            x,
            y,
            layer,
            previous: None,
        }
    }

    /// Resets the cell, remembering what it held.
    pub fn execute(&mut self, stack: &mut LayerStack) {
        let Some((x, y)) = target(stack, self.layer, self.x, self.y) else {
            warn!(
                "Erase at ({}, {}) on layer {} is outside the grid",
                self.x, self.y, self.layer
            );
            return;
        };
        let current = stack.get_tile_mut(self.layer, x, y);
        if self.previous.is_none() {
            self.previous = Some(*current);
        }
        if current.is_default() {
            return;
        }
        current.reset();
    }

    /// Puts back the erased tile.
    pub fn undo(&mut self, stack: &mut LayerStack) {
        let (Some(previous), Some((x, y))) =
            (self.previous, target(stack, self.layer, self.x, self.y))
        else {
            return;
        };
        *stack.get_tile_mut(self.layer, x, y) = previous;
    }

    /// Erases are never merged.
    pub fn validate(&self, _other: &Self) -> bool {
        false
    }
}
