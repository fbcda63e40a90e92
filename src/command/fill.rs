use std::collections::VecDeque;

use crate::layer::TileLayer;
use crate::stack::LayerStack;
use crate::tile::Tile;
use log::{debug, warn};

use super::tile::target;

/// Flood fills the 4-connected region around `(x, y)` that matches the seed tile.
#[derive(Debug, Clone)]
pub struct LayerFillCommand {
    /// Seed column
    pub x: i32,
    /// Seed row
    pub y: i32,
    /// Layer to fill
    pub layer: usize,
    /// Tile written over the region
    pub tile: Tile,
    snapshot: Option<TileLayer>,
}

impl LayerFillCommand {
    /// Fill at `(x, y)` on `layer`; nothing is captured until executed.
    pub fn new(x: i32, y: i32, layer: usize, tile: Tile) -> Self {
        LayerFillCommand {
            x,
            y,
            layer,
            tile,
            snapshot: None,
        }
    }

    /// Fills the region, snapshotting the layer the first time.
    pub fn execute(&mut self, stack: &mut LayerStack) {
        let Some((x, y)) = target(stack, self.layer, self.x, self.y) else {
            warn!(
                "Fill at ({}, {}) on layer {} is outside the grid",
                self.x, self.y, self.layer
            );
            return;
        };

        let snapshot = self
            .snapshot
            .get_or_insert_with(|| stack.get_layer(self.layer).clone());
        if *stack.get_tile(self.layer, x, y) == self.tile {
            return;
        }

        let (filled, count) = flood_fill(snapshot, x, y, self.tile);
        debug!("Filled {} tiles on layer {}", count, self.layer);
        stack.replace_layer(self.layer, filled);
    }

    /// Restores the snapshot.
    pub fn undo(&mut self, stack: &mut LayerStack) {
        if let Some(snapshot) = &self.snapshot {
            stack.replace_layer(self.layer, snapshot.clone());
        }
    }

    /// Fills are never merged.
    pub fn validate(&self, _other: &Self) -> bool {
        false
    }
}

/// Breadth-first fill over a copy of `source`. Only tiles exactly equal to the
/// seed are replaced. Returns the new layer and how many tiles changed.
pub fn flood_fill(source: &TileLayer, x: u32, y: u32, fill: Tile) -> (TileLayer, usize) {
    let mut out = source.clone();
    let seed = *source.get_tile(x, y);
    if seed == fill {
        return (out, 0);
    }

    let (w, h) = (source.width(), source.height());
    let mut visited = vec![false; w as usize * h as usize];
    let mut queue = VecDeque::new();
    let mut count = 0;

    queue.push_back((x, y));
    visited[y as usize * w as usize + x as usize] = true;

    while let Some((cx, cy)) = queue.pop_front() {
        out.set_tile(cx, cy, fill);
        count += 1;

        let neighbors = [
            (cx.checked_sub(1), Some(cy)),
            (cx.checked_add(1), Some(cy)),
            (Some(cx), cy.checked_sub(1)),
            (Some(cx), cy.checked_add(1)),
        ];
        for (nx, ny) in neighbors {
            let (Some(nx), Some(ny)) = (nx, ny) else {
                continue;
            };
            if nx >= w || ny >= h {
                continue;
            }
            let vi = ny as usize * w as usize + nx as usize;
            if visited[vi] {
                continue;
            }
            visited[vi] = true;
            if *source.get_tile(nx, ny) == seed {
                queue.push_back((nx, ny));
            }
        }
    }

    (out, count)
}
