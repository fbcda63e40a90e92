//! The ordered layers of a map.

use crate::document::{get_array, get_u32};
use crate::error::DocumentError;
use crate::layer::{check_grid_size, TileLayer};
use crate::tile::Tile;
use log::warn;
use serde_json::{json, Value as JsonValue};

/// Name given to layers added without one.
pub const DEFAULT_LAYER_NAME: &str = "New Layer";

/// Ordered layers sharing one grid size. Index 0 is the bottom layer.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LayerStack {
    width: u32,
    height: u32,
    layers: Vec<TileLayer>,
}

impl LayerStack {
    /// An empty stack for a `width` x `height` grid.
    pub fn new(width: u32, height: u32) -> Self {
        LayerStack {
            width,
            height,
            layers: Vec::new(),
        }
    }

    /// Grid columns shared by every layer.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Grid rows shared by every layer.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of layers.
    #[inline]
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Whether the stack holds no layers.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Layers from bottom to top.
    pub fn layers(&self) -> &[TileLayer] {
        &self.layers
    }

    /// Whether `index` names an existing layer.
    #[inline]
    pub fn is_valid_layer_index(&self, index: usize) -> bool {
        index < self.layers.len()
    }

    /// Signed so callers can pass raw cursor cells that may sit off the grid.
    #[inline]
    pub fn is_valid_position(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height
    }

    /// Panics on an invalid index; check with [`Self::is_valid_layer_index`].
    pub fn get_layer(&self, index: usize) -> &TileLayer {
        assert!(
            self.is_valid_layer_index(index),
            "layer index {index} out of range (count {})",
            self.layers.len()
        );
        &self.layers[index]
    }

    /// Panics on an invalid index; check with [`Self::is_valid_layer_index`].
    pub fn get_layer_mut(&mut self, index: usize) -> &mut TileLayer {
        assert!(
            self.is_valid_layer_index(index),
            "layer index {index} out of range (count {})",
            self.layers.len()
        );
        &mut self.layers[index]
    }

    /// Panics on an invalid layer index or position.
    pub fn get_tile(&self, layer: usize, x: u32, y: u32) -> &Tile {
        self.get_layer(layer).get_tile(x, y)
    }

    /// Panics on an invalid layer index or position.
    pub fn get_tile_mut(&mut self, layer: usize, x: u32, y: u32) -> &mut Tile {
        self.get_layer_mut(layer).get_tile_mut(x, y)
    }

    /// Appends a layer and returns its index.
    pub fn add_layer(&mut self, name: &str) -> usize {
        let name = if name.is_empty() { DEFAULT_LAYER_NAME } else { name };
        self.layers.push(TileLayer::new(name, self.width, self.height));
        self.layers.len() - 1
    }

    /// `index` is clamped to `0..=layer_count`; returns where the layer landed.
    pub fn insert_layer(&mut self, index: usize, name: &str) -> usize {
        let name = if name.is_empty() { DEFAULT_LAYER_NAME } else { name };
        let index = index.min(self.layers.len());
        self.layers
            .insert(index, TileLayer::new(name, self.width, self.height));
        index
    }

    /// Takes the layer out; `None` for an invalid index.
    pub fn remove_layer(&mut self, index: usize) -> Option<TileLayer> {
        if !self.is_valid_layer_index(index) {
            warn!("Cannot remove layer {}: out of range", index);
            return None;
        }
        Some(self.layers.remove(index))
    }

    /// Resets every tile of a layer; `false` for an invalid index.
    pub fn clear_layer(&mut self, index: usize) -> bool {
        match self.layers.get_mut(index) {
            Some(layer) => {
                layer.clear();
                true
            }
            None => {
                warn!("Cannot clear layer {}: out of range", index);
                false
            }
        }
    }

    /// Swaps in `layer`, resizing it first if its size disagrees with the stack.
    pub fn replace_layer(&mut self, index: usize, mut layer: TileLayer) -> bool {
        if !self.is_valid_layer_index(index) {
            warn!("Cannot replace layer {}: out of range", index);
            return false;
        }
        if layer.width() != self.width || layer.height() != self.height {
            layer.resize(self.width, self.height);
        }
        self.layers[index] = layer;
        true
    }

    /// `false` if either index is invalid.
    pub fn swap_layers(&mut self, a: usize, b: usize) -> bool {
        if !self.is_valid_layer_index(a) || !self.is_valid_layer_index(b) {
            warn!("Cannot swap layers {} and {}: out of range", a, b);
            return false;
        }
        self.layers.swap(a, b);
        true
    }

    /// Swaps with the layer below (`index - 1`); no-op at the bottom.
    pub fn move_layer_up(&mut self, index: usize) -> bool {
        if !self.is_valid_layer_index(index) {
            warn!("Cannot move layer {} up: out of range", index);
            return false;
        }
        if index == 0 {
            return false;
        }
        self.layers.swap(index, index - 1);
        true
    }

    /// Swaps with the layer above (`index + 1`); no-op at the top.
    pub fn move_layer_down(&mut self, index: usize) -> bool {
        if !self.is_valid_layer_index(index) {
            warn!("Cannot move layer {} down: out of range", index);
            return false;
        }
        if index + 1 == self.layers.len() {
            return false;
        }
        self.layers.swap(index, index + 1);
        true
    }

    /// Resizes the grid and every layer in it.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        for layer in &mut self.layers {
            layer.resize(width, height);
        }
    }

    /// Encodes the grid size and every layer.
    pub fn to_json(&self) -> JsonValue {
        json!({
            "width": self.width,
            "height": self.height,
            "tile_layers": self.layers.iter().map(TileLayer::to_json).collect::<Vec<_>>(),
        })
    }

    /// A layer that fails to decode is skipped; the rest still load.
    pub fn from_json(doc: &JsonValue) -> Result<Self, DocumentError> {
        let (width, height) = match (get_u32(doc, "width"), get_u32(doc, "height")) {
            (Ok(w), Ok(h)) if check_grid_size(w, h).is_ok() => (w, h),
            (w, h) => {
                warn!(
                    "Layer stack has no usable size ({:?} x {:?}), creating an empty one",
                    w.ok(),
                    h.ok()
                );
                (0, 0)
            }
        };

        let mut stack = LayerStack::new(width, height);
        let docs = match get_array(doc, "tile_layers") {
            Ok(docs) => docs.as_slice(),
            Err(err) => {
                warn!("Layer stack has no layers: {}", err);
                &[]
            }
        };

        for (i, layer_doc) in docs.iter().enumerate() {
            match TileLayer::from_json(layer_doc) {
                Ok(mut layer) => {
                    if layer.width() != width || layer.height() != height {
                        warn!(
                            "Layer '{}' is {}x{}, resizing to {}x{}",
                            layer.name,
                            layer.width(),
                            layer.height(),
                            width,
                            height
                        );
                        layer.resize(width, height);
                    }
                    stack.layers.push(layer);
                }
                Err(err) => warn!("Skipping layer {}: {}", i, err),
            }
        }

        Ok(stack)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::RenderGroup;
    use macroquad::math::vec4;

    fn named(stack: &LayerStack) -> Vec<&str> {
        stack.layers().iter().map(|l| l.name.as_str()).collect()
    }

    fn stack_abc() -> LayerStack {
        let mut stack = LayerStack::new(4, 4);
        stack.add_layer("a");
        stack.add_layer("b");
        stack.add_layer("c");
        stack
    }

    #[test]
    fn add_layer_defaults_name_and_size() {
        let mut stack = LayerStack::new(5, 3);
        let i = stack.add_layer("");
        assert_eq!(i, 0);
        assert_eq!(stack.get_layer(0).name, DEFAULT_LAYER_NAME);
        assert_eq!((stack.get_layer(0).width(), stack.get_layer(0).height()), (5, 3));
    }

    #[test]
    fn insert_layer_clamps_index() {
        let mut stack = stack_abc();
        assert_eq!(stack.insert_layer(99, "top"), 3);
        assert_eq!(stack.insert_layer(0, "bottom"), 0);
        assert_eq!(named(&stack), ["bottom", "a", "b", "c", "top"]);
    }

    #[test]
    fn invalid_indices_are_no_ops() {
        let mut stack = stack_abc();
        let before = stack.clone();
        assert!(stack.remove_layer(3).is_none());
        assert!(!stack.clear_layer(7));
        assert!(!stack.replace_layer(3, TileLayer::new("x", 4, 4)));
        assert!(!stack.swap_layers(0, 3));
        assert!(!stack.move_layer_up(0));
        assert!(!stack.move_layer_down(2));
        assert!(!stack.move_layer_down(10));
        assert_eq!(stack, before);
    }

    #[test]
    fn move_and_swap_reorder() {
        let mut stack = stack_abc();
        assert!(stack.move_layer_up(2));
        assert_eq!(named(&stack), ["a", "c", "b"]);
        assert!(stack.move_layer_down(0));
        assert_eq!(named(&stack), ["c", "a", "b"]);
        assert!(stack.swap_layers(0, 2));
        assert_eq!(named(&stack), ["b", "a", "c"]);
    }

    #[test]
    fn replace_layer_normalizes_size() {
        let mut stack = stack_abc();
        assert!(stack.replace_layer(1, TileLayer::new("wide", 9, 1)));
        let layer = stack.get_layer(1);
        assert_eq!(layer.name, "wide");
        assert_eq!((layer.width(), layer.height()), (4, 4));
    }

    #[test]
    fn resize_propagates_to_layers() {
        let mut stack = stack_abc();
        let t = Tile::colored(vec4(0.0, 1.0, 0.0, 1.0));
        *stack.get_tile_mut(2, 1, 1) = t;
        stack.resize(2, 6);
        assert!(stack
            .layers()
            .iter()
            .all(|l| l.width() == 2 && l.height() == 6));
        assert_eq!(*stack.get_tile(2, 1, 1), t);
    }

    #[test]
    fn valid_position_rejects_negative_and_overflow() {
        let stack = LayerStack::new(3, 2);
        assert!(stack.is_valid_position(2, 1));
        assert!(!stack.is_valid_position(-1, 0));
        assert!(!stack.is_valid_position(0, -1));
        assert!(!stack.is_valid_position(3, 0));
        assert!(!stack.is_valid_position(0, 2));
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn get_layer_out_of_range_panics() {
        stack_abc().get_layer(3);
    }

    #[test]
    fn json_round_trip_keeps_every_tile() {
        let mut stack = LayerStack::new(3, 2);
        stack.add_layer("bg");
        stack.add_layer("fg");
        stack.get_layer_mut(1).render_group = RenderGroup::Foreground;
        *stack.get_tile_mut(0, 2, 1) = Tile::textured(0, vec4(0.0, 0.5, 0.5, 1.0));

        let back = LayerStack::from_json(&stack.to_json()).unwrap();
        assert_eq!(back, stack);
    }

    #[test]
    fn missing_size_yields_empty_stack() {
        let doc = json!({ "tile_layers": [] });
        let stack = LayerStack::from_json(&doc).unwrap();
        assert_eq!((stack.width(), stack.height()), (0, 0));
        assert!(stack.is_empty());
    }

    #[test]
    fn corrupt_layer_is_skipped_and_mismatched_layer_resized() {
        let good = TileLayer::new("good", 1, 1).to_json();
        let doc = json!({
            "width": 2,
            "height": 2,
            "tile_layers": [ { "name": "broken" }, good ],
        });
        let stack = LayerStack::from_json(&doc).unwrap();
        assert_eq!(named(&stack), ["good"]);
        assert_eq!(stack.get_layer(0).tiles().len(), 4);
    }

    #[test]
    fn oversized_layer_is_skipped_without_allocating() {
        let good = TileLayer::new("good", 2, 2).to_json();
        let doc = json!({
            "width": 2,
            "height": 2,
            "tile_layers": [
                { "name": "huge", "width": u32::MAX, "height": u32::MAX,
                  "visible": true, "render_group": 0, "tiles": [] },
                good,
            ],
        });
        let stack = LayerStack::from_json(&doc).unwrap();
        assert_eq!(named(&stack), ["good"]);
    }

    #[test]
    fn oversized_stack_falls_back_to_empty_grid() {
        let doc = json!({ "width": u32::MAX, "height": 2, "tile_layers": [] });
        let stack = LayerStack::from_json(&doc).unwrap();
        assert_eq!((stack.width(), stack.height()), (0, 0));
    }

    #[test]
    fn moving_far_out_of_range_index_is_a_no_op() {
        let mut stack = stack_abc();
        let before = stack.clone();
        assert!(!stack.move_layer_down(usize::MAX));
        assert!(!stack.move_layer_up(usize::MAX));
        assert_eq!(stack, before);
    }
}
