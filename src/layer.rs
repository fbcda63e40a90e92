//! Single tile layers and the render groups they are drawn in.

use crate::document::{get_array, get_bool, get_i64, get_str, get_u32};
use crate::error::DocumentError;
use crate::tile::Tile;
use log::warn;
use serde_json::{json, Value as JsonValue};

/// Which pass a layer is drawn in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum RenderGroup {
    /// Never drawn
    Disabled,
    /// Drawn first
    #[default]
    Background,
    /// Drawn over the background
    Midground,
    /// Drawn over the midground
    Foreground,
    /// Editor overlays, drawn last
    Debug,
}

impl RenderGroup {
    /// Value written to the project document.
    pub fn as_i32(self) -> i32 {
        match self {
            RenderGroup::Disabled => -1,
            RenderGroup::Background => 0,
            RenderGroup::Midground => 1,
            RenderGroup::Foreground => 2,
            RenderGroup::Debug => 99,
        }
    }

    /// Inverse of [`Self::as_i32`]; `None` for unknown values.
    pub fn from_i32(value: i32) -> Option<Self> {
        match value {
            -1 => Some(RenderGroup::Disabled),
            0 => Some(RenderGroup::Background),
            1 => Some(RenderGroup::Midground),
            2 => Some(RenderGroup::Foreground),
            99 => Some(RenderGroup::Debug),
            _ => None,
        }
    }
}

/// Largest number of cells a decoded layer may hold.
pub const MAX_LAYER_CELLS: u64 = 1 << 22;

/// Rejects grid sizes whose cell count overflows or exceeds [`MAX_LAYER_CELLS`].
pub(crate) fn check_grid_size(width: u32, height: u32) -> Result<(), DocumentError> {
    if u64::from(width) * u64::from(height) > MAX_LAYER_CELLS {
        return Err(DocumentError::InvalidField {
            field: "width",
            expected: "a grid of at most MAX_LAYER_CELLS cells",
        });
    }
    Ok(())
}

/// A named grid of tiles stored row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct TileLayer {
    width: u32,
    height: u32,
    tiles: Vec<Tile>,
    /// Shown in the layer list
    pub name: String,
    /// Hidden layers are skipped when drawing
    pub visible: bool,
    /// Pass the layer is drawn in
    pub render_group: RenderGroup,
}

impl TileLayer {
    /// An all-empty layer of `width` x `height` tiles.
    pub fn new(name: impl Into<String>, width: u32, height: u32) -> Self {
        TileLayer {
            width,
            height,
            tiles: vec![Tile::default(); width as usize * height as usize],
            name: name.into(),
            visible: true,
            render_group: RenderGroup::default(),
        }
    }

    /// Columns.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Rows.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// All tiles, row by row.
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Whether `(x, y)` is on the grid.
    #[inline]
    pub fn contains(&self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        assert!(
            self.contains(x, y),
            "tile ({x}, {y}) out of bounds for {}x{} layer '{}'",
            self.width,
            self.height,
            self.name
        );
        y as usize * self.width as usize + x as usize
    }

    /// Panics if `(x, y)` lies outside the layer.
    pub fn get_tile(&self, x: u32, y: u32) -> &Tile {
        &self.tiles[self.offset(x, y)]
    }

    /// Panics if `(x, y)` lies outside the layer.
    pub fn get_tile_mut(&mut self, x: u32, y: u32) -> &mut Tile {
        let i = self.offset(x, y);
        &mut self.tiles[i]
    }

    /// Panics if `(x, y)` lies outside the layer.
    pub fn set_tile(&mut self, x: u32, y: u32, tile: Tile) {
        *self.get_tile_mut(x, y) = tile;
    }

    /// Keeps the top-left overlap of the old and new grids; everything else
    /// starts out empty. Not undoable on its own.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == self.width && height == self.height {
            return;
        }

        let mut tiles = vec![Tile::default(); width as usize * height as usize];
        let keep_w = self.width.min(width) as usize;
        let keep_h = self.height.min(height) as usize;
        for y in 0..keep_h {
            let src = y * self.width as usize;
            let dst = y * width as usize;
            tiles[dst..dst + keep_w].copy_from_slice(&self.tiles[src..src + keep_w]);
        }

        self.tiles = tiles;
        self.width = width;
        self.height = height;
    }

    /// Resets every tile to empty.
    pub fn clear(&mut self) {
        self.tiles.iter_mut().for_each(Tile::reset);
    }

    /// Tiles are written as an array of rows.
    pub fn to_json(&self) -> JsonValue {
        let rows: Vec<JsonValue> = self
            .tiles
            .chunks(self.width.max(1) as usize)
            .take(self.height as usize)
            .map(|row| JsonValue::Array(row.iter().map(Tile::to_json).collect()))
            .collect();

        json!({
            "name": self.name,
            "width": self.width,
            "height": self.height,
            "visible": self.visible,
            "render_group": self.render_group.as_i32(),
            "tiles": rows,
        })
    }

    /// Rows or columns missing from `tiles` leave those cells empty.
    pub fn from_json(doc: &JsonValue) -> Result<Self, DocumentError> {
        let width = get_u32(doc, "width")?;
        let height = get_u32(doc, "height")?;
        check_grid_size(width, height)?;
        let mut layer = TileLayer::new(get_str(doc, "name")?, width, height);
        layer.visible = get_bool(doc, "visible")?;

        let group = get_i64(doc, "render_group")?;
        layer.render_group = i32::try_from(group)
            .ok()
            .and_then(RenderGroup::from_i32)
            .unwrap_or_else(|| {
                warn!(
                    "Layer '{}' has unknown render group {}, using background",
                    layer.name, group
                );
                RenderGroup::Background
            });

        for (y, row) in get_array(doc, "tiles")?.iter().take(height as usize).enumerate() {
            let cells = row.as_array().ok_or(DocumentError::InvalidField {
                field: "tiles",
                expected: "an array of tile rows",
            })?;
            for (x, cell) in cells.iter().take(width as usize).enumerate() {
                layer.set_tile(x as u32, y as u32, Tile::from_json(cell)?);
            }
        }

        Ok(layer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use macroquad::prelude::*;

    fn marked(x: u32, y: u32) -> Tile {
        Tile::colored(vec4(x as f32 / 10.0, y as f32 / 10.0, 0.0, 1.0))
    }

    fn patterned(width: u32, height: u32) -> TileLayer {
        let mut layer = TileLayer::new("pattern", width, height);
        for y in 0..height {
            for x in 0..width {
                layer.set_tile(x, y, marked(x, y));
            }
        }
        layer
    }

    #[test]
    fn new_layer_is_empty_and_sized() {
        let layer = TileLayer::new("ground", 3, 2);
        assert_eq!(layer.tiles().len(), 6);
        assert!(layer.tiles().iter().all(Tile::is_default));
        assert!(layer.visible);
        assert_eq!(layer.render_group, RenderGroup::Background);
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn get_tile_out_of_bounds_panics() {
        let layer = TileLayer::new("ground", 2, 2);
        layer.get_tile(2, 0);
    }

    #[test]
    fn grow_keeps_content_and_exposes_empty_cells() {
        let mut layer = patterned(3, 2);
        layer.resize(5, 4);
        assert_eq!(layer.tiles().len(), 20);
        for y in 0..4 {
            for x in 0..5 {
                if x < 3 && y < 2 {
                    assert_eq!(*layer.get_tile(x, y), marked(x, y));
                } else {
                    assert!(layer.get_tile(x, y).is_default());
                }
            }
        }
    }

    #[test]
    fn shrink_keeps_top_left() {
        let mut layer = patterned(4, 4);
        layer.resize(2, 3);
        assert_eq!((layer.width(), layer.height()), (2, 3));
        for y in 0..3 {
            for x in 0..2 {
                assert_eq!(*layer.get_tile(x, y), marked(x, y));
            }
        }
    }

    #[test]
    fn mixed_resize_keeps_overlap() {
        let mut layer = patterned(4, 2);
        layer.resize(2, 5);
        for y in 0..5 {
            for x in 0..2 {
                if y < 2 {
                    assert_eq!(*layer.get_tile(x, y), marked(x, y));
                } else {
                    assert!(layer.get_tile(x, y).is_default());
                }
            }
        }
    }

    #[test]
    fn clear_resets_every_tile() {
        let mut layer = patterned(3, 3);
        layer.clear();
        assert!(layer.tiles().iter().all(Tile::is_default));
    }

    #[test]
    fn json_rows_are_y_major() {
        let mut layer = TileLayer::new("fg", 2, 3);
        layer.set_tile(1, 2, Tile::textured(0, vec4(0.0, 0.0, 0.5, 0.5)));
        layer.render_group = RenderGroup::Foreground;

        let doc = layer.to_json();
        let rows = doc["tiles"].as_array().unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].as_array().unwrap().len(), 2);
        assert_eq!(rows[2][1]["is_textured"], true);
        assert_eq!(doc["render_group"], 2);

        let back = TileLayer::from_json(&doc).unwrap();
        assert_eq!(back, layer);
    }

    #[test]
    fn partial_tile_data_leaves_defaults() {
        let doc = json!({
            "name": "partial",
            "width": 3,
            "height": 3,
            "visible": false,
            "render_group": 99,
            "tiles": [[
                { "is_textured": true, "atlas_index": 0, "rotation": [0, 0, 0],
                  "size": [1, 1], "texture_coords": [0, 0, 1, 1] }
            ]],
        });
        let layer = TileLayer::from_json(&doc).unwrap();
        assert!(!layer.visible);
        assert_eq!(layer.render_group, RenderGroup::Debug);
        assert!(layer.get_tile(0, 0).textured);
        assert_eq!(layer.tiles().iter().filter(|t| t.is_default()).count(), 8);
    }

    #[test]
    fn oversized_layer_is_rejected() {
        let doc = json!({
            "name": "huge",
            "width": u32::MAX,
            "height": u32::MAX,
            "visible": true,
            "render_group": 0,
            "tiles": [],
        });
        assert!(matches!(
            TileLayer::from_json(&doc),
            Err(DocumentError::InvalidField { field: "width", .. })
        ));
    }
}
