//! Texture atlases: a texture cut into a grid of equally sized cells.

use anyhow::Context;
use log::warn;
use macroquad::prelude::*;
use serde::{Deserialize, Serialize};

/// Persisted part of an atlas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtlasRecord {
    /// Path of the image, as written in the project file
    pub texture_path: String,
    /// Cells per row
    pub atlas_width: u32,
    /// Cells per column
    pub atlas_height: u32,
}

/// A texture split into a regular grid of `atlas_width` x `atlas_height` cells.
///
/// Tiles refer to atlases by their index in the project's atlas list.
#[derive(Clone)]
pub struct TextureAtlas {
    /// Path the texture is loaded from
    pub texture_path: String,
    atlas_width: u32,
    atlas_height: u32,
    texture: Option<Texture2D>,
}

impl std::fmt::Debug for TextureAtlas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextureAtlas")
            .field("texture_path", &self.texture_path)
            .field("atlas_width", &self.atlas_width)
            .field("atlas_height", &self.atlas_height)
            .field("has_texture", &self.texture.is_some())
            .finish()
    }
}

impl TextureAtlas {
    /// Zero grid dimensions are clamped to 1. The texture is not loaded yet.
    pub fn new(texture_path: impl Into<String>, atlas_width: u32, atlas_height: u32) -> Self {
        TextureAtlas {
            texture_path: texture_path.into(),
            atlas_width: atlas_width.max(1),
            atlas_height: atlas_height.max(1),
            texture: None,
        }
    }

    /// Cells per row.
    #[inline]
    pub fn atlas_width(&self) -> u32 {
        self.atlas_width
    }

    /// Cells per column.
    #[inline]
    pub fn atlas_height(&self) -> u32 {
        self.atlas_height
    }

    /// Widened so very large grids cannot overflow.
    pub fn cell_count(&self) -> u64 {
        u64::from(self.atlas_width) * u64::from(self.atlas_height)
    }

    /// Whether the texture has been loaded.
    pub fn has_texture(&self) -> bool {
        self.texture.is_some()
    }

    /// The loaded texture, if any.
    pub fn texture(&self) -> Option<&Texture2D> {
        self.texture.as_ref()
    }

    /// Installs an already loaded texture with nearest filtering.
    pub fn set_texture(&mut self, texture: Texture2D) {
        texture.set_filter(FilterMode::Nearest);
        self.texture = Some(texture);
    }

    /// Needs a running macroquad context.
    pub async fn load_texture(&mut self) -> anyhow::Result<()> {
        let tex = load_texture(&self.texture_path)
            .await
            .with_context(|| format!("Loading texture {}", self.texture_path))?;
        self.set_texture(tex);
        Ok(())
    }

    /// Changes the cell grid; existing tiles keep their stored coordinates.
    pub fn resize(&mut self, atlas_width: u32, atlas_height: u32) {
        self.atlas_width = atlas_width.max(1);
        self.atlas_height = atlas_height.max(1);
    }

    /// Normalized `(u0, v0, u1, v1)` of cell `index`, counted row-major.
    pub fn texture_coords(&self, index: u32) -> Vec4 {
        if u64::from(index) >= self.cell_count() {
            warn!(
                "Atlas cell {} out of range for {}x{} atlas '{}'",
                index, self.atlas_width, self.atlas_height, self.texture_path
            );
            return vec4(0.0, 0.0, 1.0, 1.0);
        }
        let col = (index % self.atlas_width) as f32;
        let row = (index / self.atlas_width) as f32;
        let cw = 1.0 / self.atlas_width as f32;
        let ch = 1.0 / self.atlas_height as f32;
        vec4(col * cw, row * ch, (col + 1.0) * cw, (row + 1.0) * ch)
    }

    /// The part of the atlas saved with the project.
    pub fn to_record(&self) -> AtlasRecord {
        AtlasRecord {
            texture_path: self.texture_path.clone(),
            atlas_width: self.atlas_width,
            atlas_height: self.atlas_height,
        }
    }

    /// Rebuilds an atlas from its record; the texture still has to be loaded.
    pub fn from_record(record: AtlasRecord) -> Self {
        TextureAtlas::new(record.texture_path, record.atlas_width, record.atlas_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coords_walk_cells_row_major() {
        let atlas = TextureAtlas::new("tiles.png", 4, 2);
        assert_eq!(atlas.cell_count(), 8);
        assert_eq!(atlas.texture_coords(0), vec4(0.0, 0.0, 0.25, 0.5));
        assert_eq!(atlas.texture_coords(5), vec4(0.25, 0.5, 0.5, 1.0));
    }

    #[test]
    fn out_of_range_cell_uses_full_texture() {
        let atlas = TextureAtlas::new("tiles.png", 2, 2);
        assert_eq!(atlas.texture_coords(4), vec4(0.0, 0.0, 1.0, 1.0));
    }

    #[test]
    fn huge_grid_counts_cells_without_overflow() {
        let atlas = TextureAtlas::new("tiles.png", 65536, 65536);
        assert_eq!(atlas.cell_count(), 1 << 32);
        let coords = atlas.texture_coords(3);
        assert_eq!(coords.x, 3.0 / 65536.0);
        assert_eq!(coords.y, 0.0);
    }

    #[test]
    fn zero_sized_grid_is_clamped() {
        let mut atlas = TextureAtlas::new("tiles.png", 0, 3);
        assert_eq!(atlas.atlas_width(), 1);
        atlas.resize(8, 0);
        assert_eq!((atlas.atlas_width(), atlas.atlas_height()), (8, 1));
        assert!(!atlas.has_texture());
    }

    #[test]
    fn record_round_trip() {
        let atlas = TextureAtlas::new("assets/tiles.png", 16, 8);
        let back = TextureAtlas::from_record(atlas.to_record());
        assert_eq!(back.to_record(), atlas.to_record());
    }
}
