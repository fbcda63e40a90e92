//! The contents of one grid cell.

use crate::document::{get_bool, get_floats};
use crate::error::DocumentError;
use macroquad::prelude::*;
use serde_json::{json, Value as JsonValue};

/// Tolerance used when comparing the floating point attributes of two tiles.
pub const TILE_EPSILON: f32 = 1e-6;

/// Paint state of a single grid cell.
///
/// A default tile is "empty": never painted, untextured, white, unit sized.
#[derive(Debug, Clone, Copy)]
pub struct Tile {
    /// Set once the cell has been explicitly painted
    pub painted: bool,
    /// Whether `atlas_index` and `texture_coords` apply
    pub textured: bool,
    /// Index into the owning project's atlas list
    pub atlas_index: Option<usize>,
    /// Euler angles in radians
    pub rotation: Vec3,
    /// Scale relative to one cell
    pub size: Vec2,
    /// RGBA in `0..=1`
    pub tint: Vec4,
    /// `(u0, v0, u1, v1)` inside the atlas texture
    pub texture_coords: Vec4,
}

impl Default for Tile {
    fn default() -> Self {
        Tile {
            painted: false,
            textured: false,
            atlas_index: None,
            rotation: Vec3::ZERO,
            size: Vec2::ONE,
            tint: Vec4::ONE,
            texture_coords: vec4(0.0, 0.0, 1.0, 1.0),
        }
    }
}

#[inline]
fn approx(a: &[f32], b: &[f32]) -> bool {
    a.iter().zip(b).all(|(x, y)| (x - y).abs() <= TILE_EPSILON)
}

impl PartialEq for Tile {
    fn eq(&self, other: &Self) -> bool {
        self.painted == other.painted
            && self.textured == other.textured
            && self.atlas_index == other.atlas_index
            && approx(&self.rotation.to_array(), &other.rotation.to_array())
            && approx(&self.size.to_array(), &other.size.to_array())
            && approx(&self.tint.to_array(), &other.tint.to_array())
            && approx(&self.texture_coords.to_array(), &other.texture_coords.to_array())
    }
}

impl Tile {
    /// A painted, textured tile pointing at `atlas_index`.
    pub fn textured(atlas_index: usize, texture_coords: Vec4) -> Self {
        Tile {
            painted: true,
            textured: true,
            atlas_index: Some(atlas_index),
            texture_coords,
            ..Default::default()
        }
    }

    /// A painted, untextured tile filled with `tint`.
    pub fn colored(tint: Vec4) -> Self {
        Tile {
            painted: true,
            tint,
            ..Default::default()
        }
    }

    /// Back to the empty tile.
    pub fn reset(&mut self) {
        *self = Tile::default();
    }

    /// Whether this is the empty tile.
    pub fn is_default(&self) -> bool {
        *self == Tile::default()
    }

    /// Tint as a macroquad colour.
    pub fn color(&self) -> Color {
        Color::new(self.tint.x, self.tint.y, self.tint.z, self.tint.w)
    }

    /// Only textured tiles carry geometry in the document; `painted` and
    /// `tint` are not persisted.
    pub fn to_json(&self) -> JsonValue {
        if !self.textured {
            return json!({ "is_textured": false });
        }
        json!({
            "is_textured": true,
            "atlas_index": self.atlas_index,
            "rotation": self.rotation.to_array(),
            "size": self.size.to_array(),
            "texture_coords": self.texture_coords.to_array(),
        })
    }

    /// Decodes a tile; a textured tile comes back painted with the default tint.
    pub fn from_json(doc: &JsonValue) -> Result<Self, DocumentError> {
        let mut tile = Tile::default();
        if !get_bool(doc, "is_textured")? {
            return Ok(tile);
        }

        tile.textured = true;
        tile.painted = true;
        tile.atlas_index = match doc.get("atlas_index") {
            None | Some(JsonValue::Null) => None,
            Some(v) => Some(v.as_u64().ok_or(DocumentError::InvalidField {
                field: "atlas_index",
                expected: "an unsigned integer or null",
            })? as usize),
        };
        tile.rotation = Vec3::from_array(get_floats::<3>(doc, "rotation")?);
        tile.size = Vec2::from_array(get_floats::<2>(doc, "size")?);
        tile.texture_coords = Vec4::from_array(get_floats::<4>(doc, "texture_coords")?);
        Ok(tile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_tolerates_rounding() {
        let a = Tile::colored(vec4(0.3, 0.3, 0.3, 1.0));
        let mut b = a;
        b.tint.x += 1e-7;
        assert_eq!(a, b);

        b.tint.x += 1e-3;
        assert_ne!(a, b);
    }

    #[test]
    fn reset_returns_to_empty() {
        let mut t = Tile::textured(2, vec4(0.5, 0.5, 1.0, 1.0));
        assert!(!t.is_default());
        t.reset();
        assert!(t.is_default());
        assert!(!t.painted);
    }

    #[test]
    fn untextured_tile_skips_geometry() {
        let mut t = Tile::colored(vec4(1.0, 0.0, 0.0, 1.0));
        t.rotation = vec3(0.0, 0.0, 90.0);
        let doc = t.to_json();
        assert_eq!(doc, json!({ "is_textured": false }));

        let back = Tile::from_json(&doc).unwrap();
        assert_eq!(back, Tile::default());
    }

    #[test]
    fn textured_tile_restores_geometry() {
        let mut t = Tile::textured(1, vec4(0.25, 0.0, 0.5, 0.25));
        t.rotation = vec3(0.0, 0.0, 45.0);
        t.size = vec2(2.0, 1.0);

        let back = Tile::from_json(&t.to_json()).unwrap();
        assert_eq!(back, t);
    }

    #[test]
    fn null_atlas_index_is_none() {
        let doc = json!({
            "is_textured": true,
            "atlas_index": null,
            "rotation": [0, 0, 0],
            "size": [1, 1],
            "texture_coords": [0, 0, 1, 1],
        });
        let t = Tile::from_json(&doc).unwrap();
        assert!(t.textured);
        assert_eq!(t.atlas_index, None);
    }

    #[test]
    fn textured_tile_without_geometry_is_rejected() {
        let doc = json!({ "is_textured": true, "atlas_index": 0 });
        assert!(matches!(
            Tile::from_json(&doc),
            Err(DocumentError::MissingField { field: "rotation" })
        ));
    }
}
