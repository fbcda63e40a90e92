//! Drawing a layer stack with macroquad. Nothing here mutates editor state.

use macroquad::prelude::*;

use crate::atlas::TextureAtlas;
use crate::layer::RenderGroup;
use crate::stack::LayerStack;
use crate::tile::Tile;

/// Indices of the layers to draw, back to front: visible layers outside
/// [`RenderGroup::Disabled`], by render group and then stack position.
pub fn draw_order(stack: &LayerStack) -> Vec<usize> {
    let mut order: Vec<usize> = stack
        .layers()
        .iter()
        .enumerate()
        .filter(|(_, l)| l.visible && l.render_group != RenderGroup::Disabled)
        .map(|(i, _)| i)
        .collect();
    order.sort_by_key(|&i| (stack.get_layer(i).render_group, i));
    order
}

/// Pixel rectangle of `tile` inside a `texture_w` x `texture_h` texture.
pub fn tile_source_rect(tile: &Tile, texture_w: f32, texture_h: f32) -> Rect {
    let [u0, v0, u1, v1] = tile.texture_coords.to_array();
    Rect::new(
        u0 * texture_w,
        v0 * texture_h,
        (u1 - u0) * texture_w,
        (v1 - v0) * texture_h,
    )
}

/// Draws one painted tile with its top-left corner at `world`.
pub fn draw_tile(tile: &Tile, atlases: &[TextureAtlas], world: Vec2, tile_size: f32) {
    if !tile.painted {
        return;
    }
    let dest = tile.size * tile_size;
    let texture = tile
        .atlas_index
        .filter(|_| tile.textured)
        .and_then(|i| atlases.get(i))
        .and_then(TextureAtlas::texture);

    match texture {
        Some(tex) => draw_texture_ex(
            tex,
            world.x,
            world.y,
            tile.color(),
            DrawTextureParams {
                dest_size: Some(dest),
                source: Some(tile_source_rect(tile, tex.width(), tex.height())),
                rotation: tile.rotation.z.to_radians(),
                ..Default::default()
            },
        ),
        None => draw_rectangle(world.x, world.y, dest.x, dest.y, tile.color()),
    }
}

/// Draws every visible layer with the grid's top-left corner at `origin`.
pub fn draw_layer_stack(
    stack: &LayerStack,
    atlases: &[TextureAtlas],
    origin: Vec2,
    tile_size: f32,
) {
    for i in draw_order(stack) {
        let layer = stack.get_layer(i);
        for y in 0..layer.height() {
            for x in 0..layer.width() {
                let world = origin + vec2(x as f32, y as f32) * tile_size;
                draw_tile(layer.get_tile(x, y), atlases, world, tile_size);
            }
        }
    }
}
