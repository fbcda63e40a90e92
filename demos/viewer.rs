use macroquad::prelude::*;
use tiles::render::draw_layer_stack;
use tiles::{Context, PaintingMode};

fn window_conf() -> Conf {
    Conf {
        window_title: "Tiles Viewer".into(),
        window_width: 1280,
        window_height: 720,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "assets/map.json".to_owned());

    let mut ctx = Context::default();
    if !ctx.load_project(&path) {
        ctx.new_project("", 32, 32);
    }
    for i in 0..ctx.project().atlases().len() {
        if let Some(atlas) = ctx.project_mut().atlas_mut(i) {
            if let Err(err) = atlas.load_texture().await {
                log::error!("{err:#}");
            }
        }
    }
    ctx.painting_mode = PaintingMode::Brush;
    ctx.brush = tiles::Tile::colored(vec4(0.9, 0.6, 0.2, 1.0));

    loop {
        clear_background(BLACK);

        let tile_size = ctx.config().tile_size;
        let origin = vec2(screen_width(), screen_height()) / 2.0 - ctx.camera_target;

        if is_mouse_button_down(MouseButton::Left) {
            let cell = (Vec2::from(mouse_position()) - origin) / tile_size;
            ctx.paint_tile(cell.x.floor() as i32, cell.y.floor() as i32);
        }
        let ctrl = is_key_down(KeyCode::LeftControl);
        if ctrl && is_key_pressed(KeyCode::Z) {
            ctx.undo();
        }
        if ctrl && is_key_pressed(KeyCode::Y) {
            ctx.redo();
        }
        if ctrl && is_key_pressed(KeyCode::S) {
            ctx.save_project_as(&path);
        }

        draw_layer_stack(ctx.layer_stack(), ctx.project().atlases(), origin, tile_size);

        draw_text(
            ctx.status_message().unwrap_or(&ctx.project().name),
            20.0,
            30.0,
            30.0,
            WHITE,
        );

        next_frame().await;
    }
}
