//! Per-project editing session: turns user gestures into commands.

use std::path::Path;

use log::{error, info, warn};
use macroquad::math::{vec2, Vec2};

use crate::atlas::TextureAtlas;
use crate::command::{
    Command, LayerAddCommand, LayerClearCommand, LayerDeleteCommand, LayerFillCommand,
    LayerInsertCommand, LayerMoveDownCommand, LayerMoveUpCommand, LayerSwapCommand,
    TileEraseCommand, TilePaintCommand,
};
use crate::config::EditorConfig;
use crate::history::CommandHistory;
use crate::layer::RenderGroup;
use crate::project::Project;
use crate::stack::LayerStack;
use crate::tile::Tile;

/// What a click on the grid does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaintingMode {
    /// Clicks do nothing
    #[default]
    None,
    /// Paint the brush tile
    Brush,
    /// Reset cells to empty
    Eraser,
    /// Flood fill with the brush tile
    Fill,
}

/// One open project with its history, brush and view state.
#[derive(Debug)]
pub struct Context {
    project: Project,
    history: CommandHistory,
    config: EditorConfig,
    working_layer: usize,
    /// What a click does
    pub painting_mode: PaintingMode,
    /// Tile written by painting and filling
    pub brush: Tile,
    /// World-space point the viewport is centred on
    pub camera_target: Vec2,
    status: Option<String>,
}

impl Context {
    /// Starts with an empty project of the configured default size.
    pub fn new(config: EditorConfig) -> Self {
        let project = Project::new(
            config.default_project_name.clone(),
            config.default_width,
            config.default_height,
        );
        let mut ctx = Context {
            project,
            history: CommandHistory::with_capacity(config.history_capacity),
            config,
            working_layer: 0,
            painting_mode: PaintingMode::default(),
            brush: Tile::default(),
            camera_target: Vec2::ZERO,
            status: None,
        };
        ctx.recenter_camera();
        ctx
    }

    /// The project being edited.
    pub fn project(&self) -> &Project {
        &self.project
    }

    /// Direct access bypasses history; prefer the command-based methods.
    pub fn project_mut(&mut self) -> &mut Project {
        &mut self.project
    }

    /// Layers of the current project.
    pub fn layer_stack(&self) -> &LayerStack {
        &self.project.layer_stack
    }

    /// Undo/redo record for this project.
    pub fn history(&self) -> &CommandHistory {
        &self.history
    }

    /// Settings this context was created with.
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Message from the last save or load, for the originating dialog.
    pub fn status_message(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Layer that painting targets.
    #[inline]
    pub fn working_layer(&self) -> usize {
        self.working_layer
    }

    /// Selects the layer to paint on, clamped into the stack.
    pub fn set_working_layer(&mut self, index: usize) {
        self.working_layer = index;
        self.validate_working_layer();
    }

    /// Clamps the working layer into the stack. Call after any structural change.
    pub fn validate_working_layer(&mut self) {
        let count = self.project.layer_stack.layer_count();
        if count == 0 {
            self.working_layer = 0;
        } else if self.working_layer >= count {
            self.working_layer = count - 1;
        }
    }

    /// Points the camera at the middle of the grid.
    pub fn recenter_camera(&mut self) {
        let stack = &self.project.layer_stack;
        self.camera_target = vec2(
            stack.width() as f32 * self.config.tile_size / 2.0,
            stack.height() as f32 * self.config.tile_size / 2.0,
        );
    }

    /// Back to the empty tile.
    pub fn reset_brush(&mut self) {
        self.brush = Tile::default();
    }

    /// Points the brush at `cell` of atlas `atlas_index`.
    pub fn select_brush_from_atlas(&mut self, atlas_index: usize, cell: u32) -> bool {
        let Some(atlas) = self.project.atlas(atlas_index) else {
            warn!("No atlas {} to pick a brush from", atlas_index);
            return false;
        };
        self.brush = Tile {
            rotation: self.brush.rotation,
            size: self.brush.size,
            tint: self.brush.tint,
            ..Tile::textured(atlas_index, atlas.texture_coords(cell))
        };
        true
    }

    /// Adds an atlas to the project and returns its index.
    pub fn add_atlas(&mut self, atlas: TextureAtlas) -> usize {
        self.project.add_atlas(atlas)
    }

    // Painting

    /// Applies the current painting mode at `(x, y)` on the working layer.
    pub fn paint_tile(&mut self, x: i32, y: i32) {
        let brush = self.brush;
        self.paint_tile_with_brush(x, y, brush);
    }

    /// Like [`Self::paint_tile`] with an explicit brush.
    pub fn paint_tile_with_brush(&mut self, x: i32, y: i32, brush: Tile) {
        self.paint_tile_on_layer(self.working_layer, x, y, brush);
    }

    /// Builds the command matching the current painting mode and runs it.
    pub fn paint_tile_on_layer(&mut self, layer: usize, x: i32, y: i32, brush: Tile) {
        let cmd: Command = match self.painting_mode {
            PaintingMode::None => return,
            PaintingMode::Brush => TilePaintCommand::new(x, y, layer, brush).into(),
            PaintingMode::Eraser => TileEraseCommand::new(x, y, layer).into(),
            PaintingMode::Fill => LayerFillCommand::new(x, y, layer, brush).into(),
        };
        self.execute_command(cmd);
    }

    /// Runs `cmd` through the history and marks the project modified.
    pub fn execute_command(&mut self, cmd: Command) {
        let structural = cmd.is_structural();
        self.history.execute(cmd, &mut self.project.layer_stack);
        self.project.mark_modified();
        if structural {
            self.validate_working_layer();
        }
    }

    /// Whether there is an edit to undo.
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Whether there is an undone edit to redo.
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Reverts the last edit, if any.
    pub fn undo(&mut self) {
        if !self.can_undo() {
            return;
        }
        self.history.undo(&mut self.project.layer_stack);
        self.project.mark_modified();
        self.validate_working_layer();
    }

    /// Re-applies the last undone edit, if any.
    pub fn redo(&mut self) {
        if !self.can_redo() {
            return;
        }
        self.history.redo(&mut self.project.layer_stack);
        self.project.mark_modified();
        self.validate_working_layer();
    }

    // Layers

    /// Appends a layer and makes it the working layer.
    pub fn add_layer(&mut self, name: &str) {
        let before = self.layer_stack().layer_count();
        self.execute_command(LayerAddCommand::new(name).into());
        if self.layer_stack().layer_count() > before {
            self.working_layer = before;
        }
    }

    /// Inserts a layer at `index`, clamped to the stack.
    pub fn insert_layer(&mut self, index: usize, name: &str) {
        self.execute_command(LayerInsertCommand::new(index, name).into());
    }

    /// Removes a layer; undo restores it with its content.
    pub fn delete_layer(&mut self, index: usize) {
        self.execute_command(LayerDeleteCommand::new(index).into());
    }

    /// Resets every tile of a layer.
    pub fn clear_layer(&mut self, index: usize) {
        self.execute_command(LayerClearCommand::new(index).into());
    }

    /// Moves toward the bottom, following the layer with the working index.
    pub fn move_layer_up(&mut self, index: usize) {
        self.execute_command(LayerMoveUpCommand::new(index).into());
        if index > 0 && self.working_layer == index {
            self.working_layer = index - 1;
        }
    }

    /// Moves toward the top, following the layer with the working index.
    pub fn move_layer_down(&mut self, index: usize) {
        self.execute_command(LayerMoveDownCommand::new(index).into());
        let Some(next) = index.checked_add(1) else {
            return;
        };
        if self.working_layer == index && next < self.layer_stack().layer_count() {
            self.working_layer = next;
        }
    }

    /// Swaps two layers.
    pub fn swap_layers(&mut self, a: usize, b: usize) {
        self.execute_command(LayerSwapCommand::new(a, b).into());
    }

    /// Not recorded in history.
    pub fn rename_layer(&mut self, index: usize, name: &str) {
        if !self.layer_stack().is_valid_layer_index(index) {
            warn!("Cannot rename layer {}: out of range", index);
            return;
        }
        self.project.layer_stack.get_layer_mut(index).name = name.to_owned();
        self.project.mark_modified();
    }

    /// Not recorded in history.
    pub fn set_layer_visibility(&mut self, index: usize, visible: bool) {
        if !self.layer_stack().is_valid_layer_index(index) {
            warn!("Cannot change visibility of layer {}: out of range", index);
            return;
        }
        self.project.layer_stack.get_layer_mut(index).visible = visible;
        self.project.mark_modified();
    }

    /// Not recorded in history.
    pub fn set_layer_render_group(&mut self, index: usize, group: RenderGroup) {
        if !self.layer_stack().is_valid_layer_index(index) {
            warn!("Cannot change render group of layer {}: out of range", index);
            return;
        }
        self.project.layer_stack.get_layer_mut(index).render_group = group;
        self.project.mark_modified();
    }

    /// Content-preserving resize of every layer. Not recorded in history.
    pub fn resize_project(&mut self, width: u32, height: u32) {
        self.project.layer_stack.resize(width, height);
        self.project.mark_modified();
        self.validate_working_layer();
        self.recenter_camera();
    }

    // Project lifecycle

    /// Replaces the current project with an empty one holding a single layer.
    pub fn new_project(&mut self, name: &str, width: u32, height: u32) {
        let name = if name.is_empty() {
            self.config.default_project_name.as_str()
        } else {
            name
        };
        let mut project = Project::new(name, width, height);
        project.layer_stack.add_layer("Layer 0");
        self.project = project;
        self.history.clear();
        self.working_layer = 0;
        self.reset_brush();
        self.status = None;
        self.validate_working_layer();
        self.recenter_camera();
        info!("New project '{}' ({}x{})", self.project.name, width, height);
    }

    /// Replaces the current project with the one at `path`, clearing history.
    /// On failure the current project is kept and the status message says why.
    pub fn load_project(&mut self, path: impl AsRef<Path>) -> bool {
        let path = path.as_ref();
        match Project::load_from(path) {
            Ok(project) => {
                self.project = project;
                self.history.clear();
                self.working_layer = 0;
                self.reset_brush();
                self.validate_working_layer();
                self.recenter_camera();
                self.status = Some(format!("Loaded {}", path.display()));
                true
            }
            Err(err) => {
                error!("Failed to load project: {err:#}");
                self.status = Some(format!("Failed to load project: {err:#}"));
                false
            }
        }
    }

    /// Saves to the project's own path; fails if it has never been saved.
    pub fn save_project(&mut self) -> bool {
        let Some(path) = self.project.path().map(Path::to_path_buf) else {
            self.status = Some("Project has no file yet, use Save As".to_owned());
            return false;
        };
        self.save_project_as(path)
    }

    /// Saves to `path` and adopts it as the project path.
    pub fn save_project_as(&mut self, path: impl AsRef<Path>) -> bool {
        let path = path.as_ref();
        match self.project.save_to(path) {
            Ok(()) => {
                self.status = Some(format!("Saved {}", path.display()));
                true
            }
            Err(err) => {
                error!("Failed to save project: {err:#}");
                self.status = Some(format!("Failed to save project: {err:#}"));
                false
            }
        }
    }
}

impl Default for Context {
    fn default() -> Self {
        Context::new(EditorConfig::default())
    }
}
