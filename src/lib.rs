#![warn(missing_docs, missing_debug_implementations)]

//! Layered tile-map editing core: tiles, layers, reversible commands with a
//! bounded undo/redo history, and JSON project files. Drawing goes through
//! macroquad.

pub mod atlas;
pub mod command;
pub mod config;
pub mod context;
mod document;
mod error;
pub mod history;
pub mod layer;
pub mod manager;
pub mod project;
pub mod render;
pub mod stack;
pub mod tile;

pub use atlas::{AtlasRecord, TextureAtlas};
pub use command::Command;
pub use config::EditorConfig;
pub use context::{Context, PaintingMode};
pub use error::DocumentError;
pub use history::{CommandHistory, MAX_HISTORY};
pub use layer::{RenderGroup, TileLayer};
pub use manager::ContextManager;
pub use project::Project;
pub use stack::LayerStack;
pub use tile::Tile;
