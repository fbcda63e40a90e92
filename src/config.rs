//! Editor settings loaded from a JSON file.

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::history::MAX_HISTORY;

fn default_history_capacity() -> usize {
    MAX_HISTORY
}
fn default_grid() -> u32 {
    32
}
fn default_tile_size() -> f32 {
    32.0
}
fn default_project_name() -> String {
    "Untitled".to_owned()
}

/// Editor-wide settings. Every field falls back to its default when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorConfig {
    /// Bound on each of the undo and redo stacks
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,
    /// Grid columns of a new project
    #[serde(default = "default_grid")]
    pub default_width: u32,
    /// Grid rows of a new project
    #[serde(default = "default_grid")]
    pub default_height: u32,
    /// World units per grid cell
    #[serde(default = "default_tile_size")]
    pub tile_size: f32,
    /// Name given to projects created without one
    #[serde(default = "default_project_name")]
    pub default_project_name: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        EditorConfig {
            history_capacity: default_history_capacity(),
            default_width: default_grid(),
            default_height: default_grid(),
            tile_size: default_tile_size(),
            default_project_name: default_project_name(),
        }
    }
}

impl EditorConfig {
    /// Reads settings from a JSON file; missing fields take their defaults.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let txt = std::fs::read_to_string(path)
            .with_context(|| format!("Reading config file {}", path.display()))?;
        let config = serde_json::from_str(&txt)
            .with_context(|| format!("Parsing config file {}", path.display()))?;
        Ok(config)
    }
}
