//! Projects and their JSON file format.

use std::path::{Path, PathBuf};

use anyhow::Context;
use log::{info, warn};
use serde::Deserialize;
use serde_json::{json, Value as JsonValue};

use crate::atlas::{AtlasRecord, TextureAtlas};
use crate::document::{field, get_str};
use crate::error::DocumentError;
use crate::stack::LayerStack;

/// A map being edited: its layers, the atlases its tiles point into and
/// where it lives on disk.
#[derive(Debug, Clone)]
pub struct Project {
    /// Shown in the editor and written to the file
    pub name: String,
    path: Option<PathBuf>,
    /// Tile content
    pub layer_stack: LayerStack,
    atlases: Vec<TextureAtlas>,
    modified: bool,
}

impl Project {
    /// An unsaved project with no layers or atlases.
    pub fn new(name: impl Into<String>, width: u32, height: u32) -> Self {
        Project {
            name: name.into(),
            path: None,
            layer_stack: LayerStack::new(width, height),
            atlases: Vec::new(),
            modified: false,
        }
    }

    /// File the project was last loaded from or saved to.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Sets the file used by a later save.
    pub fn set_path(&mut self, path: impl Into<PathBuf>) {
        self.path = Some(path.into());
    }

    /// Unsaved changes exist.
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Flags unsaved changes.
    pub fn mark_modified(&mut self) {
        self.modified = true;
    }

    /// Atlases in index order.
    pub fn atlases(&self) -> &[TextureAtlas] {
        &self.atlases
    }

    /// The atlas tiles refer to as `index`.
    pub fn atlas(&self, index: usize) -> Option<&TextureAtlas> {
        self.atlases.get(index)
    }

    /// Mutable access, e.g. to load its texture.
    pub fn atlas_mut(&mut self, index: usize) -> Option<&mut TextureAtlas> {
        self.atlases.get_mut(index)
    }

    /// Returns the index tiles should use to refer to `atlas`.
    pub fn add_atlas(&mut self, atlas: TextureAtlas) -> usize {
        self.atlases.push(atlas);
        self.modified = true;
        self.atlases.len() - 1
    }

    /// The whole project as a JSON document.
    pub fn to_json(&self) -> JsonValue {
        let atlases: Vec<AtlasRecord> = self.atlases.iter().map(TextureAtlas::to_record).collect();
        json!({
            "project_name": self.name,
            "layer_stack": self.layer_stack.to_json(),
            "texture_atlases": atlases,
        })
    }

    /// Decodes a project document. Broken layers and atlas records are
    /// skipped with a warning; a missing name or layer stack is an error.
    pub fn from_json(doc: &JsonValue) -> Result<Self, DocumentError> {
        let name = get_str(doc, "project_name")?.to_owned();
        let layer_stack = LayerStack::from_json(field(doc, "layer_stack")?)?;

        let mut atlases = Vec::new();
        if let Some(records) = doc.get("texture_atlases") {
            let records = records.as_array().ok_or(DocumentError::InvalidField {
                field: "texture_atlases",
                expected: "an array of atlas records",
            })?;
            for (i, record) in records.iter().enumerate() {
                match AtlasRecord::deserialize(record) {
                    Ok(record) => atlases.push(TextureAtlas::from_record(record)),
                    Err(err) => warn!("Skipping atlas {}: {}", i, err),
                }
            }
        }

        for layer in layer_stack.layers() {
            let dangling = layer
                .tiles()
                .iter()
                .filter(|t| t.atlas_index.is_some_and(|i| i >= atlases.len()))
                .count();
            if dangling > 0 {
                warn!(
                    "Layer '{}' has {} tiles referring to missing atlases",
                    layer.name, dangling
                );
            }
        }

        Ok(Project {
            name,
            path: None,
            layer_stack,
            atlases,
            modified: false,
        })
    }

    /// Writes the project to `path`, remembers the path and clears the
    /// modified flag.
    pub fn save_to(&mut self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let path = path.as_ref();
        let txt = serde_json::to_string_pretty(&self.to_json())
            .with_context(|| format!("Serializing project {}", self.name))?;
        std::fs::write(path, txt)
            .with_context(|| format!("Writing project file {}", path.display()))?;

        self.path = Some(path.to_path_buf());
        self.modified = false;
        info!("Saved project '{}' to {}", self.name, path.display());
        Ok(())
    }

    /// Reads and decodes a project file, remembering its path.
    pub fn load_from(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let txt = std::fs::read_to_string(path)
            .with_context(|| format!("Reading project file {}", path.display()))?;
        let doc: JsonValue = serde_json::from_str(&txt)
            .with_context(|| format!("Parsing project file {}", path.display()))?;
        let mut project = Project::from_json(&doc)
            .with_context(|| format!("Decoding project file {}", path.display()))?;

        project.path = Some(path.to_path_buf());
        info!(
            "Loaded project '{}' ({}x{}, {} layers) from {}",
            project.name,
            project.layer_stack.width(),
            project.layer_stack.height(),
            project.layer_stack.layer_count(),
            path.display()
        );
        Ok(project)
    }
}
