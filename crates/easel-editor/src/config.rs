//! Session configuration, loaded from JSON.

use crate::error::{EditorError, EditorResult};
use easel_core::history::DEFAULT_HISTORY_LIMIT;
use easel_core::{BrushProfiles, MAX_BRUSH_SIZE, SerializableColor, ToolSettings};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Editor session configuration. Every field has a default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Surface width in pixels.
    pub width: u32,
    /// Surface height in pixels.
    pub height: u32,
    /// Initial raster fill; `None` leaves it transparent.
    pub background: Option<SerializableColor>,
    /// Entries kept per history stack.
    pub history_limit: usize,
    /// Radius of resize handles, also their hit radius.
    pub handle_radius: f64,
    /// Tool settings at session start.
    pub tools: ToolSettings,
    pub brushes: BrushProfiles,
    /// TrueType/OpenType font for the text tool.
    pub font_path: Option<PathBuf>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            background: Some(SerializableColor::white()),
            history_limit: DEFAULT_HISTORY_LIMIT,
            handle_radius: 6.0,
            tools: ToolSettings::default(),
            brushes: BrushProfiles::default(),
            font_path: None,
        }
    }
}

impl EditorConfig {
    pub fn from_json(json: &str) -> EditorResult<Self> {
        let config: Self = serde_json::from_str(json).map_err(|e| EditorError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> EditorResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        log::info!("Loading config from {}", path.display());
        Self::from_json(&json)
    }

    fn validate(&self) -> EditorResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(EditorError::Config(format!(
                "surface must not be empty ({}x{})",
                self.width, self.height
            )));
        }
        if self.history_limit == 0 {
            return Err(EditorError::Config("history_limit must be at least 1".into()));
        }
        if !(self.handle_radius > 0.0) {
            return Err(EditorError::Config("handle_radius must be positive".into()));
        }
        let size = self.tools.brush_size;
        if !(0.0..=MAX_BRUSH_SIZE).contains(&size) {
            return Err(EditorError::Config(format!(
                "brush_size must be within 0..={MAX_BRUSH_SIZE} (got {size})"
            )));
        }
        Ok(())
    }
}
