//! Finished artwork handed to the host for persistence.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use easel_core::{BrushStyle, SerializableColor, Shape, ToolKind};
use serde::Serialize;

/// Flattened raster plus shape and tool metadata.
#[derive(Debug, Clone)]
pub struct Artwork {
    /// PNG encoding of the flattened raster.
    pub png: Vec<u8>,
    /// Straight RGBA8 pixels of the flattened raster.
    pub pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub tool: ToolKind,
    pub brush_style: BrushStyle,
    pub color: SerializableColor,
    pub shapes: Vec<Shape>,
}

#[derive(Serialize)]
struct ArtworkJson<'a> {
    image: String,
    width: u32,
    height: u32,
    tool: ToolKind,
    brush_style: BrushStyle,
    color: String,
    shapes: &'a [Shape],
}

impl Artwork {
    /// The PNG as a `data:` URL.
    pub fn data_url(&self) -> String {
        format!("data:image/png;base64,{}", STANDARD.encode(&self.png))
    }

    /// Flat JSON snapshot with the image inlined as a data URL.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&ArtworkJson {
            image: self.data_url(),
            width: self.width,
            height: self.height,
            tool: self.tool,
            brush_style: self.brush_style,
            color: self.color.to_hex(),
            shapes: &self.shapes,
        })
    }
}
