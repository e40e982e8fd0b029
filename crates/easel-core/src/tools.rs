//! Tools, brush styles and the per-style brush profile table.

use crate::shapes::{SerializableColor, ShapeKind, ShapeStyle};
use serde::{Deserialize, Serialize};

/// Generate a fresh seed for one brush stroke.
/// Uses a simple counter + hash approach that works on all platforms including WASM.
pub fn generate_stroke_seed() -> u32 {
    use std::sync::atomic::{AtomicU32, Ordering};

    static SEED_COUNTER: AtomicU32 = AtomicU32::new(1);

    let counter = SEED_COUNTER.fetch_add(1, Ordering::Relaxed);

    // splitmix32-like mixing
    let mut x = counter.wrapping_mul(0x9E3779B9);
    x ^= x >> 16;
    x = x.wrapping_mul(0x85EBCA6B);
    x ^= x >> 13;
    x = x.wrapping_mul(0xC2B2AE35);
    x ^= x >> 16;
    // xorshift generators must not start from zero.
    x.max(1)
}

/// Largest nominal brush and eraser size, in pixels.
pub const MAX_BRUSH_SIZE: f64 = 200.0;

/// Clamp a requested brush size into `[0, MAX_BRUSH_SIZE]`. NaN becomes zero.
pub fn clamp_brush_size(size: f64) -> f64 {
    size.max(0.0).min(MAX_BRUSH_SIZE)
}

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    #[default]
    Brush,
    Eraser,
    Shape(ShapeKind),
    Select,
    Text,
}

impl ToolKind {
    pub fn name(&self) -> &'static str {
        match self {
            ToolKind::Brush => "brush",
            ToolKind::Eraser => "eraser",
            ToolKind::Shape(kind) => kind.name(),
            ToolKind::Select => "select",
            ToolKind::Text => "text",
        }
    }
}

/// Rendering algorithm used by the brush tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BrushStyle {
    /// Watercolor-like soft brush.
    #[default]
    Soft,
    Marker,
    Pencil,
    Fine,
    Droplet,
    Crayon,
}

impl BrushStyle {
    pub const ALL: [BrushStyle; 6] = [
        BrushStyle::Soft,
        BrushStyle::Marker,
        BrushStyle::Pencil,
        BrushStyle::Fine,
        BrushStyle::Droplet,
        BrushStyle::Crayon,
    ];

    /// Cycle to the next brush style.
    pub fn next(self) -> Self {
        match self {
            BrushStyle::Soft => BrushStyle::Marker,
            BrushStyle::Marker => BrushStyle::Pencil,
            BrushStyle::Pencil => BrushStyle::Fine,
            BrushStyle::Fine => BrushStyle::Droplet,
            BrushStyle::Droplet => BrushStyle::Crayon,
            BrushStyle::Crayon => BrushStyle::Soft,
        }
    }
}

/// Tunables for one brush style.
///
/// Widths are multiples of the nominal brush size; alphas multiply the
/// stroke opacity. Each style reads the fields it needs.
/// Fields missing from a serialized profile take the plain single-stroke values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrushProfile {
    /// Main stroke width.
    pub width_scale: f64,
    pub main_alpha: f64,
    /// Underlay width; zero disables the underlay.
    pub underlay_scale: f64,
    pub underlay_alpha: f64,
    /// Texture strokes per segment (bleed, companion lines, jitter lines, splashes).
    pub texture_passes: u32,
    pub texture_alpha: f64,
    /// Random offset of texture strokes.
    pub jitter: f64,
    /// Minimum brush size for cross-hatching.
    pub hatch_min_size: f64,
    /// Minimum brush size for stippled dots.
    pub stipple_min_size: f64,
    /// Minimum brush size for thick-center/thin-edge strokes.
    pub edge_min_size: f64,
    /// Pixels sampled by the smudge pass; zero disables it.
    pub smudge_samples: u32,
}

impl Default for BrushProfile {
    fn default() -> Self {
        Self::base()
    }
}

impl BrushProfile {
    fn base() -> Self {
        Self {
            width_scale: 1.0,
            main_alpha: 1.0,
            underlay_scale: 0.0,
            underlay_alpha: 0.0,
            texture_passes: 0,
            texture_alpha: 0.0,
            jitter: 0.0,
            hatch_min_size: f64::MAX,
            stipple_min_size: f64::MAX,
            edge_min_size: f64::MAX,
            smudge_samples: 0,
        }
    }
}

/// Brush profiles keyed by [`BrushStyle`], resolved once per stroke.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrushProfiles {
    pub soft: BrushProfile,
    pub marker: BrushProfile,
    pub pencil: BrushProfile,
    pub fine: BrushProfile,
    pub droplet: BrushProfile,
    pub crayon: BrushProfile,
}

impl BrushProfiles {
    pub fn get(&self, style: BrushStyle) -> &BrushProfile {
        match style {
            BrushStyle::Soft => &self.soft,
            BrushStyle::Marker => &self.marker,
            BrushStyle::Pencil => &self.pencil,
            BrushStyle::Fine => &self.fine,
            BrushStyle::Droplet => &self.droplet,
            BrushStyle::Crayon => &self.crayon,
        }
    }
}

impl Default for BrushProfiles {
    fn default() -> Self {
        Self {
            soft: BrushProfile {
                underlay_scale: 1.6,
                underlay_alpha: 0.15,
                texture_passes: 3,
                texture_alpha: 0.12,
                jitter: 0.35,
                ..BrushProfile::base()
            },
            marker: BrushProfile {
                width_scale: 1.2,
                main_alpha: 0.85,
                underlay_scale: 2.0,
                underlay_alpha: 0.1,
                texture_passes: 2,
                texture_alpha: 0.25,
                jitter: 0.3,
                hatch_min_size: 12.0,
                stipple_min_size: 6.0,
                edge_min_size: 8.0,
                ..BrushProfile::base()
            },
            pencil: BrushProfile {
                width_scale: 0.8,
                main_alpha: 0.95,
                texture_passes: 4,
                texture_alpha: 0.2,
                jitter: 0.6,
                ..BrushProfile::base()
            },
            fine: BrushProfile {
                width_scale: 0.5,
                ..BrushProfile::base()
            },
            droplet: BrushProfile {
                width_scale: 0.5,
                main_alpha: 0.9,
                texture_passes: 4,
                texture_alpha: 0.6,
                jitter: 2.0,
                ..BrushProfile::base()
            },
            crayon: BrushProfile {
                width_scale: 0.3,
                main_alpha: 0.7,
                texture_passes: 4,
                texture_alpha: 0.35,
                jitter: 0.4,
                smudge_samples: 3,
                ..BrushProfile::base()
            },
        }
    }
}

/// User-adjustable tool settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolSettings {
    pub tool: ToolKind,
    pub brush_style: BrushStyle,
    pub color: SerializableColor,
    /// Nominal brush and eraser size.
    pub brush_size: f64,
    /// Stroke and shape opacity.
    pub opacity: f64,
    /// Outline width for new shapes.
    pub stroke_width: f64,
    /// Whether new shapes are filled.
    pub filled: bool,
    pub font_size: f64,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            tool: ToolKind::default(),
            brush_style: BrushStyle::default(),
            color: SerializableColor::black(),
            brush_size: 8.0,
            opacity: 1.0,
            stroke_width: 2.0,
            filled: false,
            font_size: 24.0,
        }
    }
}

impl ToolSettings {
    /// Style applied to newly created shapes.
    pub fn shape_style(&self) -> ShapeStyle {
        ShapeStyle {
            color: self.color,
            opacity: self.opacity,
            stroke_width: self.stroke_width,
            filled: self.filled,
        }
    }
}
