//! Immediate-mode drawing surface abstraction.

use easel_core::SerializableColor;
use kurbo::{BezPath, Stroke};
use peniko::Color;
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("invalid surface dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
    #[error("snapshot is {got} bytes, expected {expected}")]
    SnapshotMismatch { expected: usize, got: usize },
    #[error("image decode failed: {0}")]
    Decode(String),
    #[error("PNG encode failed: {0}")]
    Encode(String),
    #[error("font load failed: {0}")]
    Font(String),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// A pixel read outside the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("sample at ({x}, {y}) is outside the surface")]
pub struct SampleError {
    pub x: i64,
    pub y: i64,
}

/// How new paint combines with what is already on the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompositeMode {
    /// Paint over existing content.
    #[default]
    SourceOver,
    /// Remove existing content where the new paint is opaque.
    DestinationOut,
}

/// A fixed-size 2D raster that can be painted on.
///
/// Paths are in surface pixel coordinates. Colors carry their own alpha.
pub trait Surface {
    fn width(&self) -> u32;

    fn height(&self) -> u32;

    /// Fill every pixel with `color`, or make it transparent.
    fn clear(&mut self, color: Option<Color>);

    fn fill_path(&mut self, path: &BezPath, color: Color, mode: CompositeMode);

    fn stroke_path(&mut self, path: &BezPath, color: Color, stroke: &Stroke, mode: CompositeMode);

    /// Composite `other` over this surface at the origin.
    fn draw_surface(&mut self, other: &Self);

    /// Straight (non-premultiplied) color of one pixel.
    fn sample(&self, x: i64, y: i64) -> Result<SerializableColor, SampleError>;

    /// Fill a circle; a convenience over [`fill_path`](Self::fill_path).
    fn fill_circle(&mut self, center: kurbo::Point, radius: f64, color: Color, mode: CompositeMode) {
        use kurbo::Shape as _;
        if radius <= 0.0 {
            return;
        }
        let path = kurbo::Circle::new(center, radius).to_path(0.1);
        self.fill_path(&path, color, mode);
    }
}
