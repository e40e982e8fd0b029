//! Easel Render Library
//!
//! Drawing surfaces and everything that paints on them: the brush engine,
//! the full-repaint shape renderer, baked text and raster snapshots.
//! The default surface is a CPU pixmap backed by tiny-skia.

pub mod brush;
mod pixmap;
pub mod scene;
mod snapshot;
mod surface;
mod text;

pub use brush::{BrushStroke, StrokeKind, StrokePainter};
pub use pixmap::PixmapSurface;
pub use scene::{SceneOptions, draw_preview, flatten, repaint};
pub use snapshot::{BoxFuture, CpuDecoder, RasterSnapshot, SnapshotDecoder, decode_image, encode_png};
pub use surface::{CompositeMode, RenderError, RenderResult, SampleError, Surface};
pub use text::TextRenderer;
