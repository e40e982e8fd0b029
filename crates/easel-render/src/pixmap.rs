//! CPU surface backed by a tiny-skia pixmap.

use crate::snapshot::RasterSnapshot;
use crate::surface::{CompositeMode, RenderError, RenderResult, SampleError, Surface};
use easel_core::SerializableColor;
use kurbo::{BezPath, Cap, Join, PathEl, Stroke};
use peniko::Color;
use tiny_skia::{
    BlendMode, FillRule, IntSize, LineCap, LineJoin, Paint, PathBuilder, Pixmap, PixmapPaint,
    StrokeDash, Transform,
};

/// A premultiplied RGBA8 surface.
#[derive(Clone)]
pub struct PixmapSurface {
    pixmap: Pixmap,
}

impl std::fmt::Debug for PixmapSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixmapSurface")
            .field("width", &self.pixmap.width())
            .field("height", &self.pixmap.height())
            .finish()
    }
}

impl PixmapSurface {
    /// Create a transparent surface.
    pub fn new(width: u32, height: u32) -> RenderResult<Self> {
        let pixmap = Pixmap::new(width, height).ok_or(RenderError::InvalidDimensions { width, height })?;
        Ok(Self { pixmap })
    }

    /// Wrap premultiplied RGBA8 bytes.
    pub fn from_premultiplied(width: u32, height: u32, data: Vec<u8>) -> RenderResult<Self> {
        let size = IntSize::from_wh(width, height).ok_or(RenderError::InvalidDimensions { width, height })?;
        let expected = width as usize * height as usize * 4;
        let got = data.len();
        let pixmap = Pixmap::from_vec(data, size).ok_or(RenderError::SnapshotMismatch { expected, got })?;
        Ok(Self { pixmap })
    }

    /// Build a surface from straight (non-premultiplied) RGBA8 bytes.
    pub fn from_rgba(width: u32, height: u32, rgba: &[u8]) -> RenderResult<Self> {
        let expected = width as usize * height as usize * 4;
        if rgba.len() != expected {
            return Err(RenderError::SnapshotMismatch {
                expected,
                got: rgba.len(),
            });
        }
        let data = rgba
            .chunks_exact(4)
            .flat_map(|px| {
                let a = px[3] as u16;
                let premul = |c: u8| ((c as u16 * a + 127) / 255) as u8;
                [premul(px[0]), premul(px[1]), premul(px[2]), px[3]]
            })
            .collect();
        Self::from_premultiplied(width, height, data)
    }

    /// Premultiplied RGBA8 bytes, row-major.
    pub fn data(&self) -> &[u8] {
        self.pixmap.data()
    }

    /// Straight RGBA8 bytes, row-major.
    pub fn to_rgba(&self) -> Vec<u8> {
        self.pixmap
            .pixels()
            .iter()
            .flat_map(|px| {
                let c = px.demultiply();
                [c.red(), c.green(), c.blue(), c.alpha()]
            })
            .collect()
    }

    /// Capture the pixels for history.
    pub fn snapshot(&self) -> RasterSnapshot {
        RasterSnapshot::new(self.width(), self.height(), self.pixmap.data().into())
    }

    /// Overwrite all pixels from a decoded surface of the same size.
    pub fn replace_with(&mut self, other: PixmapSurface) -> RenderResult<()> {
        if other.width() != self.width() || other.height() != self.height() {
            return Err(RenderError::SnapshotMismatch {
                expected: self.pixmap.data().len(),
                got: other.pixmap.data().len(),
            });
        }
        self.pixmap = other.pixmap;
        Ok(())
    }

    /// Encode as an RGBA PNG.
    pub fn encode_png(&self) -> RenderResult<Vec<u8>> {
        crate::snapshot::encode_png(&self.to_rgba(), self.width(), self.height())
    }
}

fn to_skia_color(color: Color) -> tiny_skia::Color {
    let c = color.to_rgba8();
    tiny_skia::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn paint_for(color: Color, mode: CompositeMode) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(to_skia_color(color));
    paint.anti_alias = true;
    paint.blend_mode = match mode {
        CompositeMode::SourceOver => BlendMode::SourceOver,
        CompositeMode::DestinationOut => BlendMode::DestinationOut,
    };
    paint
}

/// Convert a kurbo path; `None` if it has no drawable geometry.
fn to_skia_path(path: &BezPath) -> Option<tiny_skia::Path> {
    let mut pb = PathBuilder::new();
    for el in path.elements() {
        match *el {
            PathEl::MoveTo(p) => pb.move_to(p.x as f32, p.y as f32),
            PathEl::LineTo(p) => pb.line_to(p.x as f32, p.y as f32),
            PathEl::QuadTo(p1, p2) => pb.quad_to(p1.x as f32, p1.y as f32, p2.x as f32, p2.y as f32),
            PathEl::CurveTo(p1, p2, p3) => pb.cubic_to(
                p1.x as f32,
                p1.y as f32,
                p2.x as f32,
                p2.y as f32,
                p3.x as f32,
                p3.y as f32,
            ),
            PathEl::ClosePath => pb.close(),
        }
    }
    pb.finish()
}

fn to_skia_stroke(stroke: &Stroke) -> tiny_skia::Stroke {
    let line_cap = match stroke.start_cap {
        Cap::Butt => LineCap::Butt,
        Cap::Square => LineCap::Square,
        Cap::Round => LineCap::Round,
    };
    let line_join = match stroke.join {
        Join::Bevel => LineJoin::Bevel,
        Join::Miter => LineJoin::Miter,
        Join::Round => LineJoin::Round,
    };
    let dash = if stroke.dash_pattern.is_empty() {
        None
    } else {
        StrokeDash::new(
            stroke.dash_pattern.iter().map(|d| *d as f32).collect(),
            stroke.dash_offset as f32,
        )
    };
    tiny_skia::Stroke {
        width: stroke.width as f32,
        miter_limit: stroke.miter_limit as f32,
        line_cap,
        line_join,
        dash,
    }
}

impl Surface for PixmapSurface {
    fn width(&self) -> u32 {
        self.pixmap.width()
    }

    fn height(&self) -> u32 {
        self.pixmap.height()
    }

    fn clear(&mut self, color: Option<Color>) {
        let color = color.map(to_skia_color).unwrap_or(tiny_skia::Color::TRANSPARENT);
        self.pixmap.fill(color);
    }

    fn fill_path(&mut self, path: &BezPath, color: Color, mode: CompositeMode) {
        if let Some(path) = to_skia_path(path) {
            let paint = paint_for(color, mode);
            self.pixmap
                .fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
        }
    }

    fn stroke_path(&mut self, path: &BezPath, color: Color, stroke: &Stroke, mode: CompositeMode) {
        if stroke.width <= 0.0 {
            return;
        }
        if let Some(path) = to_skia_path(path) {
            let paint = paint_for(color, mode);
            self.pixmap.stroke_path(
                &path,
                &paint,
                &to_skia_stroke(stroke),
                Transform::identity(),
                None,
            );
        }
    }

    fn draw_surface(&mut self, other: &Self) {
        self.pixmap.draw_pixmap(
            0,
            0,
            other.pixmap.as_ref(),
            &PixmapPaint::default(),
            Transform::identity(),
            None,
        );
    }

    fn sample(&self, x: i64, y: i64) -> Result<SerializableColor, SampleError> {
        if x < 0 || y < 0 || x >= self.width() as i64 || y >= self.height() as i64 {
            return Err(SampleError { x, y });
        }
        let px = self
            .pixmap
            .pixel(x as u32, y as u32)
            .ok_or(SampleError { x, y })?
            .demultiply();
        Ok(SerializableColor::new(px.red(), px.green(), px.blue(), px.alpha()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::{Rect, Shape as _};

    #[test]
    fn test_invalid_dimensions() {
        assert!(matches!(
            PixmapSurface::new(0, 10),
            Err(RenderError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_clear_and_sample() {
        let mut surface = PixmapSurface::new(4, 4).unwrap();
        assert_eq!(surface.sample(0, 0).unwrap().a, 0);
        surface.clear(Some(Color::WHITE));
        assert_eq!(surface.sample(3, 3).unwrap(), SerializableColor::white());
        assert_eq!(surface.sample(4, 0), Err(SampleError { x: 4, y: 0 }));
        assert!(surface.sample(-1, 2).is_err());
    }

    #[test]
    fn test_fill_and_erase() {
        let mut surface = PixmapSurface::new(20, 20).unwrap();
        surface.clear(Some(Color::WHITE));
        let rect = Rect::new(5.0, 5.0, 15.0, 15.0).to_path(0.1);
        surface.fill_path(&rect, Color::from_rgba8(255, 0, 0, 255), CompositeMode::SourceOver);
        assert_eq!(surface.sample(10, 10).unwrap(), SerializableColor::new(255, 0, 0, 255));

        surface.fill_path(&rect, Color::BLACK, CompositeMode::DestinationOut);
        assert_eq!(surface.sample(10, 10).unwrap().a, 0);
        // Outside the erased area stays white.
        assert_eq!(surface.sample(1, 1).unwrap(), SerializableColor::white());
    }

    #[test]
    fn test_stroke_path() {
        let mut surface = PixmapSurface::new(20, 20).unwrap();
        let mut line = BezPath::new();
        line.move_to((0.0, 10.0));
        line.line_to((20.0, 10.0));
        surface.stroke_path(&line, Color::BLACK, &Stroke::new(4.0), CompositeMode::SourceOver);
        assert_eq!(surface.sample(10, 10).unwrap().a, 255);
        assert_eq!(surface.sample(10, 2).unwrap().a, 0);
    }

    #[test]
    fn test_rgba_roundtrip_opaque() {
        let rgba: Vec<u8> = (0..16).flat_map(|i| [i as u8 * 10, 50, 200, 255]).collect();
        let surface = PixmapSurface::from_rgba(4, 4, &rgba).unwrap();
        assert_eq!(surface.to_rgba(), rgba);
    }

    #[test]
    fn test_from_rgba_wrong_length() {
        assert!(matches!(
            PixmapSurface::from_rgba(2, 2, &[0; 3]),
            Err(RenderError::SnapshotMismatch { expected: 16, got: 3 })
        ));
    }

    #[test]
    fn test_draw_surface_composites() {
        let mut base = PixmapSurface::new(8, 8).unwrap();
        base.clear(Some(Color::WHITE));
        let mut top = PixmapSurface::new(8, 8).unwrap();
        top.fill_path(
            &Rect::new(0.0, 0.0, 4.0, 8.0).to_path(0.1),
            Color::BLACK,
            CompositeMode::SourceOver,
        );
        base.draw_surface(&top);
        assert_eq!(base.sample(1, 1).unwrap(), SerializableColor::black());
        assert_eq!(base.sample(6, 1).unwrap(), SerializableColor::white());
    }
}
