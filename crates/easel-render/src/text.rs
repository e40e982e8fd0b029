//! Text baked into the raster as filled glyph outlines.

use crate::surface::{CompositeMode, RenderError, RenderResult, Surface};
use ab_glyph::{Font, FontArc, GlyphId, OutlineCurve, ScaleFont};
use kurbo::{BezPath, Point};
use peniko::Color;
use std::path::Path;

/// DejaVu Sans, used unless a font file is configured.
static DEFAULT_FONT: &[u8] = include_bytes!("../assets/DejaVuSans.ttf");

/// Lays out and fills text with one font.
#[derive(Clone)]
pub struct TextRenderer {
    font: FontArc,
}

impl std::fmt::Debug for TextRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextRenderer")
            .field("glyphs", &self.font.glyph_count())
            .finish()
    }
}

impl TextRenderer {
    /// A renderer using the bundled default font.
    pub fn new() -> RenderResult<Self> {
        let font = FontArc::try_from_slice(DEFAULT_FONT).map_err(|e| RenderError::Font(e.to_string()))?;
        Ok(Self { font })
    }

    pub fn from_bytes(bytes: Vec<u8>) -> RenderResult<Self> {
        let font = FontArc::try_from_vec(bytes).map_err(|e| RenderError::Font(e.to_string()))?;
        Ok(Self { font })
    }

    pub fn load(path: impl AsRef<Path>) -> RenderResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| RenderError::Font(format!("{}: {e}", path.display())))?;
        log::info!("Loaded font from {}", path.display());
        Self::from_bytes(bytes)
    }

    /// Outline of `text` with the first baseline starting at `origin`.
    ///
    /// Newlines start a new line one line-height down.
    pub fn layout(&self, text: &str, origin: Point, size: f64) -> BezPath {
        let font = &self.font;
        let scaled = font.as_scaled(size as f32);
        let sx = scaled.h_scale_factor() as f64;
        let sy = scaled.v_scale_factor() as f64;
        let line_height = (scaled.height() + scaled.line_gap()) as f64;

        let mut path = BezPath::new();
        for (line_no, line) in text.lines().enumerate() {
            let baseline = origin.y + line_no as f64 * line_height;
            let mut cursor_x = origin.x;
            let mut last_glyph: Option<GlyphId> = None;
            for ch in line.chars() {
                let glyph_id = font.glyph_id(ch);
                if let Some(prev) = last_glyph {
                    cursor_x += scaled.kern(prev, glyph_id) as f64;
                }
                if let Some(outline) = font.outline(glyph_id) {
                    let place = |p: ab_glyph::Point| {
                        Point::new(cursor_x + p.x as f64 * sx, baseline - p.y as f64 * sy)
                    };
                    append_curves(&mut path, &outline.curves, place);
                }
                cursor_x += scaled.h_advance(glyph_id) as f64;
                last_glyph = Some(glyph_id);
            }
        }
        path
    }

    /// Fill `text` onto `surface`.
    pub fn paint_text<S: Surface>(&self, surface: &mut S, text: &str, origin: Point, size: f64, color: Color) {
        let path = self.layout(text, origin, size);
        surface.fill_path(&path, color, CompositeMode::SourceOver);
    }
}

/// Glyph curves come as a flat list; a gap between segments starts a contour.
fn append_curves(path: &mut BezPath, curves: &[OutlineCurve], place: impl Fn(ab_glyph::Point) -> Point) {
    let mut last: Option<ab_glyph::Point> = None;
    for curve in curves {
        let (start, end) = match curve {
            OutlineCurve::Line(p0, p1) => (*p0, *p1),
            OutlineCurve::Quad(p0, _, p2) => (*p0, *p2),
            OutlineCurve::Cubic(p0, _, _, p3) => (*p0, *p3),
        };
        if last != Some(start) {
            if last.is_some() {
                path.close_path();
            }
            path.move_to(place(start));
        }
        match curve {
            OutlineCurve::Line(_, p1) => path.line_to(place(*p1)),
            OutlineCurve::Quad(_, p1, p2) => path.quad_to(place(*p1), place(*p2)),
            OutlineCurve::Cubic(_, p1, p2, p3) => path.curve_to(place(*p1), place(*p2), place(*p3)),
        }
        last = Some(end);
    }
    if last.is_some() {
        path.close_path();
    }
}
