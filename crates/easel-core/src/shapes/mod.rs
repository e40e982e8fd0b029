//! Shape records for the live vector layer.
//!
//! Shapes sit above the raster and are re-rendered on every repaint. Each
//! record owns its geometry, style, and a denormalized `selected` flag that
//! the [`ShapeStore`](crate::store::ShapeStore) keeps in sync.

mod ellipse;
pub(crate) mod frame;
mod line;

pub use ellipse::{Circle, Ellipse};
pub use frame::Frame;
pub use line::Line;

use kurbo::{BezPath, Point, Rect, Vec2};
use peniko::Color;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }

    /// Parse `#rrggbb` or `#rrggbbaa`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        match hex.len() {
            6 => Some(Self::new(channel(0)?, channel(2)?, channel(4)?, 255)),
            8 => Some(Self::new(channel(0)?, channel(2)?, channel(4)?, channel(6)?)),
            _ => None,
        }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Same color with its alpha scaled by `opacity`.
    pub fn with_opacity(self, opacity: f64) -> Self {
        let a = (self.a as f64 * opacity.clamp(0.0, 1.0)).round() as u8;
        Self { a, ..self }
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Style properties for shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeStyle {
    /// Stroke (and fill) color.
    pub color: SerializableColor,
    /// Overall opacity (0.0 = fully transparent, 1.0 = fully opaque).
    #[serde(default = "default_opacity")]
    pub opacity: f64,
    /// Outline width.
    pub stroke_width: f64,
    /// Whether the interior is painted. Lines ignore this.
    #[serde(default)]
    pub filled: bool,
}

fn default_opacity() -> f64 {
    1.0
}

impl ShapeStyle {
    /// Get the color with opacity applied.
    pub fn color_with_opacity(&self) -> Color {
        self.color.with_opacity(self.opacity).into()
    }
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self {
            color: SerializableColor::black(),
            opacity: 1.0,
            stroke_width: 2.0,
            filled: false,
        }
    }
}

/// Unique identifier for shapes.
pub type ShapeId = Uuid;

/// Discriminant of the shape geometry, used by shape tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Line,
    Rectangle,
    Circle,
    Ellipse,
    Triangle,
    Star,
    Diamond,
    Hexagon,
    Pentagon,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 9] = [
        ShapeKind::Line,
        ShapeKind::Rectangle,
        ShapeKind::Circle,
        ShapeKind::Ellipse,
        ShapeKind::Triangle,
        ShapeKind::Star,
        ShapeKind::Diamond,
        ShapeKind::Hexagon,
        ShapeKind::Pentagon,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ShapeKind::Line => "line",
            ShapeKind::Rectangle => "rectangle",
            ShapeKind::Circle => "circle",
            ShapeKind::Ellipse => "ellipse",
            ShapeKind::Triangle => "triangle",
            ShapeKind::Star => "star",
            ShapeKind::Diamond => "diamond",
            ShapeKind::Hexagon => "hexagon",
            ShapeKind::Pentagon => "pentagon",
        }
    }
}

/// Distance from a point to a line segment (a to b).
pub fn point_to_segment_dist(point: Point, a: Point, b: Point) -> f64 {
    let seg = Vec2::new(b.x - a.x, b.y - a.y);
    let pv = Vec2::new(point.x - a.x, point.y - a.y);
    let len_sq = seg.hypot2();
    if len_sq < f64::EPSILON {
        return pv.hypot();
    }
    let t = (pv.dot(seg) / len_sq).clamp(0.0, 1.0);
    let proj = Point::new(a.x + t * seg.x, a.y + t * seg.y);
    ((point.x - proj.x).powi(2) + (point.y - proj.y).powi(2)).sqrt()
}

/// Type-specific geometry of a shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Geometry {
    Line(Line),
    Rectangle(Frame),
    Circle(Circle),
    Ellipse(Ellipse),
    Triangle(Frame),
    Star(Frame),
    Diamond(Frame),
    Hexagon(Frame),
    Pentagon(Frame),
}

impl Geometry {
    pub fn kind(&self) -> ShapeKind {
        match self {
            Geometry::Line(_) => ShapeKind::Line,
            Geometry::Rectangle(_) => ShapeKind::Rectangle,
            Geometry::Circle(_) => ShapeKind::Circle,
            Geometry::Ellipse(_) => ShapeKind::Ellipse,
            Geometry::Triangle(_) => ShapeKind::Triangle,
            Geometry::Star(_) => ShapeKind::Star,
            Geometry::Diamond(_) => ShapeKind::Diamond,
            Geometry::Hexagon(_) => ShapeKind::Hexagon,
            Geometry::Pentagon(_) => ShapeKind::Pentagon,
        }
    }

    /// Wrap a frame in the box-based variant for `kind`.
    ///
    /// Returns `None` for kinds that are not described by a bounding box.
    pub fn from_frame(kind: ShapeKind, frame: Frame) -> Option<Self> {
        match kind {
            ShapeKind::Rectangle => Some(Geometry::Rectangle(frame)),
            ShapeKind::Triangle => Some(Geometry::Triangle(frame)),
            ShapeKind::Star => Some(Geometry::Star(frame)),
            ShapeKind::Diamond => Some(Geometry::Diamond(frame)),
            ShapeKind::Hexagon => Some(Geometry::Hexagon(frame)),
            ShapeKind::Pentagon => Some(Geometry::Pentagon(frame)),
            ShapeKind::Line | ShapeKind::Circle | ShapeKind::Ellipse => None,
        }
    }

    /// The bounding frame of a box-based shape.
    pub fn frame(&self) -> Option<&Frame> {
        match self {
            Geometry::Rectangle(f)
            | Geometry::Triangle(f)
            | Geometry::Star(f)
            | Geometry::Diamond(f)
            | Geometry::Hexagon(f)
            | Geometry::Pentagon(f) => Some(f),
            Geometry::Line(_) | Geometry::Circle(_) | Geometry::Ellipse(_) => None,
        }
    }

    pub fn bounds(&self) -> Rect {
        match self {
            Geometry::Line(l) => l.bounds(),
            Geometry::Circle(c) => c.bounds(),
            Geometry::Ellipse(e) => e.bounds(),
            Geometry::Rectangle(f)
            | Geometry::Triangle(f)
            | Geometry::Star(f)
            | Geometry::Diamond(f)
            | Geometry::Hexagon(f)
            | Geometry::Pentagon(f) => f.rect(),
        }
    }

    /// The outline used both for drawing and for the selection highlight.
    pub fn to_path(&self) -> BezPath {
        match self {
            Geometry::Line(l) => l.to_path(),
            Geometry::Circle(c) => c.to_path(),
            Geometry::Ellipse(e) => e.to_path(),
            Geometry::Rectangle(f) => f.rect_path(),
            Geometry::Triangle(f) => polygon_path(&f.triangle()),
            Geometry::Star(f) => polygon_path(&f.star()),
            Geometry::Diamond(f) => polygon_path(&f.diamond()),
            Geometry::Hexagon(f) => polygon_path(&f.hexagon()),
            Geometry::Pentagon(f) => polygon_path(&f.pentagon()),
        }
    }

    pub fn translate(&mut self, delta: Vec2) {
        match self {
            Geometry::Line(l) => {
                l.start += delta;
                l.end += delta;
            }
            Geometry::Circle(c) => c.center += delta,
            Geometry::Ellipse(e) => e.center += delta,
            Geometry::Rectangle(f)
            | Geometry::Triangle(f)
            | Geometry::Star(f)
            | Geometry::Diamond(f)
            | Geometry::Hexagon(f)
            | Geometry::Pentagon(f) => {
                f.x += delta.x;
                f.y += delta.y;
            }
        }
    }
}

/// Closed polygon through `points`.
pub(crate) fn polygon_path(points: &[Point]) -> BezPath {
    let mut path = BezPath::new();
    let mut iter = points.iter();
    if let Some(first) = iter.next() {
        path.move_to(*first);
        for p in iter {
            path.line_to(*p);
        }
        path.close_path();
    }
    path
}

/// A shape record: id, geometry, style and selection flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    pub(crate) id: ShapeId,
    pub geometry: Geometry,
    pub style: ShapeStyle,
    #[serde(default)]
    pub selected: bool,
}

impl Shape {
    /// Create a new shape with a fresh id.
    pub fn new(geometry: Geometry, style: ShapeStyle) -> Self {
        Self {
            id: Uuid::new_v4(),
            geometry,
            style,
            selected: false,
        }
    }

    pub fn id(&self) -> ShapeId {
        self.id
    }

    pub fn kind(&self) -> ShapeKind {
        self.geometry.kind()
    }

    pub fn bounds(&self) -> Rect {
        self.geometry.bounds()
    }

    pub fn to_path(&self) -> BezPath {
        self.geometry.to_path()
    }

    /// Equal geometry, style and id, ignoring the selection flag.
    pub fn same_content(&self, other: &Shape) -> bool {
        self.id == other.id && self.geometry == other.geometry && self.style == other.style
    }
}
