//! Box-based shapes: rectangle, triangle, star, diamond, hexagon and pentagon.
//!
//! All of them are stored as an axis-aligned frame; the visible outline is
//! derived from normalized anchor points `(u, v)` inside the frame, where
//! `(0, 0)` is the top-left corner and `(1, 1)` the bottom-right corner.

use kurbo::{BezPath, Point, Rect, Shape as KurboShape};
use serde::{Deserialize, Serialize};

/// Apex, bottom-right, bottom-left.
pub(crate) const TRIANGLE_ANCHORS: [(f64, f64); 3] = [(0.5, 0.0), (1.0, 1.0), (0.0, 1.0)];

/// Top, right, bottom, left.
pub(crate) const DIAMOND_ANCHORS: [(f64, f64); 4] =
    [(0.5, 0.0), (1.0, 0.5), (0.5, 1.0), (0.0, 0.5)];

/// Clockwise from the top vertex.
pub(crate) const HEXAGON_ANCHORS: [(f64, f64); 6] = [
    (0.5, 0.0),
    (1.0, 0.25),
    (1.0, 0.75),
    (0.5, 1.0),
    (0.0, 0.75),
    (0.0, 0.25),
];

/// Regular pentagon fitted to the frame, clockwise from the top vertex.
pub(crate) const PENTAGON_ANCHORS: [(f64, f64); 5] = [
    (0.5, 0.0),
    (1.0, 0.381_966_011_3),
    (0.809_016_994_4, 1.0),
    (0.190_983_005_6, 1.0),
    (0.0, 0.381_966_011_3),
];

/// Inner radius of the star relative to its outer radius.
const STAR_INNER_RATIO: f64 = 0.382;

/// An axis-aligned frame holding a box-based shape.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Frame {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a frame from two corner points, in any order.
    pub fn from_corners(p1: Point, p2: Point) -> Self {
        Self::from_rect(Rect::from_points(p1, p2))
    }

    pub fn from_rect(rect: Rect) -> Self {
        let rect = rect.abs();
        Self::new(rect.x0, rect.y0, rect.width(), rect.height())
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }

    pub fn center(&self) -> Point {
        self.at(0.5, 0.5)
    }

    /// Absolute position of a normalized anchor.
    pub fn at(&self, u: f64, v: f64) -> Point {
        Point::new(self.x + u * self.width, self.y + v * self.height)
    }

    /// Inclusive bounds check.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }

    pub fn rect_path(&self) -> BezPath {
        self.rect().to_path(0.1)
    }

    fn anchored(&self, anchors: &[(f64, f64)]) -> Vec<Point> {
        anchors.iter().map(|&(u, v)| self.at(u, v)).collect()
    }

    pub fn triangle(&self) -> Vec<Point> {
        self.anchored(&TRIANGLE_ANCHORS)
    }

    pub fn diamond(&self) -> Vec<Point> {
        self.anchored(&DIAMOND_ANCHORS)
    }

    pub fn hexagon(&self) -> Vec<Point> {
        self.anchored(&HEXAGON_ANCHORS)
    }

    pub fn pentagon(&self) -> Vec<Point> {
        self.anchored(&PENTAGON_ANCHORS)
    }

    /// Five-pointed star whose outer points coincide with the pentagon.
    pub fn star(&self) -> Vec<Point> {
        // Outer points of a unit-radius star span 2*sin(72) across and 1+cos(36) down.
        let half_span = 72f64.to_radians().sin();
        let depth = 1.0 + 36f64.to_radians().cos();
        (0..10)
            .map(|i| {
                if i % 2 == 0 {
                    let (u, v) = PENTAGON_ANCHORS[i / 2];
                    return self.at(u, v);
                }
                let angle = (-90.0 + 36.0 * i as f64).to_radians();
                let u = (STAR_INNER_RATIO * angle.cos() + half_span) / (2.0 * half_span);
                let v = (STAR_INNER_RATIO * angle.sin() + 1.0) / depth;
                self.at(u, v)
            })
            .collect()
    }

    /// Move the sides so the anchor `(u, v)` lands on `target`.
    ///
    /// The side opposite the anchor stays fixed, a centered coordinate leaves
    /// that axis alone, and neither dimension drops below `min_size`.
    pub fn resize_anchor(&self, u: f64, v: f64, target: Point, min_size: f64) -> Frame {
        let (x, width) = solve_axis(self.x, self.width, u, target.x, min_size);
        let (y, height) = solve_axis(self.y, self.height, v, target.y, min_size);
        Frame::new(x, y, width, height)
    }
}

fn solve_axis(start: f64, len: f64, t: f64, target: f64, min_size: f64) -> (f64, f64) {
    if (t - 0.5).abs() < 1e-9 {
        return (start, len);
    }
    if t > 0.5 {
        // Low side fixed.
        let len = ((target - start) / t).max(min_size);
        (start, len)
    } else {
        let end = start + len;
        let len = ((end - target) / (1.0 - t)).max(min_size);
        (end - len, len)
    }
}
