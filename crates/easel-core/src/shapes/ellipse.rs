//! Circle and ellipse shapes.

use kurbo::{BezPath, Ellipse as KurboEllipse, Point, Rect, Shape as KurboShape};
use serde::{Deserialize, Serialize};

/// A circle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    /// Center point.
    pub center: Point,
    pub radius: f64,
}

impl Circle {
    pub fn new(center: Point, radius: f64) -> Self {
        Self { center, radius }
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(
            self.center.x - self.radius,
            self.center.y - self.radius,
            self.center.x + self.radius,
            self.center.y + self.radius,
        )
    }

    pub fn contains(&self, point: Point) -> bool {
        (point - self.center).hypot() <= self.radius
    }

    pub fn to_path(&self) -> BezPath {
        kurbo::Circle::new(self.center, self.radius).to_path(0.1)
    }
}

/// An axis-aligned ellipse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ellipse {
    /// Center point.
    pub center: Point,
    /// Horizontal radius.
    pub radius_x: f64,
    /// Vertical radius.
    pub radius_y: f64,
}

impl Ellipse {
    /// Create a new ellipse.
    pub fn new(center: Point, radius_x: f64, radius_y: f64) -> Self {
        Self {
            center,
            radius_x,
            radius_y,
        }
    }

    /// Create an ellipse from a bounding rectangle.
    pub fn from_rect(rect: Rect) -> Self {
        Self::new(rect.center(), rect.width() / 2.0, rect.height() / 2.0)
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(
            self.center.x - self.radius_x,
            self.center.y - self.radius_y,
            self.center.x + self.radius_x,
            self.center.y + self.radius_y,
        )
    }

    pub fn contains(&self, point: Point) -> bool {
        ellipse_contains(self.center, self.radius_x, self.radius_y, point)
    }

    pub fn to_path(&self) -> BezPath {
        KurboEllipse::new(self.center, (self.radius_x, self.radius_y), 0.0).to_path(0.1)
    }
}

/// Normalized ellipse equation; a degenerate axis only contains its own line.
pub(crate) fn ellipse_contains(center: Point, rx: f64, ry: f64, point: Point) -> bool {
    let dx = point.x - center.x;
    let dy = point.y - center.y;
    if rx < f64::EPSILON || ry < f64::EPSILON {
        return dx.abs() <= rx && dy.abs() <= ry;
    }
    (dx / rx).powi(2) + (dy / ry).powi(2) <= 1.0
}
