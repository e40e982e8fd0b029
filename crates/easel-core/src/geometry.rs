//! Hit-testing and shape construction from pointer drags.

use crate::shapes::{
    Circle, Ellipse, Frame, Geometry, Line, Shape, ShapeKind, ShapeStyle, point_to_segment_dist,
};
use kurbo::Point;

/// How close (in surface units) a point must be to count as touching a line.
pub const LINE_HIT_TOLERANCE: f64 = 5.0;

/// Whether `point` lies inside `shape`.
///
/// Rectangles, circles, ellipses, lines, triangles and diamonds are exact.
/// Stars, hexagons and pentagons are approximated by the ellipse inscribed in
/// their frame, which is cheap and close enough for picking.
pub fn point_in_shape(point: Point, shape: &Shape) -> bool {
    match &shape.geometry {
        Geometry::Line(line) => line.distance_to(point) <= LINE_HIT_TOLERANCE,
        Geometry::Rectangle(frame) => frame.contains(point),
        Geometry::Circle(circle) => circle.contains(point),
        Geometry::Ellipse(ellipse) => ellipse.contains(point),
        Geometry::Triangle(frame) => {
            let v = frame.triangle();
            triangle_contains(point, v[0], v[1], v[2])
        }
        Geometry::Diamond(frame) => diamond_contains(frame, point),
        Geometry::Star(frame) | Geometry::Hexagon(frame) | Geometry::Pentagon(frame) => {
            Ellipse::from_rect(frame.rect()).contains(point)
        }
    }
}

/// Barycentric point-in-triangle test.
pub fn triangle_contains(p: Point, a: Point, b: Point, c: Point) -> bool {
    let v0 = c - a;
    let v1 = b - a;
    let v2 = p - a;
    let d00 = v0.dot(v0);
    let d01 = v0.dot(v1);
    let d02 = v0.dot(v2);
    let d11 = v1.dot(v1);
    let d12 = v1.dot(v2);
    let denom = d00 * d11 - d01 * d01;
    if denom.abs() < f64::EPSILON {
        // Collapsed to a segment or a point.
        return [(a, b), (b, c), (c, a)]
            .iter()
            .any(|&(s, e)| point_to_segment_dist(p, s, e) < 1e-9);
    }
    let u = (d11 * d02 - d01 * d12) / denom;
    let v = (d00 * d12 - d01 * d02) / denom;
    u >= 0.0 && v >= 0.0 && u + v <= 1.0
}

fn diamond_contains(frame: &Frame, point: Point) -> bool {
    let center = frame.center();
    let hw = frame.width / 2.0;
    let hh = frame.height / 2.0;
    let dx = (point.x - center.x).abs();
    let dy = (point.y - center.y).abs();
    if hw < f64::EPSILON || hh < f64::EPSILON {
        return dx <= hw && dy <= hh;
    }
    dx / hw + dy / hh <= 1.0
}

/// Build the shape a shape tool produces for a drag from `start` to `end`.
///
/// Box-based shapes and ellipses take the drag rectangle in any direction,
/// circles are centered on `start` with the drag distance as radius, lines keep
/// the raw endpoints. Zero-area results are valid.
pub fn shape_from_drag(kind: ShapeKind, start: Point, end: Point, style: ShapeStyle) -> Shape {
    let geometry = match kind {
        ShapeKind::Line => Geometry::Line(Line::new(start, end)),
        ShapeKind::Circle => Geometry::Circle(Circle::new(start, (end - start).hypot())),
        ShapeKind::Ellipse => {
            Geometry::Ellipse(Ellipse::from_rect(kurbo::Rect::from_points(start, end)))
        }
        ShapeKind::Rectangle => Geometry::Rectangle(Frame::from_corners(start, end)),
        ShapeKind::Triangle => Geometry::Triangle(Frame::from_corners(start, end)),
        ShapeKind::Star => Geometry::Star(Frame::from_corners(start, end)),
        ShapeKind::Diamond => Geometry::Diamond(Frame::from_corners(start, end)),
        ShapeKind::Hexagon => Geometry::Hexagon(Frame::from_corners(start, end)),
        ShapeKind::Pentagon => Geometry::Pentagon(Frame::from_corners(start, end)),
    };
    Shape::new(geometry, style)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shape(geometry: Geometry) -> Shape {
        Shape::new(geometry, ShapeStyle::default())
    }

    #[test]
    fn test_rectangle_hit() {
        let rect = shape(Geometry::Rectangle(Frame::new(10.0, 10.0, 50.0, 30.0)));
        assert!(point_in_shape(Point::new(35.0, 25.0), &rect));
        assert!(!point_in_shape(Point::new(5.0, 5.0), &rect));
        // Edges are inclusive.
        assert!(point_in_shape(Point::new(60.0, 40.0), &rect));
    }

    #[test]
    fn test_line_hit_tolerance() {
        let line = shape(Geometry::Line(Line::new(
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
        )));
        assert!(point_in_shape(Point::new(50.0, 5.0), &line));
        assert!(!point_in_shape(Point::new(50.0, 5.5), &line));
        assert!(point_in_shape(Point::new(103.0, 4.0), &line));
        assert!(!point_in_shape(Point::new(110.0, 0.0), &line));
    }

    #[test]
    fn test_circle_hit() {
        let circle = shape(Geometry::Circle(Circle::new(Point::new(0.0, 0.0), 10.0)));
        assert!(point_in_shape(Point::new(6.0, 8.0), &circle));
        assert!(!point_in_shape(Point::new(8.0, 8.0), &circle));
    }

    #[test]
    fn test_triangle_hit_is_exact() {
        let tri = shape(Geometry::Triangle(Frame::new(0.0, 0.0, 100.0, 100.0)));
        assert!(point_in_shape(Point::new(50.0, 50.0), &tri));
        // Inside the frame but outside the slanted edge.
        assert!(!point_in_shape(Point::new(5.0, 5.0), &tri));
        assert!(!point_in_shape(Point::new(95.0, 20.0), &tri));
        assert!(point_in_shape(Point::new(5.0, 99.0), &tri));
    }

    #[test]
    fn test_diamond_hit() {
        let diamond = shape(Geometry::Diamond(Frame::new(0.0, 0.0, 100.0, 50.0)));
        assert!(point_in_shape(Point::new(50.0, 25.0), &diamond));
        assert!(point_in_shape(Point::new(75.0, 12.5), &diamond));
        assert!(!point_in_shape(Point::new(10.0, 5.0), &diamond));
    }

    #[test]
    fn test_polygon_kinds_use_bounding_ellipse() {
        for geometry in [
            Geometry::Star(Frame::new(0.0, 0.0, 100.0, 100.0)),
            Geometry::Hexagon(Frame::new(0.0, 0.0, 100.0, 100.0)),
            Geometry::Pentagon(Frame::new(0.0, 0.0, 100.0, 100.0)),
        ] {
            let s = shape(geometry);
            assert!(point_in_shape(Point::new(50.0, 50.0), &s));
            assert!(point_in_shape(Point::new(50.0, 1.0), &s));
            assert!(!point_in_shape(Point::new(2.0, 2.0), &s));
        }
    }

    #[test]
    fn test_shape_from_drag_normalizes() {
        let rect = shape_from_drag(
            ShapeKind::Rectangle,
            Point::new(60.0, 40.0),
            Point::new(10.0, 10.0),
            ShapeStyle::default(),
        );
        let bounds = rect.bounds();
        assert!((bounds.x0 - 10.0).abs() < f64::EPSILON);
        assert!((bounds.width() - 50.0).abs() < f64::EPSILON);
        assert!((bounds.height() - 30.0).abs() < f64::EPSILON);

        let circle = shape_from_drag(
            ShapeKind::Circle,
            Point::new(0.0, 0.0),
            Point::new(3.0, 4.0),
            ShapeStyle::default(),
        );
        match circle.geometry {
            Geometry::Circle(c) => assert!((c.radius - 5.0).abs() < f64::EPSILON),
            other => panic!("expected circle, got {other:?}"),
        }

        let line = shape_from_drag(
            ShapeKind::Line,
            Point::new(9.0, 9.0),
            Point::new(1.0, 1.0),
            ShapeStyle::default(),
        );
        match line.geometry {
            Geometry::Line(l) => {
                assert_eq!(l.start, Point::new(9.0, 9.0));
                assert_eq!(l.end, Point::new(1.0, 1.0));
            }
            other => panic!("expected line, got {other:?}"),
        }
    }

    #[test]
    fn test_zero_area_shape_is_valid() {
        let s = shape_from_drag(
            ShapeKind::Hexagon,
            Point::new(5.0, 5.0),
            Point::new(5.0, 5.0),
            ShapeStyle::default(),
        );
        assert!(s.bounds().area().abs() < f64::EPSILON);
        assert!(point_in_shape(Point::new(5.0, 5.0), &s));
    }
}
