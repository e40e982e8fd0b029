//! Selection handles and handle-driven resizing.

use crate::shapes::{
    Circle, Ellipse, Frame, Geometry, Line, Shape,
    frame::{DIAMOND_ANCHORS, HEXAGON_ANCHORS, PENTAGON_ANCHORS, TRIANGLE_ANCHORS},
};
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Smallest width, height, diameter or line length a resize can produce.
pub const MIN_SIZE: f64 = 10.0;

/// Compass position of a handle on a shape's outline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandleId {
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

/// A selection handle with its position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Handle {
    pub id: HandleId,
    /// Position in surface coordinates.
    pub position: Point,
}

impl Handle {
    pub fn new(id: HandleId, position: Point) -> Self {
        Self { id, position }
    }

    /// Check if a point hits this handle.
    pub fn hit_test(&self, point: Point, radius: f64) -> bool {
        (point - self.position).hypot2() <= radius * radius
    }
}

const RECT_HANDLES: [HandleId; 4] = [HandleId::NW, HandleId::NE, HandleId::SE, HandleId::SW];
const CARDINAL_HANDLES: [HandleId; 4] = [HandleId::N, HandleId::E, HandleId::S, HandleId::W];
const TRIANGLE_HANDLES: [HandleId; 3] = [HandleId::N, HandleId::SE, HandleId::SW];
const HEXAGON_HANDLES: [HandleId; 6] = [
    HandleId::N,
    HandleId::NE,
    HandleId::SE,
    HandleId::S,
    HandleId::SW,
    HandleId::NW,
];
const PENTAGON_HANDLES: [HandleId; 5] = [
    HandleId::N,
    HandleId::NE,
    HandleId::SE,
    HandleId::SW,
    HandleId::NW,
];

/// Handle ids paired with their normalized anchor in the frame.
fn frame_anchors(geometry: &Geometry) -> Vec<(HandleId, (f64, f64))> {
    let pair = |ids: &[HandleId], anchors: &[(f64, f64)]| -> Vec<(HandleId, (f64, f64))> {
        ids.iter().copied().zip(anchors.iter().copied()).collect()
    };
    match geometry {
        Geometry::Rectangle(_) => pair(
            &RECT_HANDLES,
            &[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)],
        ),
        Geometry::Triangle(_) => pair(&TRIANGLE_HANDLES, &TRIANGLE_ANCHORS),
        Geometry::Star(_) | Geometry::Diamond(_) | Geometry::Ellipse(_) => {
            pair(&CARDINAL_HANDLES, &DIAMOND_ANCHORS)
        }
        Geometry::Hexagon(_) => pair(&HEXAGON_HANDLES, &HEXAGON_ANCHORS),
        Geometry::Pentagon(_) => pair(&PENTAGON_HANDLES, &PENTAGON_ANCHORS),
        Geometry::Line(_) | Geometry::Circle(_) => Vec::new(),
    }
}

/// Get the resize handles for a shape, placed on its visible outline.
pub fn shape_handles(shape: &Shape) -> Vec<Handle> {
    match &shape.geometry {
        Geometry::Line(line) => vec![
            Handle::new(HandleId::NW, line.start),
            Handle::new(HandleId::SE, line.end),
        ],
        Geometry::Circle(c) => CARDINAL_HANDLES
            .iter()
            .map(|&id| Handle::new(id, c.center + cardinal(id) * c.radius))
            .collect(),
        geometry => {
            let frame = Frame::from_rect(geometry.bounds());
            frame_anchors(geometry)
                .into_iter()
                .map(|(id, (u, v))| Handle::new(id, frame.at(u, v)))
                .collect()
        }
    }
}

/// Find the handle of `shape` under `point`, if any.
pub fn hit_test_handles(shape: &Shape, point: Point, radius: f64) -> Option<HandleId> {
    shape_handles(shape)
        .into_iter()
        .find(|h| h.hit_test(point, radius))
        .map(|h| h.id)
}

/// Unit vector from the center toward a cardinal handle.
fn cardinal(id: HandleId) -> Vec2 {
    match id {
        HandleId::N => Vec2::new(0.0, -1.0),
        HandleId::E => Vec2::new(1.0, 0.0),
        HandleId::S => Vec2::new(0.0, 1.0),
        HandleId::W => Vec2::new(-1.0, 0.0),
        _ => Vec2::ZERO,
    }
}

/// Resize `shape` so the point under `handle` follows `pointer`.
///
/// The opposite edge or vertex stays fixed and every resized dimension is
/// floored at [`MIN_SIZE`]. A handle the shape does not have leaves it unchanged.
pub fn resize_from_handle(shape: &Shape, handle: HandleId, pointer: Point) -> Shape {
    let mut resized = shape.clone();
    match &shape.geometry {
        Geometry::Line(line) => {
            let moved = match handle {
                HandleId::NW => Some(Line::new(drag_endpoint(line.end, line.start, pointer), line.end)),
                HandleId::SE => Some(Line::new(line.start, drag_endpoint(line.start, line.end, pointer))),
                _ => None,
            };
            if let Some(line) = moved {
                resized.geometry = Geometry::Line(line);
            }
        }
        Geometry::Circle(c) => {
            let dir = cardinal(handle);
            if dir != Vec2::ZERO {
                let fixed = c.center - dir * c.radius;
                let diameter = (pointer - fixed).dot(dir).max(MIN_SIZE);
                resized.geometry =
                    Geometry::Circle(Circle::new(fixed + dir * (diameter / 2.0), diameter / 2.0));
            }
        }
        geometry => {
            let Some(&(_, (u, v))) = frame_anchors(geometry).iter().find(|(id, _)| *id == handle)
            else {
                return resized;
            };
            let frame = Frame::from_rect(geometry.bounds()).resize_anchor(u, v, pointer, MIN_SIZE);
            resized.geometry = match geometry {
                Geometry::Ellipse(_) => Geometry::Ellipse(Ellipse::from_rect(frame.rect())),
                other => Geometry::from_frame(other.kind(), frame).unwrap_or_else(|| other.clone()),
            };
        }
    }
    resized
}

/// New position for a dragged line endpoint, at least [`MIN_SIZE`] from `fixed`.
fn drag_endpoint(fixed: Point, current: Point, pointer: Point) -> Point {
    let offset = pointer - fixed;
    let len = offset.hypot();
    if len >= MIN_SIZE {
        return pointer;
    }
    let dir = if len > f64::EPSILON {
        offset / len
    } else {
        let prev = current - fixed;
        if prev.hypot() > f64::EPSILON {
            prev / prev.hypot()
        } else {
            Vec2::new(1.0, 0.0)
        }
    };
    fixed + dir * MIN_SIZE
}
