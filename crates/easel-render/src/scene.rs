//! Full-repaint shape renderer.
//!
//! Every repaint clears the visible surface, draws the persistent raster, then
//! every shape in insertion order, then the selection decoration.

use crate::surface::{CompositeMode, Surface};
use easel_core::{
    HandleId, Shape, ShapeKind, ShapeStore, ShapeStyle, shape_from_drag, shape_handles,
};
use kurbo::{Cap, Join, Point, Stroke};
use peniko::Color;

/// Decoration settings for a repaint.
#[derive(Debug, Clone)]
pub struct SceneOptions {
    /// Selection outline and handle border color.
    pub selection_color: Color,
    /// Radius of a resize handle.
    pub handle_radius: f64,
    /// Handle under the pointer, drawn enlarged.
    pub hovered_handle: Option<HandleId>,
}

impl Default for SceneOptions {
    fn default() -> Self {
        Self {
            selection_color: Color::from_rgba8(59, 130, 246, 255), // Blue
            handle_radius: 6.0,
            hovered_handle: None,
        }
    }
}

impl SceneOptions {
    pub fn with_handle_radius(mut self, radius: f64) -> Self {
        self.handle_radius = radius;
        self
    }

    pub fn with_hovered_handle(mut self, handle: Option<HandleId>) -> Self {
        self.hovered_handle = handle;
        self
    }
}

/// Redraw `visible` from scratch.
pub fn repaint<S: Surface>(visible: &mut S, raster: &S, shapes: &ShapeStore, options: &SceneOptions) {
    visible.clear(None);
    visible.draw_surface(raster);
    for shape in shapes.iter() {
        draw_shape(visible, shape);
    }
    if let Some(selected) = shapes.selected() {
        draw_selection(visible, selected, options);
    }
}

/// Raster plus shapes, without selection decoration.
pub fn flatten<S: Surface>(target: &mut S, raster: &S, shapes: &ShapeStore) {
    target.clear(None);
    target.draw_surface(raster);
    for shape in shapes.iter() {
        draw_shape(target, shape);
    }
}

fn outline_stroke(style: &ShapeStyle) -> Stroke {
    Stroke::new(style.stroke_width)
        .with_join(Join::Round)
        .with_caps(Cap::Round)
}

/// Paint one shape with its own color, opacity, fill and stroke width.
pub fn draw_shape<S: Surface>(surface: &mut S, shape: &Shape) {
    let path = shape.to_path();
    let color = shape.style.color_with_opacity();
    if shape.style.filled && shape.kind() != ShapeKind::Line {
        surface.fill_path(&path, color, CompositeMode::SourceOver);
    }
    surface.stroke_path(&path, color, &outline_stroke(&shape.style), CompositeMode::SourceOver);
}

/// Dashed outline along the shape's own path, then its resize handles.
pub fn draw_selection<S: Surface>(surface: &mut S, shape: &Shape, options: &SceneOptions) {
    let outline = Stroke::new(1.5).with_dashes(0.0, [6.0, 4.0]);
    surface.stroke_path(&shape.to_path(), options.selection_color, &outline, CompositeMode::SourceOver);

    for handle in shape_handles(shape) {
        let hovered = options.hovered_handle == Some(handle.id);
        draw_handle(surface, handle.position, options, hovered);
    }
}

fn draw_handle<S: Surface>(surface: &mut S, at: Point, options: &SceneOptions, hovered: bool) {
    let mut radius = options.handle_radius;
    if hovered {
        surface.fill_circle(
            at,
            radius * 2.2,
            options.selection_color.with_alpha(0.25),
            CompositeMode::SourceOver,
        );
        radius *= 1.4;
    }
    surface.fill_circle(at, radius, Color::WHITE, CompositeMode::SourceOver);
    let ring = kurbo::Circle::new(at, radius);
    let path = kurbo::Shape::to_path(&ring, 0.1);
    surface.stroke_path(&path, options.selection_color, &Stroke::new(2.0), CompositeMode::SourceOver);
}

/// Draw the transient preview of a shape-tool drag on the overlay.
pub fn draw_preview<S: Surface>(overlay: &mut S, kind: ShapeKind, start: Point, current: Point, style: ShapeStyle) {
    overlay.clear(None);
    draw_shape(overlay, &shape_from_drag(kind, start, current, style));
}
