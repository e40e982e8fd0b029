//! Ordered shape collection with single selection.

use crate::geometry::point_in_shape;
use crate::shapes::{Geometry, Shape, ShapeId, ShapeStyle};
use kurbo::Point;
use std::collections::HashMap;
use thiserror::Error;

/// Errors from shape store operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("no shape with id {0}")]
    UnknownShape(ShapeId),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// A partial update applied by [`ShapeStore::update_shape`].
#[derive(Debug, Clone, Default)]
pub struct ShapePatch {
    pub geometry: Option<Geometry>,
    pub style: Option<ShapeStyle>,
}

impl ShapePatch {
    pub fn geometry(geometry: Geometry) -> Self {
        Self {
            geometry: Some(geometry),
            style: None,
        }
    }

    pub fn style(style: ShapeStyle) -> Self {
        Self {
            geometry: None,
            style: Some(style),
        }
    }
}

/// All live shapes, drawn back to front in insertion order.
#[derive(Debug, Clone, Default)]
pub struct ShapeStore {
    shapes: HashMap<ShapeId, Shape>,
    /// Insertion (and paint) order, back to front.
    z_order: Vec<ShapeId>,
    selected: Option<ShapeId>,
}

impl ShapeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a shape on top of all others.
    pub fn add_shape(&mut self, mut shape: Shape) -> ShapeId {
        let id = shape.id();
        shape.selected = self.selected == Some(id);
        if self.shapes.insert(id, shape).is_none() {
            self.z_order.push(id);
        }
        id
    }

    pub fn update_shape(&mut self, id: ShapeId, patch: ShapePatch) -> StoreResult<()> {
        let shape = self.shapes.get_mut(&id).ok_or(StoreError::UnknownShape(id))?;
        if let Some(geometry) = patch.geometry {
            shape.geometry = geometry;
        }
        if let Some(style) = patch.style {
            shape.style = style;
        }
        Ok(())
    }

    /// Remove a shape, clearing the selection if it pointed at it.
    pub fn delete_shape(&mut self, id: ShapeId) -> StoreResult<Shape> {
        let shape = self.shapes.remove(&id).ok_or(StoreError::UnknownShape(id))?;
        self.z_order.retain(|&shape_id| shape_id != id);
        if self.selected == Some(id) {
            self.selected = None;
        }
        Ok(shape)
    }

    /// Select exactly one shape, or none.
    ///
    /// Unknown ids clear the selection.
    pub fn set_selected(&mut self, id: Option<ShapeId>) {
        let id = id.filter(|id| self.shapes.contains_key(id));
        self.selected = id;
        for shape in self.shapes.values_mut() {
            shape.selected = Some(shape.id()) == id;
        }
    }

    pub fn selected_id(&self) -> Option<ShapeId> {
        self.selected
    }

    pub fn selected(&self) -> Option<&Shape> {
        self.selected.and_then(|id| self.shapes.get(&id))
    }

    pub fn get(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.get(&id)
    }

    pub fn contains(&self, id: ShapeId) -> bool {
        self.shapes.contains_key(&id)
    }

    /// Shapes back to front.
    pub fn iter(&self) -> impl Iterator<Item = &Shape> {
        self.z_order.iter().filter_map(|id| self.shapes.get(id))
    }

    pub fn len(&self) -> usize {
        self.z_order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.z_order.is_empty()
    }

    /// The topmost shape containing `point`.
    pub fn topmost_at(&self, point: Point) -> Option<ShapeId> {
        self.z_order
            .iter()
            .rev()
            .find(|id| self.shapes.get(id).is_some_and(|s| point_in_shape(point, s)))
            .copied()
    }

    /// Copy of all shapes in paint order.
    pub fn snapshot(&self) -> Vec<Shape> {
        self.iter().cloned().collect()
    }

    /// Replace every shape with `shapes`.
    ///
    /// The selection survives only if its shape is still present.
    pub fn restore(&mut self, shapes: Vec<Shape>) {
        let selected = self.selected;
        self.shapes.clear();
        self.z_order.clear();
        for shape in shapes {
            self.add_shape(shape);
        }
        self.set_selected(selected);
    }
}
