//! Transient state of the pointer gesture in progress.

use crate::selection::HandleId;
use crate::shapes::{Shape, ShapeId, ShapeKind};
use kurbo::{Point, Vec2};
use serde::Serialize;

/// Coarse phase of the interaction, for logging and export checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GesturePhase {
    Idle,
    DrawingStroke,
    DrawingShapePreview,
    DraggingShape,
    ResizingShape,
    TextPending,
}

/// The in-progress gesture. Cleared back to `Idle` when it completes.
#[derive(Debug, Clone, Default)]
pub enum Gesture {
    #[default]
    Idle,
    /// Brush or eraser held down.
    DrawingStroke {
        /// Previous pointer sample; the next segment starts here.
        last: Point,
        /// Whether any segment has been painted yet.
        painted: bool,
    },
    /// Shape tool drag with an overlay preview.
    DrawingShapePreview {
        kind: ShapeKind,
        start: Point,
        current: Point,
    },
    /// Moving the selected shape.
    DraggingShape {
        id: ShapeId,
        /// Pointer minus the shape's bounds origin at grab time.
        offset: Vec2,
        /// Shape list before the drag began.
        before: Vec<Shape>,
        moved: bool,
    },
    /// Dragging a resize handle of the selected shape.
    ResizingShape {
        id: ShapeId,
        handle: HandleId,
        /// The shape as it was when the resize began.
        original: Shape,
        before: Vec<Shape>,
        moved: bool,
    },
    /// Waiting for text to be submitted or cancelled.
    TextPending { at: Point },
}

impl Gesture {
    pub fn phase(&self) -> GesturePhase {
        match self {
            Gesture::Idle => GesturePhase::Idle,
            Gesture::DrawingStroke { .. } => GesturePhase::DrawingStroke,
            Gesture::DrawingShapePreview { .. } => GesturePhase::DrawingShapePreview,
            Gesture::DraggingShape { .. } => GesturePhase::DraggingShape,
            Gesture::ResizingShape { .. } => GesturePhase::ResizingShape,
            Gesture::TextPending { .. } => GesturePhase::TextPending,
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Gesture::Idle)
    }
}
