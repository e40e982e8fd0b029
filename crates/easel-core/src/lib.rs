//! Easel Core Library
//!
//! Pixel-free data structures and logic for the Easel drawing surface: shape
//! records, hit-testing, selection handles, the shape store, history, tools
//! and gesture state.

pub mod geometry;
pub mod gesture;
pub mod history;
pub mod input;
pub mod selection;
pub mod shapes;
pub mod store;
pub mod tools;

pub use geometry::{point_in_shape, shape_from_drag};
pub use gesture::{Gesture, GesturePhase};
pub use history::{Checkpoint, HistoryEngine, HistoryStep};
pub use input::{KeyEvent, Modifiers, PointerEvent};
pub use selection::{Handle, HandleId, MIN_SIZE, resize_from_handle, shape_handles};
pub use shapes::{Geometry, SerializableColor, Shape, ShapeId, ShapeKind, ShapeStyle};
pub use store::{ShapePatch, ShapeStore, StoreError};
pub use tools::{
    BrushProfile, BrushProfiles, BrushStyle, MAX_BRUSH_SIZE, ToolKind, ToolSettings, clamp_brush_size,
};
