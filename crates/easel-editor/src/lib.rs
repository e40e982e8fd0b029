//! Easel Editor Library
//!
//! The editor session ties the core model and the renderer together: pointer
//! and key handling, the gesture state machine, two-stack undo/redo, initial
//! image loading and artwork export.

mod artwork;
pub mod config;
mod editor;
mod error;
pub mod script;
pub mod shortcuts;

pub use artwork::Artwork;
pub use config::EditorConfig;
pub use editor::Editor;
pub use error::{EditorError, EditorResult};
pub use shortcuts::{EditorAction, Shortcut, ShortcutRegistry};
