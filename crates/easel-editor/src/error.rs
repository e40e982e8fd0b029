//! Editor error type.

use easel_core::StoreError;
use easel_render::RenderError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EditorError {
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Store(#[from] StoreError),
    /// The operation needs the editor to be idle.
    #[error("cannot {0} while a gesture is in progress")]
    GestureInProgress(&'static str),
    #[error("no text insertion is pending")]
    NotPendingText,
    #[error("invalid config: {0}")]
    Config(String),
    #[error("invalid script: {0}")]
    Script(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type EditorResult<T> = Result<T, EditorError>;
