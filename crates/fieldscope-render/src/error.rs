//! Rendering error types.

use fieldscope_core::FieldscopeError;
use thiserror::Error;

/// Errors that can occur in a render backend.
#[derive(Error, Debug)]
pub enum RenderError {
    /// An actor name was used that the backend never received.
    #[error("backend has no actor named '{0}'")]
    UnknownActor(String),

    /// Submitted buffers could not be uploaded.
    #[error("buffer upload failed: {0}")]
    BufferUploadFailed(String),

    /// Per-cell colors do not match the actor's cell count.
    #[error("color buffer holds {got} bytes, expected {expected}")]
    ColorSizeMismatch { got: usize, expected: usize },
}

/// A specialized Result type for rendering operations.
pub type RenderResult<T> = std::result::Result<T, RenderError>;

impl From<RenderError> for FieldscopeError {
    fn from(err: RenderError) -> Self {
        FieldscopeError::RenderError(err.to_string())
    }
}
