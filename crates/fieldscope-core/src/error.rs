//! Error types for fieldscope-rs.

use thiserror::Error;

use crate::kind::GeometryKind;

/// The main error type for fieldscope-rs operations.
#[derive(Error, Debug)]
pub enum FieldscopeError {
    /// Vertex, length or color arrays of a geometry group disagree.
    #[error("malformed {kind} geometry: {reason}")]
    MalformedGeometry { kind: GeometryKind, reason: String },

    /// A color map with the given name is not registered.
    #[error("unknown color map '{0}'")]
    UnknownColorMap(String),

    /// A registry or scene operation ran before the renderer reported ready.
    #[error("no renderer - wait for the render view to become ready first")]
    NoRenderer,

    /// An actor was registered without any backing geometry.
    #[error("actor '{0}' has no mapper or data")]
    ActorWithoutMapper(String),

    /// An actor with the given name already exists.
    #[error("actor '{0}' already exists")]
    ActorExists(String),

    /// An actor with the given name was not found.
    #[error("actor '{0}' not found")]
    ActorNotFound(String),

    /// A vector actor has no glyph at the given sample index.
    #[error("actor '{actor}' has no glyph {index}")]
    GlyphNotFound { actor: String, index: usize },

    /// A glyph operation named an actor without vector samples.
    #[error("actor '{0}' carries no vector data")]
    NoVectorData(String),

    /// A custom message carried a `type` outside the recognized set.
    #[error("{0}: unknown message type")]
    UnknownMessageType(String),

    /// A custom message of a known type had an unusable payload.
    #[error("invalid message: {0}")]
    InvalidMessage(String),

    /// A model property held a value of the wrong shape.
    #[error("invalid value for property '{name}': {reason}")]
    InvalidProperty { name: String, reason: String },

    /// Rounding was requested with a negative number of decimal places.
    #[error("invalid precision {0}: decimal places must be non-negative")]
    InvalidPrecision(i32),

    /// A color string could not be parsed.
    #[error("invalid color '{0}'")]
    InvalidColor(String),

    /// Rendering error.
    #[error("render error: {0}")]
    RenderError(String),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl FieldscopeError {
    /// Shorthand for [`FieldscopeError::MalformedGeometry`].
    pub fn malformed(kind: GeometryKind, reason: impl Into<String>) -> Self {
        Self::MalformedGeometry {
            kind,
            reason: reason.into(),
        }
    }
}

/// A specialized Result type for fieldscope-rs operations.
pub type Result<T> = std::result::Result<T, FieldscopeError>;
