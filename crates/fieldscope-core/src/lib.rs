//! Core abstractions for fieldscope-rs.
//!
//! This crate provides the fundamental types shared by every other fieldscope crate:
//! - [`SceneDocument`] and friends, the JSON payload describing magnet geometry
//! - [`GeometryKind`] and [`KindSet`] for selecting which primitives to decode
//! - [`ViewerOptions`], the typed view of the host model's property bag
//! - Pick input and hit types exchanged with the renderer
//! - Color helpers (hex codes, HSV, contrast)

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Options structs legitimately have many boolean flags
#![allow(clippy::struct_excessive_bools)]
// Builder patterns return Self which doesn't need must_use
#![allow(clippy::must_use_candidate)]
// Color math converts between float channels and bytes
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

pub mod camera;
pub mod color;
pub mod error;
pub mod kind;
pub mod options;
pub mod pick;
pub mod scene;

pub use camera::{Axis, CameraState};
pub use error::{FieldscopeError, Result};
pub use kind::{ActorKind, GeometryKind, KindSet};
pub use options::{ModelProperty, PickModifier, ReadoutPrecision, VectorScaling, ViewerOptions};
pub use pick::{CellPick, Modifiers, PickInput, PointPick};
pub use scene::{GeometryData, SceneDocument, SceneObject, VectorData};

// Re-export glam types for convenience
pub use glam::{Vec2, Vec3};
