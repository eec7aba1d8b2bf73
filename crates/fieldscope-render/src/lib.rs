//! Render-side types for fieldscope-rs.
//!
//! This crate sits between the decoded scene and whatever draws it:
//! - [`MeshBuffers`], the flat vertex/connectivity/color buffers the renderer consumes
//! - [`GlyphAttributes`], per-sample orientation, scale and color for vector glyphs
//! - Color maps and the built-in palette registry
//! - The [`RenderBackend`] capability trait, plus a recording [`HeadlessBackend`]

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
// Buffer math narrows between usize, u32 and f32 constantly
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]

pub mod backend;
pub mod buffer;
pub mod color_maps;
pub mod error;
pub mod headless;
mod palettes;

pub use backend::{GlyphScaling, RenderBackend};
pub use buffer::{GlyphAttributes, KindLayout, MeshBuffers};
pub use color_maps::{ColorMap, ColorMapRegistry, DEFAULT_NUM_COLORS};
pub use error::{RenderError, RenderResult};
pub use headless::{HeadlessBackend, SubmittedGlyphs, SubmittedMesh};
