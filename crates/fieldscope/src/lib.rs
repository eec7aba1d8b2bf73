//! fieldscope-rs: an interactive viewer for magnet geometry and magnetic field samples.
//!
//! A [`Viewer`] is the per-widget context. It reads the scene and its display
//! options from a [`HostModel`] property bag, decodes every scene object into
//! renderable actors, hands them to a [`RenderBackend`], and turns the backend's
//! pick hits into selections with visual feedback and a field readout.
//!
//! # Quick Start
//!
//! ```no_run
//! use fieldscope::*;
//! use pollster::FutureExt;
//! use serde_json::json;
//!
//! fn main() -> Result<()> {
//!     init_logging();
//!
//!     let host = MemoryHost::new().with_property("model_data", json!({
//!         "name": "magnet",
//!         "data": [{"polygons": {
//!             "vertices": [0, 0, 0, 1, 0, 0, 1, 1, 0],
//!             "lengths": [3],
//!             "colors": [1, 0, 0]
//!         }}]
//!     }));
//!     let mut viewer = Viewer::new(host);
//!
//!     let (signal, ready) = ready_channel();
//!     signal.ready(HeadlessBackend::new());
//!     viewer.wait_ready(ready).block_on()?;
//!
//!     viewer.handle_pick(PickInput::new(Vec2::new(10.0, 20.0), Modifiers::CONTROL))?;
//!     println!("{}", viewer.selection_text());
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - [`fieldscope_core`] - scene document, options, errors, colors
//! - [`fieldscope_render`] - buffers, color maps, the backend trait
//! - [`fieldscope_structures`] - decoding, glyph formulas, cell correlation, actors
//! - this crate - host adapter, messages, property handlers, picking, readout

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

mod host;
mod message;
mod readout;
mod ready;
mod viewer;

pub use host::{HostModel, MemoryHost};
pub use message::CustomMessage;
pub use readout::{compute_field_reading, compute_field_reading_with, round_to_places, FieldReading};
pub use ready::{ready_channel, ReadyFuture, ReadySignal};
pub use viewer::{PickOutcome, SelectedSample, SelectionState, Viewer, ViewerEvent};

// Re-export core types
pub use fieldscope_core::{
    color::Rgb8,
    error::{FieldscopeError, Result},
    Axis, CameraState, CellPick, GeometryKind, KindSet, ModelProperty, Modifiers, PickInput,
    PickModifier, PointPick, ReadoutPrecision, SceneDocument, SceneObject, Vec2, Vec3,
    VectorScaling, ViewerOptions,
};

// Re-export render types
pub use fieldscope_render::{
    ColorMap, ColorMapRegistry, GlyphAttributes, GlyphScaling, HeadlessBackend, MeshBuffers,
    RenderBackend, SubmittedGlyphs, SubmittedMesh,
};

// Re-export structures
pub use fieldscope_structures::{
    compute_vector_attributes, decode, ActorInfo, ActorRegistry, CellCorrelation, CellTarget,
};

/// Installs the `env_logger` logger, configured through `RUST_LOG`.
///
/// Safe to call more than once.
pub fn init_logging() {
    if env_logger::try_init().is_ok() {
        log::info!("fieldscope-rs logging initialized");
    }
}
