//! Structure implementations for fieldscope-rs.
//!
//! This crate turns scene documents into renderable actors:
//! - [`decode`] flattens one scene object into [`MeshBuffers`](fieldscope_render::MeshBuffers)
//! - [`compute_vector_attributes`] derives glyph orientation, scale and color
//! - [`CellCorrelation`] maps edge cells onto the face cells they outline
//! - [`ActorRegistry`] owns every actor and centralizes color mutation

// Graphics code intentionally uses casts for indices, colors, and coordinates
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]

pub mod actor;
pub mod correlation;
pub mod decode;
pub mod vector_field;

pub use actor::{ActorInfo, ActorRegistry, CellTarget, VectorActorData};
pub use correlation::CellCorrelation;
pub use decode::decode;
pub use vector_field::compute_vector_attributes;
