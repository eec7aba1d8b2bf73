//! The capability a renderer offers to the viewer.

use fieldscope_core::color::Rgb8;
use fieldscope_core::{CameraState, CellPick, PointPick, Vec2, VectorScaling};

use crate::buffer::{GlyphAttributes, MeshBuffers};
use crate::error::RenderResult;

/// How a glyph actor sizes its arrows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphScaling {
    pub mode: VectorScaling,
    /// Constant factor applied on top of the per-sample scale.
    pub factor: f32,
}

impl Default for GlyphScaling {
    fn default() -> Self {
        Self {
            mode: VectorScaling::Uniform,
            factor: 8.0,
        }
    }
}

/// A renderer that displays named actors and answers pick queries.
///
/// Actor names are the viewer's registry names. Backends own copies of what they
/// are handed; color changes are pushed back explicitly through the `update_*` calls.
pub trait RenderBackend {
    /// Adds a surface actor (lines and polygons with per-cell colors).
    fn add_mesh(&mut self, name: &str, buffers: &MeshBuffers) -> RenderResult<()>;

    /// Adds a glyph actor placing one arrow at each vector sample.
    fn add_glyphs(
        &mut self,
        name: &str,
        buffers: &MeshBuffers,
        glyphs: &GlyphAttributes,
    ) -> RenderResult<()>;

    /// Replaces the RGBA cell colors of a surface actor.
    fn update_cell_colors(&mut self, name: &str, colors: &[u8]) -> RenderResult<()>;

    /// Replaces the per-sample colors of a glyph actor.
    fn update_glyph_colors(&mut self, name: &str, colors: &[Rgb8]) -> RenderResult<()>;

    fn set_pickable(&mut self, name: &str, pickable: bool) -> RenderResult<()>;

    fn set_edge_visibility(&mut self, name: &str, visible: bool) -> RenderResult<()>;

    fn set_edge_color(&mut self, name: &str, color: Rgb8) -> RenderResult<()>;

    fn set_glyph_scaling(&mut self, name: &str, scaling: GlyphScaling) -> RenderResult<()>;

    /// Removes every actor.
    fn clear(&mut self);

    /// Cell-picks the pickable actors at a view position.
    fn pick_cell(&mut self, position: Vec2) -> Option<CellPick>;

    /// Point-picks the pickable actors at a view position.
    fn pick_point(&mut self, position: Vec2) -> Option<PointPick>;

    fn set_camera(&mut self, camera: &CameraState);

    fn camera(&self) -> CameraState;

    fn set_background(&mut self, color: Rgb8);

    /// Shows or hides the orientation marker.
    fn set_marker_visible(&mut self, visible: bool);

    /// Schedules a redraw.
    fn request_render(&mut self);
}
