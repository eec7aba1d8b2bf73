//! A backend that draws nothing and records everything.
//!
//! Used by tests and the demo to observe what the viewer submits, and to script
//! the answers of pick queries.

use std::collections::{HashMap, HashSet};

use fieldscope_core::color::Rgb8;
use fieldscope_core::{CameraState, CellPick, PointPick, Vec2};

use crate::backend::{GlyphScaling, RenderBackend};
use crate::buffer::{GlyphAttributes, MeshBuffers};
use crate::error::{RenderError, RenderResult};

/// A surface actor as the backend last saw it.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmittedMesh {
    pub buffers: MeshBuffers,
    pub pickable: bool,
    pub edges_visible: bool,
    pub edge_color: Rgb8,
}

/// A glyph actor as the backend last saw it.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmittedGlyphs {
    pub buffers: MeshBuffers,
    pub glyphs: GlyphAttributes,
    pub pickable: bool,
    pub scaling: GlyphScaling,
}

/// Recording backend with scripted picks.
#[derive(Debug, Clone)]
pub struct HeadlessBackend {
    meshes: HashMap<String, SubmittedMesh>,
    glyphs: HashMap<String, SubmittedGlyphs>,
    order: Vec<String>,
    camera: CameraState,
    background: Rgb8,
    marker_visible: bool,
    cell_pick: Option<CellPick>,
    point_pick: Option<PointPick>,
    rejected: HashSet<String>,
    clear_count: usize,
    render_count: usize,
}

impl Default for HeadlessBackend {
    fn default() -> Self {
        Self {
            meshes: HashMap::new(),
            glyphs: HashMap::new(),
            order: Vec::new(),
            camera: CameraState::default(),
            background: [255, 255, 255],
            marker_visible: true,
            cell_pick: None,
            point_pick: None,
            rejected: HashSet::new(),
            clear_count: 0,
            render_count: 0,
        }
    }
}

impl HeadlessBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets what the next pick queries answer. Results persist until changed.
    pub fn script_pick(&mut self, cell: Option<CellPick>, point: Option<PointPick>) {
        self.cell_pick = cell;
        self.point_pick = point;
    }

    /// Makes every later submission of `name` fail to upload.
    pub fn reject_uploads(&mut self, name: impl Into<String>) {
        self.rejected.insert(name.into());
    }

    pub fn mesh(&self, name: &str) -> Option<&SubmittedMesh> {
        self.meshes.get(name)
    }

    pub fn glyphs(&self, name: &str) -> Option<&SubmittedGlyphs> {
        self.glyphs.get(name)
    }

    /// Actor names in submission order.
    pub fn actor_names(&self) -> &[String] {
        &self.order
    }

    pub fn background(&self) -> Rgb8 {
        self.background
    }

    pub fn marker_visible(&self) -> bool {
        self.marker_visible
    }

    pub fn clear_count(&self) -> usize {
        self.clear_count
    }

    pub fn render_count(&self) -> usize {
        self.render_count
    }

    fn mesh_mut(&mut self, name: &str) -> RenderResult<&mut SubmittedMesh> {
        self.meshes
            .get_mut(name)
            .ok_or_else(|| RenderError::UnknownActor(name.to_string()))
    }

    fn glyphs_mut(&mut self, name: &str) -> RenderResult<&mut SubmittedGlyphs> {
        self.glyphs
            .get_mut(name)
            .ok_or_else(|| RenderError::UnknownActor(name.to_string()))
    }

    fn check_upload(&self, name: &str) -> RenderResult<()> {
        if self.rejected.contains(name) {
            return Err(RenderError::BufferUploadFailed(format!(
                "'{name}' was rejected"
            )));
        }
        Ok(())
    }

    fn is_pickable(&self, name: &str) -> bool {
        self.meshes.get(name).is_some_and(|m| m.pickable)
            || self.glyphs.get(name).is_some_and(|g| g.pickable)
    }

    fn pickable_only(&self, actors: &[String]) -> Vec<String> {
        actors
            .iter()
            .filter(|a| self.is_pickable(a))
            .cloned()
            .collect()
    }
}

impl RenderBackend for HeadlessBackend {
    fn add_mesh(&mut self, name: &str, buffers: &MeshBuffers) -> RenderResult<()> {
        self.check_upload(name)?;
        let expected = 4 * buffers.num_colored_cells();
        if buffers.cell_colors.len() != expected {
            return Err(RenderError::ColorSizeMismatch {
                got: buffers.cell_colors.len(),
                expected,
            });
        }
        self.meshes.insert(
            name.to_string(),
            SubmittedMesh {
                buffers: buffers.clone(),
                pickable: false,
                edges_visible: true,
                edge_color: [0, 0, 0],
            },
        );
        self.order.push(name.to_string());
        Ok(())
    }

    fn add_glyphs(
        &mut self,
        name: &str,
        buffers: &MeshBuffers,
        glyphs: &GlyphAttributes,
    ) -> RenderResult<()> {
        self.check_upload(name)?;
        self.glyphs.insert(
            name.to_string(),
            SubmittedGlyphs {
                buffers: buffers.clone(),
                glyphs: glyphs.clone(),
                pickable: false,
                scaling: GlyphScaling::default(),
            },
        );
        self.order.push(name.to_string());
        Ok(())
    }

    fn update_cell_colors(&mut self, name: &str, colors: &[u8]) -> RenderResult<()> {
        let mesh = self.mesh_mut(name)?;
        if colors.len() != mesh.buffers.cell_colors.len() {
            return Err(RenderError::ColorSizeMismatch {
                got: colors.len(),
                expected: mesh.buffers.cell_colors.len(),
            });
        }
        mesh.buffers.cell_colors.copy_from_slice(colors);
        Ok(())
    }

    fn update_glyph_colors(&mut self, name: &str, colors: &[Rgb8]) -> RenderResult<()> {
        let entry = self.glyphs_mut(name)?;
        entry.glyphs.colors = colors.to_vec();
        Ok(())
    }

    fn set_pickable(&mut self, name: &str, pickable: bool) -> RenderResult<()> {
        if let Some(mesh) = self.meshes.get_mut(name) {
            mesh.pickable = pickable;
            return Ok(());
        }
        self.glyphs_mut(name)?.pickable = pickable;
        Ok(())
    }

    fn set_edge_visibility(&mut self, name: &str, visible: bool) -> RenderResult<()> {
        self.mesh_mut(name)?.edges_visible = visible;
        Ok(())
    }

    fn set_edge_color(&mut self, name: &str, color: Rgb8) -> RenderResult<()> {
        self.mesh_mut(name)?.edge_color = color;
        Ok(())
    }

    fn set_glyph_scaling(&mut self, name: &str, scaling: GlyphScaling) -> RenderResult<()> {
        self.glyphs_mut(name)?.scaling = scaling;
        Ok(())
    }

    fn clear(&mut self) {
        self.meshes.clear();
        self.glyphs.clear();
        self.order.clear();
        self.clear_count += 1;
    }

    fn pick_cell(&mut self, _position: Vec2) -> Option<CellPick> {
        let pick = self.cell_pick.clone()?;
        let actors = self.pickable_only(&pick.actors);
        (!actors.is_empty()).then_some(CellPick { actors, ..pick })
    }

    fn pick_point(&mut self, _position: Vec2) -> Option<PointPick> {
        let pick = self.point_pick.clone()?;
        let actors = self.pickable_only(&pick.actors);
        (!actors.is_empty()).then_some(PointPick { actors, ..pick })
    }

    fn set_camera(&mut self, camera: &CameraState) {
        self.camera = *camera;
    }

    fn camera(&self) -> CameraState {
        self.camera
    }

    fn set_background(&mut self, color: Rgb8) {
        self.background = color;
    }

    fn set_marker_visible(&mut self, visible: bool) {
        self.marker_visible = visible;
    }

    fn request_render(&mut self) {
        self.render_count += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::KindLayout;

    fn one_polygon() -> MeshBuffers {
        MeshBuffers {
            positions: vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 0.0],
            polygons: vec![3, 0, 1, 2],
            cell_colors: vec![255, 0, 0, 255],
            polygon_layout: KindLayout {
                cell_count: 1,
                vertex_offset: 0,
                vertex_count: 3,
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_records_meshes() {
        let mut backend = HeadlessBackend::new();
        backend.add_mesh("geomSurface_0", &one_polygon()).unwrap();
        backend.set_edge_color("geomSurface_0", [1, 2, 3]).unwrap();
        let mesh = backend.mesh("geomSurface_0").unwrap();
        assert_eq!(mesh.edge_color, [1, 2, 3]);
        assert_eq!(backend.actor_names(), ["geomSurface_0"]);

        backend.clear();
        assert!(backend.mesh("geomSurface_0").is_none());
        assert_eq!(backend.clear_count(), 1);
    }

    #[test]
    fn test_rejects_bad_color_sizes() {
        let mut backend = HeadlessBackend::new();
        let mut buffers = one_polygon();
        buffers.cell_colors.push(0);
        assert!(backend.add_mesh("m", &buffers).is_err());

        backend.add_mesh("m", &one_polygon()).unwrap();
        assert!(backend.update_cell_colors("m", &[0; 8]).is_err());
        assert!(backend.update_cell_colors("missing", &[0; 4]).is_err());
    }

    #[test]
    fn test_rejected_uploads() {
        let mut backend = HeadlessBackend::new();
        backend.reject_uploads("m");
        assert!(matches!(
            backend.add_mesh("m", &one_polygon()),
            Err(RenderError::BufferUploadFailed(_))
        ));
        assert!(backend
            .add_glyphs("m", &one_polygon(), &GlyphAttributes::default())
            .is_err());
        assert!(backend.actor_names().is_empty());
        backend.add_mesh("n", &one_polygon()).unwrap();
    }

    #[test]
    fn test_picks_filter_unpickable() {
        let mut backend = HeadlessBackend::new();
        backend.add_mesh("m", &one_polygon()).unwrap();
        backend.script_pick(
            Some(CellPick {
                actors: vec!["m".into()],
                cell_id: 0,
            }),
            None,
        );
        assert!(backend.pick_cell(Vec2::ZERO).is_none());

        backend.set_pickable("m", true).unwrap();
        let pick = backend.pick_cell(Vec2::ZERO).unwrap();
        assert_eq!(pick.actors, vec!["m".to_string()]);
        assert!(backend.pick_point(Vec2::ZERO).is_none());
    }
}
