//! Reactions to host property changes.

use fieldscope_core::color::hex_to_rgb8;
use fieldscope_core::{ActorKind, ModelProperty, Result};
use fieldscope_render::{GlyphScaling, RenderBackend};
use fieldscope_structures::{compute_vector_attributes, CellTarget};
use log::debug;
use serde_json::Value;

use super::Viewer;
use crate::host::HostModel;

impl<H: HostModel, B: RenderBackend> Viewer<H, B> {
    /// Re-reads the property `name` from the host and applies it.
    ///
    /// Unrecognized names are ignored. Before the backend is ready the value is
    /// only stored; it takes effect when the scene is first built.
    pub fn on_property_change(&mut self, name: &str) -> Result<()> {
        let Ok(property) = name.parse::<ModelProperty>() else {
            debug!("ignoring change of unrecognized property '{name}'");
            return Ok(());
        };
        let value = self.host.get_property(name).unwrap_or(Value::Null);
        self.options.apply(property, &value)?;
        if !self.is_ready() {
            return Ok(());
        }

        match property {
            ModelProperty::ModelData | ModelProperty::Title => self.refresh(),
            ModelProperty::BgColor => self.apply_background(),
            ModelProperty::SelectedObjColor => self.apply_selected_color(),
            ModelProperty::ShowEdges => self.apply_edge_visibility(),
            ModelProperty::ShowMarker => {
                let show = self.options.show_marker;
                let backend = self.renderer()?;
                backend.set_marker_visible(show);
                backend.request_render();
                Ok(())
            }
            ModelProperty::PolyAlpha => self.apply_poly_alpha(),
            ModelProperty::FieldColorMapName | ModelProperty::VectorColorMapName => {
                self.apply_glyph_colors()
            }
            ModelProperty::VectorScaling => self.apply_vector_scaling(),
            ModelProperty::CamState => {
                let Some(camera) = self.options.cam_state else {
                    return Ok(());
                };
                let backend = self.renderer()?;
                backend.set_camera(&camera);
                backend.request_render();
                Ok(())
            }
        }
    }

    fn apply_background(&mut self) -> Result<()> {
        let color = hex_to_rgb8(&self.options.bg_color)?;
        let backend = self.renderer()?;
        backend.set_background(color);
        backend.request_render();
        Ok(())
    }

    /// Paints the faces of the selected group with `selected_obj_color`.
    fn apply_selected_color(&mut self) -> Result<()> {
        let Some(group) = self.selection.group.clone() else {
            return Ok(());
        };
        let color = hex_to_rgb8(&self.options.selected_obj_color)?;
        let names: Vec<String> = self
            .registry
            .group_members(&group)
            .filter(|a| a.kind() == ActorKind::Surface)
            .map(|a| a.name().to_string())
            .collect();
        for name in names {
            self.registry
                .mutate_color(&name, CellTarget::Polygons, Some(color), None)?;
        }
        self.flush()
    }

    fn apply_edge_visibility(&mut self) -> Result<()> {
        let show = self.options.show_edges;
        for name in self.actor_names(ActorKind::Surface) {
            self.renderer()?.set_edge_visibility(&name, show)?;
            self.registry
                .mutate_color(&name, CellTarget::Lines, None, Some(if show { 255 } else { 0 }))?;
        }
        self.flush()
    }

    fn apply_poly_alpha(&mut self) -> Result<()> {
        let alpha = (255.0 * self.options.poly_alpha).floor() as u8;
        for name in self.actor_names(ActorKind::Surface) {
            self.registry
                .mutate_color(&name, CellTarget::Polygons, None, Some(alpha))?;
        }
        self.flush()
    }

    /// Recolors every glyph from the current color map. A selected sample loses
    /// its highlight along with the rest of the old colors.
    fn apply_glyph_colors(&mut self) -> Result<()> {
        let table = self.glyph_color_table();
        for name in self.actor_names(ActorKind::Vector) {
            let Some(vectors) = self.registry.get(&name).and_then(|a| a.vectors()) else {
                continue;
            };
            let attributes = compute_vector_attributes(&vectors.source, table.as_deref());
            self.registry.set_vector_attributes(&name, attributes)?;
        }
        self.selection.sample = None;
        self.flush()
    }

    fn apply_vector_scaling(&mut self) -> Result<()> {
        let scaling = GlyphScaling {
            mode: self.options.vector_scaling,
            factor: self.options.glyph_scale_factor,
        };
        for name in self.actor_names(ActorKind::Vector) {
            self.renderer()?.set_glyph_scaling(&name, scaling)?;
        }
        self.renderer()?.request_render();
        Ok(())
    }
}
