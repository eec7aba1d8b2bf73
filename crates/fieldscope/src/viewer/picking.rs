//! Pick resolution: renderer hits to selections.

use fieldscope_core::color::{contrasting_highlight, fg_color_for_bg, rgb8_to_hex, Rgb8};
use fieldscope_core::{ActorKind, FieldscopeError, PickInput, Result};
use fieldscope_render::RenderBackend;
use fieldscope_structures::{ActorInfo, CellTarget};
use log::debug;
use serde_json::Value;

use super::{PickOutcome, SelectedSample, Viewer, ViewerEvent};
use crate::host::HostModel;
use crate::readout::{compute_field_reading_with, FieldReading};

/// What a hit resolved to, before any state changes.
enum Hit {
    Sample { actor: String, index: usize },
    Face { group: String, color: Rgb8 },
}

impl<H: HostModel, B: RenderBackend> Viewer<H, B> {
    /// Resolves a click into a selection change.
    ///
    /// The click only counts while the pick modifier is held. A cell hit is
    /// preferred over a point hit; vector samples are indexed by the point hit.
    pub fn handle_pick(&mut self, input: PickInput) -> Result<PickOutcome> {
        if !input.modifiers.holds(self.options.pick_modifier) {
            return Ok(PickOutcome::Ignored);
        }
        let backend = self.renderer()?;
        let point = backend.pick_point(input.position);
        let cell = backend.pick_cell(input.position);
        let point_id = point.as_ref().map(|p| p.point_id);

        let hit = match (&cell, &point) {
            (Some(cell), _) => self.resolve_hit(&cell.actors, Some(cell.cell_id), point_id),
            (None, Some(point)) => self.resolve_hit(&point.actors, None, point_id),
            (None, None) => None,
        };
        let outcome = match hit {
            Some(Hit::Sample { actor, index }) => self.toggle_sample(actor, index)?,
            Some(Hit::Face { group, color }) => self.toggle_group(group, color)?,
            None => {
                debug!("pick at {} hit nothing", input.position);
                return Ok(PickOutcome::NoHit);
            }
        };
        self.events.push(ViewerEvent::Pick(outcome.clone()));
        Ok(outcome)
    }

    /// Walks the hit actors nearest first and returns the first that resolves.
    fn resolve_hit(
        &self,
        actors: &[String],
        cell_id: Option<usize>,
        point_id: Option<usize>,
    ) -> Option<Hit> {
        actors.iter().find_map(|name| {
            let Some(actor) = self.registry.get(name) else {
                debug!("pick hit '{name}', which carries no data");
                return None;
            };
            match actor.kind() {
                ActorKind::Vector => {
                    let index = point_id?;
                    let source = &actor.vectors()?.source;
                    (source.position(index).is_some() && source.vector(index).is_some())
                        .then(|| Hit::Sample {
                            actor: name.clone(),
                            index,
                        })
                }
                ActorKind::Surface => face_color(actor, cell_id?).map(|color| Hit::Face {
                    group: actor.group().to_string(),
                    color,
                }),
            }
        })
    }

    /// Selects a vector sample, or deselects it if it is already selected.
    fn toggle_sample(&mut self, actor: String, index: usize) -> Result<PickOutcome> {
        if let Some(previous) = self.selection.sample.take() {
            self.registry
                .mutate_glyph_color(&previous.actor, previous.index, previous.prior_color)?;
            if previous.actor == actor && previous.index == index {
                self.flush()?;
                return Ok(PickOutcome::VectorSampleDeselected { actor, index });
            }
        }
        // the restored sample reaches the backend even if the new one fails
        let selected = self.select_sample(&actor, index);
        self.flush()?;
        Ok(PickOutcome::VectorSampleSelected {
            actor,
            index,
            reading: selected?,
        })
    }

    /// Highlights one sample and records it as the selection.
    fn select_sample(&mut self, actor: &str, index: usize) -> Result<FieldReading> {
        let vectors = self
            .registry
            .require(actor)?
            .vectors()
            .ok_or_else(|| FieldscopeError::NoVectorData(actor.to_string()))?;
        let missing = || FieldscopeError::GlyphNotFound {
            actor: actor.to_string(),
            index,
        };
        let point = vectors.source.position(index).ok_or_else(missing)?;
        let vector = vectors.source.vector(index).ok_or_else(missing)?;
        let [min, max] = vectors.source.range();
        let reading = compute_field_reading_with(
            point,
            vector,
            min,
            max,
            &vectors.source.units,
            self.options.readout_precision,
        )?;
        let current = vectors.attributes.colors.get(index).copied().ok_or_else(missing)?;
        let prior_color = self
            .registry
            .mutate_glyph_color(actor, index, contrasting_highlight(current))?;

        let pointer_color = self
            .color_maps
            .get(&self.options.field_color_map_name)
            .and_then(|m| m.color_at(reading.pointer_fraction))
            .map_or([0, 0, 0], fg_color_for_bg);
        self.selection.sample = Some(SelectedSample {
            actor: actor.to_string(),
            index,
            prior_color,
            reading: reading.clone(),
            pointer_color,
        });
        Ok(reading)
    }

    /// Selects the object `group`, or deselects it if it is already selected.
    fn toggle_group(&mut self, group: String, color: Rgb8) -> Result<PickOutcome> {
        let outcome = if self.selection.group.as_deref() == Some(group.as_str()) {
            self.selection.group = None;
            PickOutcome::ObjectDeselected { group }
        } else {
            let hex = rgb8_to_hex(color);
            self.options.selected_obj_color.clone_from(&hex);
            self.host.set_property("selected_obj_color", Value::String(hex));
            self.host.touch();
            self.selection.group = Some(group.clone());
            PickOutcome::ObjectSelected { group, color }
        };
        self.edge_highlight = contrasting_highlight(color);
        self.highlight_edges()?;
        Ok(outcome)
    }

    /// Gives the edges of the selected group the current highlight, every other
    /// edge black.
    pub(super) fn highlight_edges(&mut self) -> Result<()> {
        let highlight = self.edge_highlight;
        let edges: Vec<(String, Rgb8)> = self
            .registry
            .iter()
            .filter(|a| a.kind() == ActorKind::Surface)
            .map(|a| {
                let selected = self.selection.group.as_deref() == Some(a.group());
                (a.name().to_string(), if selected { highlight } else { [0, 0, 0] })
            })
            .collect();
        for (name, color) in edges {
            self.registry
                .mutate_color(&name, CellTarget::Lines, Some(color), None)?;
            self.renderer()?.set_edge_color(&name, color)?;
        }
        self.flush()
    }
}

/// The face color under a hit cell.
///
/// Edge cells that outline a face resolve to that face; other edges report their
/// own color.
fn face_color(actor: &ActorInfo, cell_id: usize) -> Option<Rgb8> {
    let lines = actor.buffers().num_line_cells();
    let cell = if cell_id < lines {
        actor
            .correlation()
            .and_then(|c| c.polygon_for(cell_id))
            .map_or(cell_id, |polygon| lines + polygon)
    } else {
        cell_id
    };
    actor.cell_color(cell)
}
