//! The per-widget viewer context.
//!
//! A [`Viewer`] owns everything one widget instance needs: the host model, the
//! render backend once it is ready, the typed options, the color-map table, the
//! actor registry and the current selection. Nothing here is process-wide.

mod picking;
mod properties;

use fieldscope_core::color::{hex_to_rgb8, Rgb8};
use fieldscope_core::{
    ActorKind, Axis, CameraState, FieldscopeError, KindSet, ModelProperty, Result,
    SceneDocument, VectorScaling, ViewerOptions,
};
use fieldscope_render::{
    ColorMapRegistry, GlyphScaling, HeadlessBackend, RenderBackend, DEFAULT_NUM_COLORS,
};
use fieldscope_structures::{compute_vector_attributes, decode, ActorInfo, ActorRegistry, CellTarget};
use log::{debug, error, info, warn};
use serde_json::{json, Value};

use crate::host::HostModel;
use crate::message::CustomMessage;
use crate::readout::FieldReading;
use crate::ready::ReadyFuture;

/// A picked vector sample and what it displaced.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedSample {
    pub actor: String,
    pub index: usize,
    /// The glyph color before the highlight, restored on deselect.
    pub prior_color: Rgb8,
    pub reading: FieldReading,
    /// Color of the indicator pointer over the color-scale strip.
    pub pointer_color: Rgb8,
}

/// What is currently selected. Both `None` is the idle state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionState {
    /// Group id of the selected object.
    pub group: Option<String>,
    pub sample: Option<SelectedSample>,
}

impl SelectionState {
    pub fn is_idle(&self) -> bool {
        self.group.is_none() && self.sample.is_none()
    }
}

/// How a pick was resolved.
#[derive(Debug, Clone, PartialEq)]
pub enum PickOutcome {
    /// The pick modifier was not held.
    Ignored,
    ObjectSelected { group: String, color: Rgb8 },
    ObjectDeselected { group: String },
    VectorSampleSelected {
        actor: String,
        index: usize,
        reading: FieldReading,
    },
    VectorSampleDeselected { actor: String, index: usize },
    /// Nothing pickable under the cursor.
    NoHit,
}

/// Notifications for the embedding application, drained with [`Viewer::take_events`].
#[derive(Debug, Clone, PartialEq)]
pub enum ViewerEvent {
    /// A pick changed the selection.
    Pick(PickOutcome),
    /// The host asked for a file; answer with [`Viewer::load_field_points`].
    UploadRequested,
}

/// One widget instance.
pub struct Viewer<H: HostModel, B: RenderBackend = HeadlessBackend> {
    host: H,
    backend: Option<B>,
    options: ViewerOptions,
    color_maps: ColorMapRegistry,
    registry: ActorRegistry,
    selection: SelectionState,
    /// Edge color of the selected group.
    edge_highlight: Rgb8,
    scene: SceneDocument,
    events: Vec<ViewerEvent>,
}

impl<H: HostModel, B: RenderBackend> Viewer<H, B> {
    /// Creates a viewer over `host`, reading every recognized property.
    ///
    /// Nothing is rendered until a backend is attached.
    pub fn new(host: H) -> Self {
        let mut options = ViewerOptions::default();
        for property in ModelProperty::ALL {
            let Some(value) = host.get_property(property.as_str()) else {
                continue;
            };
            if let Err(e) = options.apply(property, &value) {
                warn!("{e}; keeping the default");
            }
        }
        Self {
            host,
            backend: None,
            options,
            color_maps: ColorMapRegistry::new(),
            registry: ActorRegistry::new(),
            selection: SelectionState::default(),
            edge_highlight: [0, 0, 0],
            scene: SceneDocument::default(),
            events: Vec::new(),
        }
    }

    /// Creates a viewer and attaches an already-ready backend.
    pub fn with_backend(host: H, backend: B) -> Result<Self> {
        let mut viewer = Self::new(host);
        viewer.attach(backend)?;
        Ok(viewer)
    }

    /// Waits for the render view, then attaches its backend.
    pub async fn wait_ready(&mut self, ready: ReadyFuture<B>) -> Result<()> {
        let backend = ready.await?;
        self.attach(backend)
    }

    /// Takes ownership of a ready backend and builds the first scene.
    pub fn attach(&mut self, mut backend: B) -> Result<()> {
        backend.set_background(hex_to_rgb8(&self.options.bg_color).unwrap_or([255, 255, 255]));
        backend.set_marker_visible(self.options.show_marker);
        self.backend = Some(backend);
        info!("render view ready");
        self.publish_client_props();
        self.refresh()
    }

    pub fn is_ready(&self) -> bool {
        self.backend.is_some()
    }

    fn renderer(&mut self) -> Result<&mut B> {
        self.backend.as_mut().ok_or(FieldscopeError::NoRenderer)
    }

    /// Tells the host which color maps and scaling modes it may offer.
    fn publish_client_props(&mut self) {
        let props = json!({
            "field_color_maps": self.color_maps.names(),
            "field_color_map_name": self.options.field_color_map_name,
            "vector_scaling_types": VectorScaling::ALL.map(VectorScaling::as_str),
            "vector_scaling": self.options.vector_scaling.as_str(),
        });
        self.host.set_property("client_props", props);
        self.host.touch();
    }

    /// Rebuilds every actor from `model_data`.
    ///
    /// The new actors are built in full before anything is torn down, so a
    /// malformed document leaves the previous scene on screen. If the backend
    /// rejects the new actors, the previous ones are submitted again.
    pub fn refresh(&mut self) -> Result<()> {
        if self.backend.is_none() {
            return Err(FieldscopeError::NoRenderer);
        }
        let value = self.host.get_property("model_data").unwrap_or(Value::Null);
        let scene = SceneDocument::from_value(&value)?;
        let mut next = ActorRegistry::new();
        for actor in self.build_actors(&scene)? {
            next.insert(actor)?;
        }

        let line_alpha = if self.options.show_edges { 255 } else { 0 };
        let poly_alpha = (255.0 * self.options.poly_alpha).floor() as u8;
        let surfaces: Vec<String> = next
            .iter()
            .filter(|a| a.kind() == ActorKind::Surface)
            .map(|a| a.name().to_string())
            .collect();
        for name in &surfaces {
            next.mutate_color(name, CellTarget::Lines, None, Some(line_alpha))?;
            next.mutate_color(name, CellTarget::Polygons, None, Some(poly_alpha))?;
        }

        let previous = std::mem::replace(&mut self.registry, next);
        let previous_selection = std::mem::take(&mut self.selection);
        if let Err(e) = self.submit_actors() {
            warn!("backend rejected scene '{}': {e}; restoring the previous scene", scene.name);
            self.registry = previous;
            self.selection = previous_selection;
            self.submit_actors()?;
            if self.selection.group.is_some() {
                self.highlight_edges()?;
            }
            return Err(e);
        }
        info!(
            "built {} actors for scene '{}'",
            self.registry.len(),
            scene.name
        );
        self.scene = scene;

        match self.options.cam_state {
            Some(camera) => {
                let backend = self.renderer()?;
                backend.set_camera(&camera);
                backend.request_render();
                Ok(())
            }
            None => self.reset_view(),
        }
    }

    /// Clears the backend and submits every registered actor.
    fn submit_actors(&mut self) -> Result<()> {
        let backend = self.backend.as_mut().ok_or(FieldscopeError::NoRenderer)?;
        backend.clear();
        let scaling = GlyphScaling {
            mode: self.options.vector_scaling,
            factor: self.options.glyph_scale_factor,
        };
        for actor in self.registry.iter() {
            let name = actor.name();
            match actor.vectors() {
                Some(vectors) => {
                    backend.add_glyphs(name, actor.buffers(), &vectors.attributes)?;
                    backend.set_glyph_scaling(name, scaling)?;
                }
                None => {
                    backend.add_mesh(name, actor.buffers())?;
                    backend.set_edge_visibility(name, self.options.show_edges)?;
                }
            }
            backend.set_pickable(name, actor.is_pickable())?;
        }
        // submitted buffers already carry every pending color change
        self.registry.take_dirty();
        backend.request_render();
        Ok(())
    }

    fn build_actors(&self, scene: &SceneDocument) -> Result<Vec<ActorInfo>> {
        let table = self.glyph_color_table();
        let mut actors = Vec::new();
        for (i, object) in scene.data.iter().enumerate() {
            let group = scene.group_id(i);

            let surface = decode(object, KindSet::SURFACE)?;
            if !surface.is_empty() {
                // outlines alone are decoration
                let pickable = surface.num_polygon_cells() > 0;
                let name = format!("{}_{i}", ActorKind::Surface.prefix());
                actors.push(ActorInfo::new(
                    name,
                    group.clone(),
                    surface,
                    ActorKind::Surface,
                    pickable,
                )?);
            }

            let Some(vectors) = object.vectors.as_ref() else {
                continue;
            };
            let buffers = decode(object, KindSet::VECTORS)?;
            if buffers.is_empty() {
                continue;
            }
            let attributes = compute_vector_attributes(vectors, table.as_deref());
            let name = format!("{}_{i}", ActorKind::Vector.prefix());
            actors.push(
                ActorInfo::new(name, group, buffers, ActorKind::Vector, true)?
                    .with_vectors(vectors.clone(), attributes),
            );
        }
        Ok(actors)
    }

    /// The glyph color lookup table, or `None` (black glyphs) when the configured
    /// map is unknown.
    fn glyph_color_table(&self) -> Option<Vec<Rgb8>> {
        let name = self.options.glyph_color_map()?;
        match self.color_maps.colormap(name, DEFAULT_NUM_COLORS) {
            Ok(table) => Some(table),
            Err(e) => {
                warn!("{e}; vector glyphs fall back to black");
                None
            }
        }
    }

    fn actor_names(&self, kind: ActorKind) -> Vec<String> {
        self.registry
            .iter()
            .filter(|a| a.kind() == kind)
            .map(|a| a.name().to_string())
            .collect()
    }

    /// Pushes every changed actor to the backend and requests a redraw.
    fn flush(&mut self) -> Result<()> {
        let dirty = self.registry.take_dirty();
        let backend = self.backend.as_mut().ok_or(FieldscopeError::NoRenderer)?;
        for name in &dirty {
            let Some(actor) = self.registry.get(name) else {
                continue;
            };
            match actor.vectors() {
                Some(vectors) => backend.update_glyph_colors(name, &vectors.attributes.colors)?,
                None => backend.update_cell_colors(name, &actor.buffers().cell_colors)?,
            }
        }
        backend.request_render();
        Ok(())
    }

    /// Restores the default framing.
    pub fn reset_view(&mut self) -> Result<()> {
        self.set_camera(CameraState::default())
    }

    /// Looks along `axis` from the `dir` side.
    pub fn set_axis(&mut self, axis: Axis, dir: f32) -> Result<()> {
        self.set_camera(CameraState::along_axis(axis, dir))
    }

    /// Moves the camera and persists it to `cam_state`.
    pub fn set_camera(&mut self, camera: CameraState) -> Result<()> {
        let backend = self.renderer()?;
        backend.set_camera(&camera);
        backend.request_render();
        self.options.cam_state = Some(camera);
        self.host
            .set_property(ModelProperty::CamState.as_str(), serde_json::to_value(camera)?);
        self.host.touch();
        Ok(())
    }

    /// Handles a custom message, logging failures instead of returning them.
    pub fn on_custom_message(&mut self, message: &Value) {
        if let Err(e) = self.handle_custom_message(message) {
            error!("{e}");
        }
    }

    /// Handles a custom message.
    pub fn handle_custom_message(&mut self, message: &Value) -> Result<()> {
        match CustomMessage::parse(message)? {
            CustomMessage::Debug { msg } => debug!("{msg}"),
            CustomMessage::Error { msg } => error!("{msg}"),
            CustomMessage::Refresh => self.refresh()?,
            CustomMessage::Reset => self.reset_view()?,
            CustomMessage::Axis { axis, dir } => self.set_axis(axis, dir)?,
            CustomMessage::Upload => self.events.push(ViewerEvent::UploadRequested),
        }
        Ok(())
    }

    /// Parses the text of an uploaded file into `file_data`.
    ///
    /// Values are separated by commas or whitespace and must form whole
    /// `x, y, z` points. Returns the number of points.
    pub fn load_field_points(&mut self, file_name: &str, text: &str) -> Result<usize> {
        let invalid = |reason: String| FieldscopeError::InvalidProperty {
            name: "file_data".to_string(),
            reason: format!("{file_name}: {reason}"),
        };
        let values = text
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|t| !t.is_empty())
            .map(|t| {
                t.parse::<f64>()
                    .map_err(|_| invalid(format!("'{t}' is not a number")))
            })
            .collect::<Result<Vec<_>>>()?;
        if values.len() % 3 != 0 {
            return Err(invalid(format!(
                "{} values do not form x, y, z points",
                values.len()
            )));
        }
        let points = values.len() / 3;
        self.host.set_property("file_data", json!(values));
        self.host.touch();
        info!("loaded {points} field points from {file_name}");
        Ok(points)
    }

    /// The readout for the current selection: the field reading, the selected
    /// group id, or `"--"`.
    pub fn selection_text(&self) -> String {
        if let Some(sample) = &self.selection.sample {
            return sample.reading.formatted_text.clone();
        }
        self.selection
            .group
            .clone()
            .unwrap_or_else(|| "--".to_string())
    }

    /// Drains pending events, oldest first.
    pub fn take_events(&mut self) -> Vec<ViewerEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn backend(&self) -> Option<&B> {
        self.backend.as_ref()
    }

    pub fn backend_mut(&mut self) -> Option<&mut B> {
        self.backend.as_mut()
    }

    pub fn options(&self) -> &ViewerOptions {
        &self.options
    }

    /// Tuning options without a model property, such as readout precision.
    ///
    /// Changes take effect the next time the option is used.
    pub fn options_mut(&mut self) -> &mut ViewerOptions {
        &mut self.options
    }

    pub fn registry(&self) -> &ActorRegistry {
        &self.registry
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    /// The scene of the last successful rebuild.
    pub fn scene(&self) -> &SceneDocument {
        &self.scene
    }

    pub fn color_maps(&self) -> &ColorMapRegistry {
        &self.color_maps
    }

    pub fn color_maps_mut(&mut self) -> &mut ColorMapRegistry {
        &mut self.color_maps
    }
}
