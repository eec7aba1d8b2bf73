//! Viewer configuration, mirrored from the host model's properties.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::camera::CameraState;
use crate::error::{FieldscopeError, Result};

/// How vector glyphs are scaled along their long axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum VectorScaling {
    /// Every glyph has the same length.
    #[default]
    Uniform,
    /// Length proportional to magnitude.
    Linear,
    /// Length proportional to log-magnitude, remapped to the magnitude range.
    Log,
}

impl VectorScaling {
    /// All modes, in the order offered to the user.
    pub const ALL: [VectorScaling; 3] = [Self::Uniform, Self::Linear, Self::Log];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Uniform => "Uniform",
            Self::Linear => "Linear",
            Self::Log => "Log",
        }
    }
}

/// The modifier key that must be held for a click to count as a pick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PickModifier {
    #[default]
    Control,
    Shift,
    Alt,
}

/// Decimal places used by the field readout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadoutPrecision {
    pub magnitude: i32,
    pub angle: i32,
    pub coordinate: i32,
}

impl Default for ReadoutPrecision {
    fn default() -> Self {
        Self {
            magnitude: 4,
            angle: 2,
            coordinate: 2,
        }
    }
}

/// Typed view of every property the viewer reacts to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerOptions {
    /// Title shown above the view.
    pub title: String,

    /// Background color, `#rrggbb`.
    pub bg_color: String,

    /// Color of the selected object, `#rrggbb`. Written back on every pick.
    pub selected_obj_color: String,

    /// Whether edges (line cells) are visible.
    pub show_edges: bool,

    /// Whether the orientation marker is visible.
    pub show_marker: bool,

    /// Opacity of polygon cells, `0..=1`.
    pub poly_alpha: f32,

    /// Color map of the field color-scale strip.
    pub field_color_map_name: String,

    /// Color map of the vector glyphs; empty falls back to `field_color_map_name`.
    pub vector_color_map_name: String,

    /// Glyph scaling mode.
    pub vector_scaling: VectorScaling,

    /// Persisted camera, if the host has one.
    pub cam_state: Option<CameraState>,

    /// Constant factor applied to every glyph.
    pub glyph_scale_factor: f32,

    /// Modifier gating picks.
    pub pick_modifier: PickModifier,

    /// Readout rounding.
    pub readout_precision: ReadoutPrecision,
}

impl Default for ViewerOptions {
    fn default() -> Self {
        Self {
            title: String::new(),
            bg_color: "#ffffff".to_string(),
            selected_obj_color: "#ffffff".to_string(),
            show_edges: true,
            show_marker: true,
            poly_alpha: 1.0,
            field_color_map_name: "viridis".to_string(),
            vector_color_map_name: String::new(),
            vector_scaling: VectorScaling::Uniform,
            cam_state: None,
            glyph_scale_factor: 8.0,
            pick_modifier: PickModifier::Control,
            readout_precision: ReadoutPrecision::default(),
        }
    }
}

impl ViewerOptions {
    /// Returns the color map used for vector glyphs, if any is configured.
    pub fn glyph_color_map(&self) -> Option<&str> {
        [&self.vector_color_map_name, &self.field_color_map_name]
            .into_iter()
            .find(|n| !n.is_empty())
            .map(String::as_str)
    }

    /// Updates one field from a property value sent by the host.
    ///
    /// `model_data` is accepted and ignored: the scene is read separately.
    pub fn apply(&mut self, property: ModelProperty, value: &Value) -> Result<()> {
        match property {
            ModelProperty::ModelData => {}
            ModelProperty::Title => self.title = parse(property, value)?,
            ModelProperty::BgColor => self.bg_color = parse(property, value)?,
            ModelProperty::SelectedObjColor => self.selected_obj_color = parse(property, value)?,
            ModelProperty::ShowEdges => self.show_edges = parse(property, value)?,
            ModelProperty::ShowMarker => self.show_marker = parse(property, value)?,
            ModelProperty::PolyAlpha => {
                let alpha: f32 = parse(property, value)?;
                if !(0.0..=1.0).contains(&alpha) {
                    return Err(FieldscopeError::InvalidProperty {
                        name: property.to_string(),
                        reason: format!("{alpha} is outside 0..=1"),
                    });
                }
                self.poly_alpha = alpha;
            }
            ModelProperty::FieldColorMapName => {
                self.field_color_map_name = parse(property, value)?;
            }
            ModelProperty::VectorColorMapName => {
                self.vector_color_map_name = parse(property, value)?;
            }
            ModelProperty::VectorScaling => {
                // the host leaves this empty until the user picks a mode
                if value.as_str().is_some_and(str::is_empty) || value.is_null() {
                    self.vector_scaling = VectorScaling::Uniform;
                } else {
                    self.vector_scaling = parse(property, value)?;
                }
            }
            ModelProperty::CamState => {
                // an empty object means "no saved camera"
                let empty = value.is_null() || value.as_object().is_some_and(|o| o.is_empty());
                self.cam_state = if empty {
                    None
                } else {
                    Some(parse(property, value)?)
                };
            }
        }
        Ok(())
    }
}

fn parse<T: for<'de> Deserialize<'de>>(property: ModelProperty, value: &Value) -> Result<T> {
    T::deserialize(value).map_err(|e| FieldscopeError::InvalidProperty {
        name: property.to_string(),
        reason: e.to_string(),
    })
}

/// The model properties the viewer recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelProperty {
    ModelData,
    Title,
    BgColor,
    SelectedObjColor,
    ShowEdges,
    ShowMarker,
    PolyAlpha,
    FieldColorMapName,
    VectorColorMapName,
    VectorScaling,
    CamState,
}

impl ModelProperty {
    pub const ALL: [ModelProperty; 11] = [
        Self::ModelData,
        Self::Title,
        Self::BgColor,
        Self::SelectedObjColor,
        Self::ShowEdges,
        Self::ShowMarker,
        Self::PolyAlpha,
        Self::FieldColorMapName,
        Self::VectorColorMapName,
        Self::VectorScaling,
        Self::CamState,
    ];

    /// Returns the host-side property name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ModelData => "model_data",
            Self::Title => "title",
            Self::BgColor => "bg_color",
            Self::SelectedObjColor => "selected_obj_color",
            Self::ShowEdges => "show_edges",
            Self::ShowMarker => "show_marker",
            Self::PolyAlpha => "poly_alpha",
            Self::FieldColorMapName => "field_color_map_name",
            Self::VectorColorMapName => "vector_color_map_name",
            Self::VectorScaling => "vector_scaling",
            Self::CamState => "cam_state",
        }
    }
}

impl fmt::Display for ModelProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelProperty {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL.into_iter().find(|p| p.as_str() == s).ok_or(())
    }
}
