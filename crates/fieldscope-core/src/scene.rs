//! Scene document model.
//!
//! A [`SceneDocument`] is the `model_data` payload the host sends: a named list of
//! [`SceneObject`]s, each carrying up to three primitive groups (lines, polygons,
//! vectors) as flat coordinate arrays.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{FieldscopeError, Result};
use crate::kind::GeometryKind;

/// The full scene payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneDocument {
    /// Display name of the scene (e.g. `"magnet.Geom"`).
    #[serde(default)]
    pub name: String,
    /// Host-side identifier for the whole scene, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    /// The objects, in document order.
    #[serde(default)]
    pub data: Vec<SceneObject>,
}

impl SceneDocument {
    /// Parses a document from the host's JSON value.
    ///
    /// `null` and `{}` both decode to an empty document.
    pub fn from_value(value: &Value) -> Result<Self> {
        if value.is_null() {
            return Ok(Self::default());
        }
        Ok(Self::deserialize(value)?)
    }

    /// Returns whether the document has no objects.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns whether any object carries non-empty data of `kind`.
    pub fn has_kind(&self, kind: GeometryKind) -> bool {
        self.data.iter().any(|o| o.has_kind(kind))
    }

    /// Returns the logical group id of the object at `index`.
    ///
    /// Objects with an explicit `id` use it; others fall back to `"<name>.<index>"`.
    pub fn group_id(&self, index: usize) -> String {
        self.data
            .get(index)
            .and_then(|o| o.id.as_ref())
            .map_or_else(|| format!("{}.{index}", self.name), id_to_string)
    }

    /// Returns the axis-aligned bounds over all objects, if any have vertices.
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        self.data
            .iter()
            .filter_map(SceneObject::bounds)
            .reduce(|(amin, amax), (bmin, bmax)| (amin.min(bmin), amax.max(bmax)))
    }
}

fn id_to_string(id: &Value) -> String {
    match id {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// One object of the scene: up to three primitive groups.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneObject {
    /// Host-side identifier, used as the object's group id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lines: Option<GeometryData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub polygons: Option<GeometryData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vectors: Option<VectorData>,
}

impl SceneObject {
    /// Returns the coordinate data of the given kind, if present.
    pub fn geometry(&self, kind: GeometryKind) -> Option<&GeometryData> {
        match kind {
            GeometryKind::Lines => self.lines.as_ref(),
            GeometryKind::Polygons => self.polygons.as_ref(),
            GeometryKind::Vectors => self.vectors.as_ref().map(|v| &v.geometry),
        }
    }

    /// Returns whether the object carries non-empty data of `kind`.
    pub fn has_kind(&self, kind: GeometryKind) -> bool {
        self.geometry(kind).is_some_and(|g| !g.vertices.is_empty())
    }

    /// Returns the axis-aligned bounds of every vertex in the object.
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let mut points = GeometryKind::ALL
            .into_iter()
            .filter_map(|k| self.geometry(k))
            .flat_map(GeometryData::points)
            .peekable();
        points.peek()?;
        Some(points.fold(
            (Vec3::splat(f32::MAX), Vec3::splat(f32::MIN)),
            |(min, max), p| (min.min(p), max.max(p)),
        ))
    }
}

/// Flat coordinate data for one primitive group.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeometryData {
    /// Vertex coordinates as flat `x, y, z` triplets.
    #[serde(default)]
    pub vertices: Vec<f64>,
    /// Vertex count of each primitive, in order.
    #[serde(default)]
    pub lengths: Vec<u32>,
    /// Normalized RGB triplets, per primitive or per vertex.
    #[serde(default)]
    pub colors: Vec<f64>,
}

impl GeometryData {
    /// Returns the number of vertices.
    pub fn num_vertices(&self) -> usize {
        self.vertices.len() / 3
    }

    /// Returns the number of primitives.
    pub fn num_primitives(&self) -> usize {
        self.lengths.len()
    }

    /// Iterates the vertices as points.
    pub fn points(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.vertices
            .chunks_exact(3)
            .map(|c| Vec3::new(c[0] as f32, c[1] as f32, c[2] as f32))
    }

    /// Checks the coordinate, length and color arrays against each other.
    ///
    /// Vector groups may leave `lengths` empty, in which case every vertex is its own sample.
    pub fn validate(&self, kind: GeometryKind) -> Result<()> {
        if self.vertices.len() % 3 != 0 {
            return Err(FieldscopeError::malformed(
                kind,
                format!("{} coordinates is not a multiple of 3", self.vertices.len()),
            ));
        }
        let lengths_optional = kind == GeometryKind::Vectors && self.lengths.is_empty();
        if !lengths_optional {
            let total: usize = self.lengths.iter().map(|&l| l as usize).sum();
            if total * 3 != self.vertices.len() {
                return Err(FieldscopeError::malformed(
                    kind,
                    format!(
                        "lengths sum to {total} vertices but {} were given",
                        self.num_vertices()
                    ),
                ));
            }
        }
        if self.colors.len() % 3 != 0 {
            return Err(FieldscopeError::malformed(
                kind,
                format!("{} color values is not a multiple of 3", self.colors.len()),
            ));
        }
        Ok(())
    }
}

/// Vector samples: positions plus a unit direction and magnitude per sample.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VectorData {
    #[serde(flatten)]
    pub geometry: GeometryData,
    /// Unit directions as flat triplets, one per vertex.
    #[serde(default)]
    pub directions: Vec<f64>,
    /// Magnitudes, one per vertex.
    #[serde(default)]
    pub magnitudes: Vec<f64>,
    /// Declared `[min, max]` of the magnitudes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<[f64; 2]>,
    /// Unit label of the magnitudes (e.g. `"T"`).
    #[serde(default)]
    pub units: String,
}

impl VectorData {
    /// Returns the number of samples.
    pub fn num_samples(&self) -> usize {
        self.geometry.num_vertices()
    }

    /// Checks positions, directions and magnitudes against each other.
    pub fn validate(&self) -> Result<()> {
        self.geometry.validate(GeometryKind::Vectors)?;
        let n = self.num_samples();
        if self.directions.len() != 3 * n {
            return Err(FieldscopeError::malformed(
                GeometryKind::Vectors,
                format!("{} direction values for {n} samples", self.directions.len()),
            ));
        }
        if self.magnitudes.len() != n {
            return Err(FieldscopeError::malformed(
                GeometryKind::Vectors,
                format!("{} magnitudes for {n} samples", self.magnitudes.len()),
            ));
        }
        Ok(())
    }

    /// Returns the sample position at `index`.
    pub fn position(&self, index: usize) -> Option<[f64; 3]> {
        triplet(&self.geometry.vertices, index)
    }

    /// Returns the field vector (direction times magnitude) at `index`.
    pub fn vector(&self, index: usize) -> Option<[f64; 3]> {
        let d = triplet(&self.directions, index)?;
        let m = *self.magnitudes.get(index)?;
        Some([d[0] * m, d[1] * m, d[2] * m])
    }

    /// Returns the declared range, or the observed `[min, max]` of the magnitudes.
    pub fn range(&self) -> [f64; 2] {
        self.range.unwrap_or_else(|| magnitude_range(&self.magnitudes))
    }
}

/// Returns `[min, max]` of `values`, or `[0, 0]` when empty.
pub fn magnitude_range(values: &[f64]) -> [f64; 2] {
    if values.is_empty() {
        return [0.0, 0.0];
    }
    values
        .iter()
        .fold([f64::INFINITY, f64::NEG_INFINITY], |[lo, hi], &v| {
            [lo.min(v), hi.max(v)]
        })
}

fn triplet(values: &[f64], index: usize) -> Option<[f64; 3]> {
    let s = values.get(3 * index..3 * index + 3)?;
    Some([s[0], s[1], s[2]])
}
