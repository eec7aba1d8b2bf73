//! Actor registry.
//!
//! Every renderable group the viewer hands to the backend is an [`ActorInfo`]: its
//! buffers, the byte offsets of the color tuples it owns, and for surfaces the
//! edge-to-face correlation. Displayed colors change only through
//! [`ActorRegistry::mutate_color`] and [`ActorRegistry::mutate_glyph_color`], which
//! record the actor as dirty so the caller can push the change to the backend.

use std::collections::{BTreeSet, HashMap};

use fieldscope_core::color::Rgb8;
use fieldscope_core::{ActorKind, FieldscopeError, Result, VectorData};
use fieldscope_render::buffer::COLOR_STRIDE;
use fieldscope_render::{GlyphAttributes, MeshBuffers};

use crate::correlation::CellCorrelation;

/// Which cells of an actor a color mutation touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellTarget {
    Lines,
    Polygons,
}

/// Source samples and derived glyph attributes of a vector actor.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorActorData {
    pub source: VectorData,
    pub attributes: GlyphAttributes,
}

/// One registered actor.
#[derive(Debug, Clone)]
pub struct ActorInfo {
    name: String,
    group: String,
    kind: ActorKind,
    pickable: bool,
    buffers: MeshBuffers,
    line_color_offsets: Vec<usize>,
    polygon_color_offsets: Vec<usize>,
    correlation: Option<CellCorrelation>,
    vectors: Option<VectorActorData>,
}

impl ActorInfo {
    /// Creates an actor record, computing color offsets and, for surfaces, the
    /// cell correlation.
    ///
    /// Fails with [`FieldscopeError::ActorWithoutMapper`] when `buffers` has no points.
    pub fn new(
        name: impl Into<String>,
        group: impl Into<String>,
        buffers: MeshBuffers,
        kind: ActorKind,
        pickable: bool,
    ) -> Result<Self> {
        let name = name.into();
        if buffers.is_empty() {
            return Err(FieldscopeError::ActorWithoutMapper(name));
        }
        let correlation = match kind {
            ActorKind::Surface => Some(CellCorrelation::build(&buffers)),
            ActorKind::Vector => None,
        };
        Ok(Self {
            name,
            group: group.into(),
            kind,
            pickable,
            line_color_offsets: buffers.line_color_offsets(),
            polygon_color_offsets: buffers.polygon_color_offsets(),
            buffers,
            correlation,
            vectors: None,
        })
    }

    /// Attaches vector samples and their glyph attributes.
    pub fn with_vectors(mut self, source: VectorData, attributes: GlyphAttributes) -> Self {
        self.vectors = Some(VectorActorData { source, attributes });
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Logical group id shared by every actor decoded from the same scene object.
    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn kind(&self) -> ActorKind {
        self.kind
    }

    pub fn is_pickable(&self) -> bool {
        self.pickable
    }

    pub fn buffers(&self) -> &MeshBuffers {
        &self.buffers
    }

    pub fn line_color_offsets(&self) -> &[usize] {
        &self.line_color_offsets
    }

    pub fn polygon_color_offsets(&self) -> &[usize] {
        &self.polygon_color_offsets
    }

    pub fn correlation(&self) -> Option<&CellCorrelation> {
        self.correlation.as_ref()
    }

    pub fn vectors(&self) -> Option<&VectorActorData> {
        self.vectors.as_ref()
    }

    /// Returns the RGB of the cell at `cell_id`, lines first.
    pub fn cell_color(&self, cell_id: usize) -> Option<Rgb8> {
        self.buffers.cell_color(cell_id)
    }
}

/// Registry of every actor, in registration order.
#[derive(Debug, Default)]
pub struct ActorRegistry {
    actors: Vec<ActorInfo>,
    by_name: HashMap<String, usize>,
    dirty: BTreeSet<String>,
}

impl ActorRegistry {
    /// Creates a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds and registers an actor.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        group: impl Into<String>,
        buffers: MeshBuffers,
        kind: ActorKind,
        pickable: bool,
    ) -> Result<&ActorInfo> {
        let info = ActorInfo::new(name, group, buffers, kind, pickable)?;
        self.insert(info)
    }

    /// Registers a prepared actor.
    ///
    /// Returns an error if an actor with the same name already exists.
    pub fn insert(&mut self, info: ActorInfo) -> Result<&ActorInfo> {
        if self.by_name.contains_key(&info.name) {
            return Err(FieldscopeError::ActorExists(info.name));
        }
        let index = self.actors.len();
        self.by_name.insert(info.name.clone(), index);
        self.actors.push(info);
        Ok(&self.actors[index])
    }

    pub fn get(&self, name: &str) -> Option<&ActorInfo> {
        self.by_name.get(name).map(|&i| &self.actors[i])
    }

    /// Gets an actor, failing with [`FieldscopeError::ActorNotFound`].
    pub fn require(&self, name: &str) -> Result<&ActorInfo> {
        self.get(name)
            .ok_or_else(|| FieldscopeError::ActorNotFound(name.to_string()))
    }

    fn require_mut(&mut self, name: &str) -> Result<&mut ActorInfo> {
        match self.by_name.get(name) {
            Some(&i) => Ok(&mut self.actors[i]),
            None => Err(FieldscopeError::ActorNotFound(name.to_string())),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Iterates actors in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &ActorInfo> {
        self.actors.iter()
    }

    /// Iterates the actors belonging to `group`.
    pub fn group_members<'a>(&'a self, group: &'a str) -> impl Iterator<Item = &'a ActorInfo> {
        self.actors.iter().filter(move |a| a.group == group)
    }

    pub fn len(&self) -> usize {
        self.actors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }

    /// Overwrites the colors of every `target` cell of an actor.
    ///
    /// With `color`, the RGB bytes are replaced and alpha is left alone. With
    /// `alpha`, only the alpha byte is replaced. Passing both replaces all four.
    pub fn mutate_color(
        &mut self,
        name: &str,
        target: CellTarget,
        color: Option<Rgb8>,
        alpha: Option<u8>,
    ) -> Result<()> {
        let actor = self.require_mut(name)?;
        if color.is_none() && alpha.is_none() {
            return Ok(());
        }
        let ActorInfo {
            buffers,
            line_color_offsets,
            polygon_color_offsets,
            ..
        } = actor;
        let offsets = match target {
            CellTarget::Lines => line_color_offsets,
            CellTarget::Polygons => polygon_color_offsets,
        };
        for &offset in offsets.iter() {
            let Some(cell) = buffers.cell_colors.get_mut(offset..offset + COLOR_STRIDE) else {
                continue;
            };
            if let Some(rgb) = color {
                cell[..3].copy_from_slice(&rgb);
            }
            if let Some(a) = alpha {
                cell[3] = a;
            }
        }
        self.dirty.insert(name.to_string());
        Ok(())
    }

    /// Sets the color of one glyph sample and returns the color it replaced.
    pub fn mutate_glyph_color(&mut self, name: &str, index: usize, color: Rgb8) -> Result<Rgb8> {
        let actor = self.require_mut(name)?;
        let slot = actor
            .vectors
            .as_mut()
            .and_then(|v| v.attributes.colors.get_mut(index))
            .ok_or_else(|| FieldscopeError::GlyphNotFound {
                actor: name.to_string(),
                index,
            })?;
        let previous = std::mem::replace(slot, color);
        self.dirty.insert(name.to_string());
        Ok(previous)
    }

    /// Replaces the glyph attributes of a vector actor.
    pub fn set_vector_attributes(&mut self, name: &str, attributes: GlyphAttributes) -> Result<()> {
        let actor = self.require_mut(name)?;
        let Some(vectors) = actor.vectors.as_mut() else {
            return Err(FieldscopeError::NoVectorData(name.to_string()));
        };
        vectors.attributes = attributes;
        self.dirty.insert(name.to_string());
        Ok(())
    }

    /// Returns and forgets the names of actors changed since the last call, sorted.
    pub fn take_dirty(&mut self) -> Vec<String> {
        std::mem::take(&mut self.dirty).into_iter().collect()
    }

    /// Removes all actors.
    pub fn clear(&mut self) {
        self.actors.clear();
        self.by_name.clear();
        self.dirty.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldscope_core::{GeometryData, KindSet, SceneObject};

    fn surface() -> MeshBuffers {
        let obj = SceneObject {
            lines: Some(GeometryData {
                vertices: vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 0.0, 0.0],
                lengths: vec![4],
                colors: vec![0.0, 0.0, 0.0],
            }),
            polygons: Some(GeometryData {
                vertices: vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 0.0],
                lengths: vec![3],
                colors: vec![1.0, 0.0, 0.0],
            }),
            ..Default::default()
        };
        crate::decode(&obj, KindSet::ALL).unwrap()
    }

    #[test]
    fn test_register_computes_offsets() {
        let mut registry = ActorRegistry::new();
        let info = registry
            .register("geomSurface_0", "g0", surface(), ActorKind::Surface, true)
            .unwrap();
        assert_eq!(info.line_color_offsets(), &[0]);
        assert_eq!(info.polygon_color_offsets(), &[4]);
        assert_eq!(info.correlation().unwrap().polygon_for(0), Some(0));
        assert_eq!(info.cell_color(1), Some([255, 0, 0]));
    }

    #[test]
    fn test_register_rejects_duplicates_and_empty() {
        let mut registry = ActorRegistry::new();
        registry
            .register("a", "g", surface(), ActorKind::Surface, true)
            .unwrap();
        assert!(matches!(
            registry.register("a", "g", surface(), ActorKind::Surface, true),
            Err(FieldscopeError::ActorExists(_))
        ));
        assert!(matches!(
            registry.register("b", "g", MeshBuffers::default(), ActorKind::Surface, true),
            Err(FieldscopeError::ActorWithoutMapper(_))
        ));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_mutate_color_rgb_only() {
        let mut registry = ActorRegistry::new();
        registry
            .register("a", "g", surface(), ActorKind::Surface, true)
            .unwrap();
        registry
            .mutate_color("a", CellTarget::Polygons, None, Some(128))
            .unwrap();
        registry
            .mutate_color("a", CellTarget::Polygons, Some([1, 2, 3]), None)
            .unwrap();
        let colors = &registry.get("a").unwrap().buffers().cell_colors;
        assert_eq!(colors, &[0, 0, 0, 255, 1, 2, 3, 128]);
        assert_eq!(registry.take_dirty(), vec!["a".to_string()]);
        assert!(registry.take_dirty().is_empty());
    }

    #[test]
    fn test_mutate_unknown_actor() {
        let mut registry = ActorRegistry::new();
        assert!(matches!(
            registry.mutate_color("nope", CellTarget::Lines, Some([0, 0, 0]), None),
            Err(FieldscopeError::ActorNotFound(_))
        ));
    }

    #[test]
    fn test_glyph_color_swap() {
        let mut registry = ActorRegistry::new();
        let info = ActorInfo::new("vector_0", "g", surface(), ActorKind::Vector, true)
            .unwrap()
            .with_vectors(
                VectorData::default(),
                GlyphAttributes {
                    colors: vec![[9, 9, 9]],
                    ..Default::default()
                },
            );
        registry.insert(info).unwrap();
        let prev = registry.mutate_glyph_color("vector_0", 0, [1, 1, 1]).unwrap();
        assert_eq!(prev, [9, 9, 9]);
        assert!(matches!(
            registry.mutate_glyph_color("vector_0", 3, [1, 1, 1]),
            Err(FieldscopeError::GlyphNotFound { index: 3, .. })
        ));
        let restored = registry.mutate_glyph_color("vector_0", 0, prev).unwrap();
        assert_eq!(restored, [1, 1, 1]);
    }

    #[test]
    fn test_glyph_ops_need_vector_data() {
        let mut registry = ActorRegistry::new();
        registry
            .register("geomSurface_0", "g", surface(), ActorKind::Surface, true)
            .unwrap();
        assert!(matches!(
            registry.mutate_glyph_color("geomSurface_0", 0, [1, 1, 1]),
            Err(FieldscopeError::GlyphNotFound { ref actor, index: 0 }) if actor == "geomSurface_0"
        ));
        assert!(matches!(
            registry.set_vector_attributes("geomSurface_0", GlyphAttributes::default()),
            Err(FieldscopeError::NoVectorData(ref name)) if name == "geomSurface_0"
        ));
        assert!(matches!(
            registry.set_vector_attributes("vector_9", GlyphAttributes::default()),
            Err(FieldscopeError::ActorNotFound(_))
        ));
    }

    #[test]
    fn test_group_members_and_clear() {
        let mut registry = ActorRegistry::new();
        registry
            .register("a", "g0", surface(), ActorKind::Surface, true)
            .unwrap();
        registry
            .register("b", "g1", surface(), ActorKind::Surface, true)
            .unwrap();
        assert_eq!(registry.group_members("g1").count(), 1);
        registry.clear();
        assert!(registry.is_empty());
        assert!(!registry.contains("a"));
    }
}
