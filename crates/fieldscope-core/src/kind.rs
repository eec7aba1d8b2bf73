//! Geometry and actor kinds.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The primitive groups a scene object can carry.
///
/// The declaration order is the decode order: lines, then polygons, then vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeometryKind {
    /// Line segment chains (wireframe edges).
    Lines,
    /// Polygon faces.
    Polygons,
    /// Vector samples rendered as glyphs.
    Vectors,
}

impl GeometryKind {
    /// All kinds, in decode order.
    pub const ALL: [GeometryKind; 3] = [Self::Lines, Self::Polygons, Self::Vectors];

    /// Returns the key used for this kind in a scene document.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lines => "lines",
            Self::Polygons => "polygons",
            Self::Vectors => "vectors",
        }
    }

    fn bit(self) -> u8 {
        match self {
            Self::Lines => 1,
            Self::Polygons => 2,
            Self::Vectors => 4,
        }
    }
}

impl fmt::Display for GeometryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A set of [`GeometryKind`]s to include when decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KindSet(u8);

impl KindSet {
    /// The empty set.
    pub const NONE: KindSet = KindSet(0);
    /// Lines and polygons: everything a surface actor renders.
    pub const SURFACE: KindSet = KindSet(1 | 2);
    /// Vector samples only.
    pub const VECTORS: KindSet = KindSet(4);
    /// Every kind.
    pub const ALL: KindSet = KindSet(1 | 2 | 4);

    /// Builds a set from individual kinds.
    pub fn of(kinds: &[GeometryKind]) -> Self {
        Self(kinds.iter().fold(0, |acc, k| acc | k.bit()))
    }

    /// Returns whether `kind` is in the set.
    pub fn contains(self, kind: GeometryKind) -> bool {
        self.0 & kind.bit() != 0
    }

    /// Returns the set with `kind` added.
    #[must_use]
    pub fn with(self, kind: GeometryKind) -> Self {
        Self(self.0 | kind.bit())
    }

    /// Returns whether the set is empty.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Iterates the contained kinds in decode order.
    pub fn iter(self) -> impl Iterator<Item = GeometryKind> {
        GeometryKind::ALL.into_iter().filter(move |k| self.contains(*k))
    }
}

impl Default for KindSet {
    fn default() -> Self {
        Self::ALL
    }
}

/// What an actor renders, which decides how picks on it are resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActorKind {
    /// Faces and their edges.
    Surface,
    /// Vector field glyphs.
    Vector,
}

impl ActorKind {
    /// Returns the prefix used when naming actors of this kind.
    pub fn prefix(self) -> &'static str {
        match self {
            Self::Surface => "geomSurface",
            Self::Vector => "vector",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_set_iterates_in_decode_order() {
        let set = KindSet::of(&[GeometryKind::Vectors, GeometryKind::Lines]);
        let kinds: Vec<_> = set.iter().collect();
        assert_eq!(kinds, vec![GeometryKind::Lines, GeometryKind::Vectors]);
        assert!(!set.contains(GeometryKind::Polygons));
    }

    #[test]
    fn test_default_is_all_kinds() {
        assert_eq!(KindSet::default(), KindSet::ALL);
        assert_eq!(KindSet::NONE.with(GeometryKind::Vectors), KindSet::VECTORS);
        assert!(KindSet::NONE.is_empty());
    }
}
