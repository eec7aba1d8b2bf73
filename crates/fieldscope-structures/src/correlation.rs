//! Edge-to-face cell correlation.
//!
//! A line cell correlates with a polygon cell when its points equal the polygon's
//! closed point loop (the polygon's points followed by its first point), compared
//! exactly and in order. Picks that land on such an edge resolve to the face.

use std::collections::HashMap;

use fieldscope_core::GeometryKind;
use fieldscope_render::MeshBuffers;
use glam::Vec3;

/// Line cell index to polygon cell index, first match in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CellCorrelation {
    lines: HashMap<usize, usize>,
}

impl CellCorrelation {
    /// Builds the correlation of every line cell in `buffers`.
    pub fn build(buffers: &MeshBuffers) -> Self {
        let loops: Vec<Vec<Vec3>> = buffers
            .cell_points(GeometryKind::Polygons)
            .map(|mut points| {
                if let Some(&first) = points.first() {
                    points.push(first);
                }
                points
            })
            .collect();

        // candidates keyed by (length, first point), in document order
        let mut index: HashMap<(usize, [u32; 3]), Vec<usize>> = HashMap::new();
        for (poly, points) in loops.iter().enumerate() {
            if let Some(key) = loop_key(points) {
                index.entry(key).or_default().push(poly);
            }
        }

        let mut lines = HashMap::new();
        for (line, points) in buffers.cell_points(GeometryKind::Lines).enumerate() {
            let Some(key) = loop_key(&points) else {
                continue;
            };
            let hit = index
                .get(&key)
                .and_then(|candidates| candidates.iter().find(|&&p| loops[p] == points));
            if let Some(&poly) = hit {
                lines.insert(line, poly);
            }
        }

        Self { lines }
    }

    /// Returns the polygon cell correlated with `line`.
    pub fn polygon_for(&self, line: usize) -> Option<usize> {
        self.lines.get(&line).copied()
    }

    pub fn contains(&self, line: usize) -> bool {
        self.lines.contains_key(&line)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Iterates `(line, polygon)` pairs in line order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let mut pairs: Vec<(usize, usize)> = self.lines.iter().map(|(&l, &p)| (l, p)).collect();
        pairs.sort_unstable();
        pairs.into_iter()
    }
}

/// Hash key of a point loop. Loops that contain NaN never compare equal, so they
/// get no key; `-0.0` and `0.0` compare equal, so they share one.
fn loop_key(points: &[Vec3]) -> Option<(usize, [u32; 3])> {
    let first = *points.first()?;
    if points.iter().any(|p| p.is_nan()) {
        return None;
    }
    let first = first + Vec3::ZERO;
    Some((points.len(), first.to_array().map(f32::to_bits)))
}
