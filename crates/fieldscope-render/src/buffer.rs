//! Renderer-facing buffers.
//!
//! [`MeshBuffers`] holds one decoded scene object: a shared position buffer, one
//! connectivity buffer per primitive kind, and an RGBA byte per channel for each
//! line and polygon cell (lines first). Connectivity is stored as repeated
//! `[count, idx_0, .., idx_{count-1}]` runs.

use fieldscope_core::color::Rgb8;
use fieldscope_core::{GeometryKind, VectorScaling};
use glam::Vec3;

/// Bytes per cell in [`MeshBuffers::cell_colors`].
pub const COLOR_STRIDE: usize = 4;

/// Where one primitive kind landed in the shared buffers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KindLayout {
    /// Number of cells (connectivity runs) of this kind.
    pub cell_count: usize,
    /// Index of the kind's first vertex in the position buffer.
    pub vertex_offset: usize,
    /// Number of vertices the kind contributed.
    pub vertex_count: usize,
}

/// Flat vertex, connectivity and color buffers for one scene object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshBuffers {
    /// Vertex positions as `x, y, z` triplets.
    pub positions: Vec<f32>,
    /// Line connectivity runs.
    pub lines: Vec<u32>,
    /// Polygon connectivity runs.
    pub polygons: Vec<u32>,
    /// Vector connectivity runs; empty when the samples carried no lengths.
    pub vectors: Vec<u32>,
    /// RGBA bytes, one tuple per line cell then one per polygon cell.
    pub cell_colors: Vec<u8>,
    pub line_layout: KindLayout,
    pub polygon_layout: KindLayout,
    pub vector_layout: KindLayout,
}

impl MeshBuffers {
    /// Returns whether no vertices were decoded.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Returns the number of points in the position buffer.
    pub fn num_points(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn num_line_cells(&self) -> usize {
        self.line_layout.cell_count
    }

    pub fn num_polygon_cells(&self) -> usize {
        self.polygon_layout.cell_count
    }

    /// Returns the number of cells that own a color tuple.
    pub fn num_colored_cells(&self) -> usize {
        self.num_line_cells() + self.num_polygon_cells()
    }

    /// Returns the layout recorded for `kind`.
    pub fn layout(&self, kind: GeometryKind) -> KindLayout {
        match kind {
            GeometryKind::Lines => self.line_layout,
            GeometryKind::Polygons => self.polygon_layout,
            GeometryKind::Vectors => self.vector_layout,
        }
    }

    /// Returns the connectivity buffer of `kind`.
    pub fn connectivity(&self, kind: GeometryKind) -> &[u32] {
        match kind {
            GeometryKind::Lines => &self.lines,
            GeometryKind::Polygons => &self.polygons,
            GeometryKind::Vectors => &self.vectors,
        }
    }

    /// Returns the point at `index`.
    pub fn point(&self, index: usize) -> Option<Vec3> {
        let p = self.positions.get(3 * index..3 * index + 3)?;
        Some(Vec3::new(p[0], p[1], p[2]))
    }

    /// Iterates the point indices of each cell of `kind`, in order.
    pub fn cells(&self, kind: GeometryKind) -> CellRuns<'_> {
        CellRuns {
            data: self.connectivity(kind),
        }
    }

    /// Iterates the points of each cell of `kind`, in order.
    pub fn cell_points(&self, kind: GeometryKind) -> impl Iterator<Item = Vec<Vec3>> + '_ {
        self.cells(kind).map(move |run| {
            run.iter()
                .filter_map(|&i| self.point(i as usize))
                .collect()
        })
    }

    /// Byte offsets of every line cell's color tuple.
    pub fn line_color_offsets(&self) -> Vec<usize> {
        (0..self.num_line_cells()).map(|i| COLOR_STRIDE * i).collect()
    }

    /// Byte offsets of every polygon cell's color tuple.
    pub fn polygon_color_offsets(&self) -> Vec<usize> {
        let lines = self.num_line_cells();
        (0..self.num_polygon_cells())
            .map(|i| COLOR_STRIDE * (lines + i))
            .collect()
    }

    /// Returns the RGB of the colored cell at `cell_id` (lines first).
    pub fn cell_color(&self, cell_id: usize) -> Option<Rgb8> {
        let c = self
            .cell_colors
            .get(COLOR_STRIDE * cell_id..COLOR_STRIDE * cell_id + 3)?;
        Some([c[0], c[1], c[2]])
    }

    /// Position buffer as raw bytes for upload.
    pub fn position_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.positions)
    }

    /// Connectivity buffer of `kind` as raw bytes for upload.
    pub fn connectivity_bytes(&self, kind: GeometryKind) -> &[u8] {
        bytemuck::cast_slice(self.connectivity(kind))
    }

    /// Returns the axis-aligned bounds of every point, if there are any.
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let points: &[Vec3] = bytemuck::try_cast_slice(&self.positions).ok()?;
        let first = *points.first()?;
        Some(
            points
                .iter()
                .fold((first, first), |(min, max), &p| (min.min(p), max.max(p))),
        )
    }
}

/// Iterator over `[count, idx..]` connectivity runs.
///
/// A truncated trailing run ends the iteration.
#[derive(Debug, Clone)]
pub struct CellRuns<'a> {
    data: &'a [u32],
}

impl<'a> Iterator for CellRuns<'a> {
    type Item = &'a [u32];

    fn next(&mut self) -> Option<Self::Item> {
        let (&count, rest) = self.data.split_first()?;
        let count = count as usize;
        if rest.len() < count {
            self.data = &[];
            return None;
        }
        let (run, tail) = rest.split_at(count);
        self.data = tail;
        Some(run)
    }
}

/// Per-sample attributes of a vector glyph set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GlyphAttributes {
    /// Glyph direction per sample.
    pub orientation: Vec<Vec3>,
    /// `(magnitude, 1, 1)` per sample.
    pub linear_scale: Vec<Vec3>,
    /// `(remapped log magnitude, 1, 1)` per sample.
    pub log_scale: Vec<Vec3>,
    /// Glyph color per sample.
    pub colors: Vec<Rgb8>,
}

impl GlyphAttributes {
    /// Returns the number of samples.
    pub fn len(&self) -> usize {
        self.orientation.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orientation.is_empty()
    }

    /// Returns the per-sample scale array for `mode`; uniform scaling has none.
    pub fn scale(&self, mode: VectorScaling) -> Option<&[Vec3]> {
        match mode {
            VectorScaling::Uniform => None,
            VectorScaling::Linear => Some(&self.linear_scale),
            VectorScaling::Log => Some(&self.log_scale),
        }
    }

    /// Glyph colors flattened to `r, g, b` bytes.
    pub fn color_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.colors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_kinds() -> MeshBuffers {
        MeshBuffers {
            positions: vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 0.0, 2.0, -1.0, 3.0],
            lines: vec![2, 0, 1],
            polygons: vec![3, 1, 2, 3],
            vectors: vec![],
            cell_colors: vec![1, 2, 3, 255, 4, 5, 6, 255],
            line_layout: KindLayout {
                cell_count: 1,
                vertex_offset: 0,
                vertex_count: 2,
            },
            polygon_layout: KindLayout {
                cell_count: 1,
                vertex_offset: 2,
                vertex_count: 2,
            },
            vector_layout: KindLayout::default(),
        }
    }

    #[test]
    fn test_cell_runs() {
        let buffers = two_kinds();
        let runs: Vec<&[u32]> = buffers.cells(GeometryKind::Polygons).collect();
        assert_eq!(runs, vec![&[1u32, 2, 3][..]]);
        assert_eq!(buffers.cells(GeometryKind::Vectors).count(), 0);
    }

    #[test]
    fn test_truncated_run_stops() {
        let runs = CellRuns {
            data: &[2, 0, 1, 3, 4],
        };
        assert_eq!(runs.count(), 1);
    }

    #[test]
    fn test_color_offsets_and_lookup() {
        let buffers = two_kinds();
        assert_eq!(buffers.line_color_offsets(), vec![0]);
        assert_eq!(buffers.polygon_color_offsets(), vec![4]);
        assert_eq!(buffers.cell_color(1), Some([4, 5, 6]));
        assert_eq!(buffers.cell_color(2), None);
    }

    #[test]
    fn test_bounds_and_bytes() {
        let buffers = two_kinds();
        let (min, max) = buffers.bounds().unwrap();
        assert_eq!(min, Vec3::new(0.0, -1.0, 0.0));
        assert_eq!(max, Vec3::new(2.0, 1.0, 3.0));
        assert_eq!(buffers.position_bytes().len(), 48);
        assert_eq!(buffers.connectivity_bytes(GeometryKind::Lines).len(), 12);
        assert!(MeshBuffers::default().bounds().is_none());
    }

    #[test]
    fn test_cell_points() {
        let buffers = two_kinds();
        let cells: Vec<Vec<Vec3>> = buffers.cell_points(GeometryKind::Lines).collect();
        assert_eq!(cells, vec![vec![Vec3::ZERO, Vec3::X]]);
    }

    #[test]
    fn test_glyph_scale_selection() {
        let glyphs = GlyphAttributes {
            orientation: vec![Vec3::X],
            linear_scale: vec![Vec3::new(2.0, 1.0, 1.0)],
            log_scale: vec![Vec3::new(3.0, 1.0, 1.0)],
            colors: vec![[1, 2, 3]],
        };
        assert!(glyphs.scale(VectorScaling::Uniform).is_none());
        assert_eq!(glyphs.scale(VectorScaling::Log).unwrap()[0].x, 3.0);
        assert_eq!(glyphs.color_bytes(), &[1, 2, 3]);
    }
}
