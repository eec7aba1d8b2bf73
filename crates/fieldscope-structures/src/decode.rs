//! Scene object to mesh buffer decoding.

use fieldscope_core::{FieldscopeError, GeometryData, GeometryKind, KindSet, Result, SceneObject};
use fieldscope_render::{KindLayout, MeshBuffers};

/// Decodes the requested kinds of `object` into flat buffers.
///
/// Kinds are appended in `lines, polygons, vectors` order, so line cells always own
/// the first color tuples. Every included kind is validated before anything is
/// built; on error no buffers are returned. Requested kinds that are absent or
/// have no vertices are skipped.
pub fn decode(object: &SceneObject, kinds: KindSet) -> Result<MeshBuffers> {
    let mut plan: Vec<(GeometryKind, &GeometryData)> = Vec::new();
    for kind in kinds.iter() {
        let Some(geometry) = object.geometry(kind).filter(|g| !g.vertices.is_empty()) else {
            log::debug!("no data for requested type {kind}");
            continue;
        };
        match (kind, object.vectors.as_ref()) {
            (GeometryKind::Vectors, Some(vectors)) => vectors.validate()?,
            _ => geometry.validate(kind)?,
        }
        plan.push((kind, geometry));
    }

    let total: usize = plan.iter().map(|(_, g)| g.num_vertices()).sum();
    if u32::try_from(total).is_err() {
        return Err(FieldscopeError::malformed(
            GeometryKind::Polygons,
            format!("{total} vertices exceed the index range"),
        ));
    }

    // colors are resolved up front so a bad color count fails before any allocation
    let colors = plan
        .iter()
        .filter(|(kind, _)| *kind != GeometryKind::Vectors)
        .map(|&(kind, geometry)| cell_colors(kind, geometry))
        .collect::<Result<Vec<_>>>()?;

    let mut buffers = MeshBuffers {
        positions: Vec::with_capacity(3 * total),
        cell_colors: colors.concat(),
        ..Default::default()
    };

    for (kind, geometry) in plan {
        let offset = buffers.num_points();
        buffers
            .positions
            .extend(geometry.vertices.iter().map(|&v| v as f32));

        let runs = connectivity(&geometry.lengths, offset as u32);
        let layout = KindLayout {
            cell_count: geometry.num_primitives(),
            vertex_offset: offset,
            vertex_count: geometry.num_vertices(),
        };
        match kind {
            GeometryKind::Lines => (buffers.lines, buffers.line_layout) = (runs, layout),
            GeometryKind::Polygons => (buffers.polygons, buffers.polygon_layout) = (runs, layout),
            GeometryKind::Vectors => (buffers.vectors, buffers.vector_layout) = (runs, layout),
        }
    }

    Ok(buffers)
}

/// Builds `[count, idx..]` runs over a fresh `0..N` index sequence shifted by
/// `offset`.
fn connectivity(lengths: &[u32], offset: u32) -> Vec<u32> {
    let mut runs = Vec::with_capacity(lengths.len() + lengths.iter().sum::<u32>() as usize);
    let mut next = offset;
    for &len in lengths {
        runs.push(len);
        runs.extend(next..next + len);
        next += len;
    }
    runs
}

/// Resolves one RGBA tuple per cell.
///
/// Colors may be given per cell or per vertex; per-vertex colors use each cell's
/// first vertex. With no colors every cell is opaque white.
fn cell_colors(kind: GeometryKind, geometry: &GeometryData) -> Result<Vec<u8>> {
    let cells = geometry.num_primitives();
    let given = geometry.colors.len() / 3;
    let to_byte = |c: f64| (255.0 * c).floor().clamp(0.0, 255.0) as u8;
    let rgba = |i: usize| {
        let c = &geometry.colors[3 * i..3 * i + 3];
        [to_byte(c[0]), to_byte(c[1]), to_byte(c[2]), 255]
    };

    if given == 0 {
        return Ok([255, 255, 255, 255].repeat(cells));
    }
    if given == cells {
        return Ok((0..cells).flat_map(rgba).collect());
    }
    if given == geometry.num_vertices() {
        let mut first = 0usize;
        let mut out = Vec::with_capacity(4 * cells);
        for &len in &geometry.lengths {
            out.extend(rgba(first));
            first += len as usize;
        }
        return Ok(out);
    }
    Err(FieldscopeError::malformed(
        kind,
        format!("{given} colors for {cells} cells and {} vertices", geometry.num_vertices()),
    ))
}
