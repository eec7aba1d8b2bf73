//! Glyph attributes for vector samples.

use fieldscope_core::color::Rgb8;
use fieldscope_core::scene::magnitude_range;
use fieldscope_core::VectorData;
use fieldscope_render::GlyphAttributes;
use glam::Vec3;

/// Computes orientation, linear and log scale, and color for every sample.
///
/// Colors index `color_table` at `floor(norm * (len - 1))`, where `norm` places the
/// magnitude within the observed magnitude range. Without a table every glyph is
/// black. The result depends only on the inputs.
pub fn compute_vector_attributes(
    vectors: &VectorData,
    color_table: Option<&[Rgb8]>,
) -> GlyphAttributes {
    let n = vectors.num_samples();
    let magnitudes = &vectors.magnitudes[..n.min(vectors.magnitudes.len())];
    let [min, max] = magnitude_range(magnitudes);
    let table = color_table.filter(|t| !t.is_empty());

    let orientation = (0..n)
        .map(|i| {
            vectors.directions.get(3 * i..3 * i + 3).map_or(Vec3::ZERO, |d| {
                Vec3::new(d[0] as f32, d[1] as f32, d[2] as f32)
            })
        })
        .collect();

    let linear_scale = magnitudes
        .iter()
        .map(|&m| Vec3::new(m as f32, 1.0, 1.0))
        .collect();

    let log_scale = log_magnitudes(magnitudes, min, max)
        .into_iter()
        .map(|m| Vec3::new(m as f32, 1.0, 1.0))
        .collect();

    let colors = magnitudes
        .iter()
        .map(|&m| match table {
            Some(table) => {
                let norm = if max > min { (m - min) / (max - min) } else { 0.0 };
                let idx = (norm * (table.len() - 1) as f64).floor() as usize;
                table[idx.min(table.len() - 1)]
            }
            None => [0, 0, 0],
        })
        .collect();

    GlyphAttributes {
        orientation,
        linear_scale,
        log_scale,
        colors,
    }
}

/// Log-magnitudes remapped so their extremes land on `[min, max]`.
///
/// Non-positive magnitudes take the smallest positive magnitude before the log.
/// When the logs are all equal (or nothing is positive) every sample gets `min`.
fn log_magnitudes(magnitudes: &[f64], min: f64, max: f64) -> Vec<f64> {
    let floor = magnitudes
        .iter()
        .copied()
        .filter(|&m| m > 0.0)
        .fold(f64::INFINITY, f64::min);
    if !floor.is_finite() {
        return vec![min; magnitudes.len()];
    }
    let logs: Vec<f64> = magnitudes.iter().map(|&m| m.max(floor).ln()).collect();
    let [lo, hi] = magnitude_range(&logs);
    if hi <= lo {
        return vec![min; magnitudes.len()];
    }
    logs.iter()
        .map(|&l| min + (l - lo) * (max - min) / (hi - lo))
        .collect()
}
