//! Field indicator readout for a picked vector sample.

use fieldscope_core::{FieldscopeError, ReadoutPrecision, Result};

/// What the indicator shows for one sample.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldReading {
    /// Euclidean norm of the field vector.
    pub magnitude: f64,
    /// Angle from `+z`, degrees.
    pub polar_angle: f64,
    /// Angle from `+x` in the `xy` plane, degrees.
    pub azimuth_angle: f64,
    /// Where the magnitude falls along the color-scale strip, `0..=1`.
    pub pointer_fraction: f64,
    pub formatted_text: String,
}

/// Rounds `value` to `places` decimal places: `round(v * 10^p) / 10^p`.
pub fn round_to_places(value: f64, places: i32) -> Result<f64> {
    if places < 0 {
        return Err(FieldscopeError::InvalidPrecision(places));
    }
    let scale = 10f64.powi(places);
    // + 0.0 folds -0.0 into 0.0
    Ok((value * scale).round() / scale + 0.0)
}

/// Computes the reading with the default precision.
pub fn compute_field_reading(
    point: [f64; 3],
    vector: [f64; 3],
    range_min: f64,
    range_max: f64,
    units: &str,
) -> Result<FieldReading> {
    compute_field_reading_with(
        point,
        vector,
        range_min,
        range_max,
        units,
        ReadoutPrecision::default(),
    )
}

/// Computes the reading, rounding the text to `precision`.
///
/// A zero vector has a polar angle of 90 degrees: the magnitude divisor falls back
/// to 1.
pub fn compute_field_reading_with(
    point: [f64; 3],
    vector: [f64; 3],
    range_min: f64,
    range_max: f64,
    units: &str,
    precision: ReadoutPrecision,
) -> Result<FieldReading> {
    let [x, y, z] = vector;
    let magnitude = x.hypot(y).hypot(z);
    let divisor = if magnitude == 0.0 { 1.0 } else { magnitude };
    let polar_angle = (z / divisor).clamp(-1.0, 1.0).acos().to_degrees();
    let azimuth_angle = y.atan2(x).to_degrees();

    let span = range_max - range_min;
    let span = if span == 0.0 { 1.0 } else { span };
    let pointer_fraction = ((magnitude - range_min).abs() / span).clamp(0.0, 1.0);
    let pointer_fraction = if pointer_fraction.is_nan() {
        0.0
    } else {
        pointer_fraction
    };

    let formatted_text = if magnitude.is_nan() {
        "--".to_string()
    } else {
        let coords = point
            .iter()
            .map(|&c| round_to_places(c, precision.coordinate).map(|c| c.to_string()))
            .collect::<Result<Vec<_>>>()?;
        format!(
            "{}{units}  θ {}°  φ {}°  at ({})",
            round_to_places(magnitude, precision.magnitude)?,
            round_to_places(polar_angle, precision.angle)?,
            round_to_places(azimuth_angle, precision.angle)?,
            coords.join(","),
        )
    };

    Ok(FieldReading {
        magnitude,
        polar_angle,
        azimuth_angle,
        pointer_fraction,
        formatted_text,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_vector() {
        let r = compute_field_reading([0.0; 3], [0.0; 3], 0.0, 1.0, "T").unwrap();
        assert_eq!(r.magnitude, 0.0);
        assert!((r.polar_angle - 90.0).abs() < 1e-9);
        assert_eq!(r.formatted_text, "0T  θ 90°  φ 0°  at (0,0,0)");
        assert_eq!(r.pointer_fraction, 0.0);
    }

    #[test]
    fn test_reading_angles_and_rounding() {
        let r = compute_field_reading([1.234, -0.001, 2.0], [0.0, 3.0, 4.0], 0.0, 10.0, "T")
            .unwrap();
        assert_eq!(r.magnitude, 5.0);
        assert!((r.polar_angle - 36.869_897_645).abs() < 1e-6);
        assert!((r.azimuth_angle - 90.0).abs() < 1e-9);
        assert_eq!(r.pointer_fraction, 0.5);
        assert_eq!(r.formatted_text, "5T  θ 36.87°  φ 90°  at (1.23,0,2)");
    }

    #[test]
    fn test_nan_magnitude() {
        let r = compute_field_reading([0.0; 3], [f64::NAN, 0.0, 0.0], 0.0, 1.0, "T").unwrap();
        assert_eq!(r.formatted_text, "--");
    }

    #[test]
    fn test_degenerate_range_and_clamp() {
        let r = compute_field_reading([0.0; 3], [0.0, 0.0, 2.0], 2.0, 2.0, "T").unwrap();
        assert_eq!(r.pointer_fraction, 0.0);
        let r = compute_field_reading([0.0; 3], [0.0, 0.0, 9.0], 0.0, 1.0, "T").unwrap();
        assert_eq!(r.pointer_fraction, 1.0);
    }

    #[test]
    fn test_round_to_places() {
        assert_eq!(round_to_places(1.23456, 2).unwrap(), 1.23);
        assert_eq!(round_to_places(2.5, 0).unwrap(), 3.0);
        assert_eq!(round_to_places(-0.0001, 2).unwrap().to_string(), "0");
        assert!(matches!(
            round_to_places(1.0, -1),
            Err(FieldscopeError::InvalidPrecision(-1))
        ));
    }

    #[test]
    fn test_negative_precision_fails_reading() {
        let precision = ReadoutPrecision {
            angle: -2,
            ..Default::default()
        };
        assert!(compute_field_reading_with([0.0; 3], [1.0, 0.0, 0.0], 0.0, 1.0, "T", precision)
            .is_err());
    }
}
