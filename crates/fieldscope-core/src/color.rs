//! Color helpers: hex codes, HSV conversion and contrast.

use glam::Vec3;

use crate::error::{FieldscopeError, Result};

/// An 8-bit RGB color.
pub type Rgb8 = [u8; 3];

/// Smallest per-channel difference for a mirrored hue to count as a highlight.
const MIN_HIGHLIGHT_DISTANCE: u8 = 64;

/// Parses a `#rrggbb` (or `rrggbb`) string into 8-bit RGB.
pub fn hex_to_rgb8(hex: &str) -> Result<Rgb8> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 || !digits.is_ascii() {
        return Err(FieldscopeError::InvalidColor(hex.to_string()));
    }
    let channel = |i: usize| {
        u8::from_str_radix(&digits[i..i + 2], 16)
            .map_err(|_| FieldscopeError::InvalidColor(hex.to_string()))
    };
    Ok([channel(0)?, channel(2)?, channel(4)?])
}

/// Formats 8-bit RGB as `#rrggbb`.
pub fn rgb8_to_hex(rgb: Rgb8) -> String {
    format!("#{:02x}{:02x}{:02x}", rgb[0], rgb[1], rgb[2])
}

/// Converts 8-bit RGB to normalized RGB.
pub fn rgb8_to_float(rgb: Rgb8) -> Vec3 {
    Vec3::new(f32::from(rgb[0]), f32::from(rgb[1]), f32::from(rgb[2])) / 255.0
}

/// Converts normalized RGB to HSV, all components in `[0, 1]`.
pub fn rgb_to_hsv(c: Vec3) -> Vec3 {
    let max = c.max_element();
    let min = c.min_element();
    let delta = max - min;
    let s = if max > 0.0 { delta / max } else { 0.0 };
    let h = if delta <= 0.0 {
        0.0
    } else if max == c.x {
        (c.y - c.z) / delta / 6.0
    } else if max == c.y {
        (2.0 + (c.z - c.x) / delta) / 6.0
    } else {
        (4.0 + (c.x - c.y) / delta) / 6.0
    };
    Vec3::new(h.rem_euclid(1.0), s, max)
}

/// Converts HSV (all components in `[0, 1]`) to normalized RGB.
pub fn hsv_to_rgb(hsv: Vec3) -> Vec3 {
    let (h, s, v) = (hsv.x.rem_euclid(1.0) * 6.0, hsv.y, hsv.z);
    let sector = h.floor();
    let f = h - sector;
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));
    match sector as u32 {
        0 => Vec3::new(v, t, p),
        1 => Vec3::new(q, v, p),
        2 => Vec3::new(p, v, t),
        3 => Vec3::new(p, q, v),
        4 => Vec3::new(t, p, v),
        _ => Vec3::new(v, p, q),
    }
}

/// Returns the color with its hue mirrored (`h := 1 - h`).
pub fn complement_hue(rgb: Rgb8) -> Rgb8 {
    let mut hsv = rgb_to_hsv(rgb8_to_float(rgb));
    hsv.x = 1.0 - hsv.x;
    let c = hsv_to_rgb(hsv) * 255.0;
    [c.x.round() as u8, c.y.round() as u8, c.z.round() as u8]
}

/// Returns black or white, whichever reads better over `bg`.
pub fn fg_color_for_bg(bg: Rgb8) -> Rgb8 {
    let luma =
        f32::from(bg[0]) * 0.299 + f32::from(bg[1]) * 0.587 + f32::from(bg[2]) * 0.114;
    if luma > 186.0 {
        [0, 0, 0]
    } else {
        [255, 255, 255]
    }
}

/// Returns a color that stands out against `rgb`.
///
/// This is the hue complement, unless mirroring the hue barely moves the color
/// (reds, cyans and grays), in which case it is black or white.
pub fn contrasting_highlight(rgb: Rgb8) -> Rgb8 {
    let complement = complement_hue(rgb);
    let distance = rgb
        .iter()
        .zip(complement)
        .map(|(a, b)| a.abs_diff(b))
        .max()
        .unwrap_or(0);
    if distance < MIN_HIGHLIGHT_DISTANCE {
        fg_color_for_bg(rgb)
    } else {
        complement
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_round_trip() {
        assert_eq!(hex_to_rgb8("#ff8000").unwrap(), [255, 128, 0]);
        assert_eq!(hex_to_rgb8("00ff00").unwrap(), [0, 255, 0]);
        assert_eq!(rgb8_to_hex([255, 128, 0]), "#ff8000");
        assert!(hex_to_rgb8("#fff").is_err());
        assert!(hex_to_rgb8("#gg0000").is_err());
    }

    #[test]
    fn test_hsv_primaries() {
        let hsv = rgb_to_hsv(Vec3::new(0.0, 1.0, 0.0));
        assert!((hsv.x - 1.0 / 3.0).abs() < 1e-6);
        assert_eq!(hsv.y, 1.0);
        assert_eq!(hsv.z, 1.0);
        let rgb = hsv_to_rgb(hsv);
        assert!((rgb - Vec3::new(0.0, 1.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_complement_hue() {
        // hue 1/3 (green) mirrors to 2/3 (blue)
        assert_eq!(complement_hue([0, 255, 0]), [0, 0, 255]);
        // red has hue 0, which mirrors to 1 == 0
        assert_eq!(complement_hue([255, 0, 0]), [255, 0, 0]);
        // grays have no hue
        assert_eq!(complement_hue([128, 128, 128]), [128, 128, 128]);
    }

    #[test]
    fn test_fg_for_bg() {
        assert_eq!(fg_color_for_bg([255, 255, 255]), [0, 0, 0]);
        assert_eq!(fg_color_for_bg([0, 0, 64]), [255, 255, 255]);
    }

    #[test]
    fn test_contrasting_highlight() {
        assert_eq!(contrasting_highlight([0, 255, 0]), [0, 0, 255]);
        // hue 0 and 1/2 mirror onto themselves
        assert_eq!(contrasting_highlight([255, 0, 0]), [255, 255, 255]);
        assert_eq!(contrasting_highlight([0, 255, 255]), [255, 255, 255]);
        assert_eq!(contrasting_highlight([250, 0, 8]), [255, 255, 255]);
        assert_eq!(contrasting_highlight([127, 127, 127]), [255, 255, 255]);
        assert_eq!(contrasting_highlight([255, 255, 255]), [0, 0, 0]);
        assert_eq!(contrasting_highlight([0, 0, 0]), [255, 255, 255]);
    }
}
