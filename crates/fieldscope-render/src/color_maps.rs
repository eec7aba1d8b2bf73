//! Color map system.

use std::collections::HashMap;

use fieldscope_core::color::Rgb8;
use fieldscope_core::{FieldscopeError, Result};

use crate::palettes;

/// Number of samples returned when a caller does not ask for a specific count.
pub const DEFAULT_NUM_COLORS: usize = 256;

/// A color map for mapping scalar values to colors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorMap {
    /// Color map name.
    pub name: String,
    /// Color samples (evenly spaced from 0 to 1).
    pub colors: Vec<Rgb8>,
}

impl ColorMap {
    /// Creates a new color map.
    pub fn new(name: impl Into<String>, colors: Vec<Rgb8>) -> Self {
        Self {
            name: name.into(),
            colors,
        }
    }

    /// Creates a color map from a packed `rrggbbrrggbb...` string.
    ///
    /// Returns `None` if the string is not a whole number of hex triplets.
    pub fn from_packed_hex(name: impl Into<String>, packed: &str) -> Option<Self> {
        if packed.len() % 6 != 0 || !packed.is_ascii() {
            return None;
        }
        let colors = (0..packed.len() / 6)
            .map(|i| {
                let s = &packed[6 * i..6 * i + 6];
                let c = u32::from_str_radix(s, 16).ok()?;
                Some([(c >> 16) as u8, (c >> 8) as u8, c as u8])
            })
            .collect::<Option<Vec<_>>>()?;
        Some(Self::new(name, colors))
    }

    /// Returns the number of table entries.
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Returns true if the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Returns `num_colors` evenly spaced samples of this map.
    ///
    /// A table with at least `num_colors` entries is returned unchanged. Shorter tables
    /// are interpolated linearly per channel (floored); both endpoints are kept exactly.
    pub fn samples(&self, num_colors: usize) -> Vec<Rgb8> {
        if self.colors.len() >= num_colors || self.colors.len() < 2 {
            return self.colors.clone();
        }
        let segments = self.colors.len() - 1;
        let steps = num_colors - 1;
        (0..num_colors)
            .map(|j| {
                let pos = j * segments;
                let (idx, rem) = (pos / steps, pos % steps);
                if rem == 0 {
                    return self.colors[idx];
                }
                let (a, b) = (self.colors[idx], self.colors[idx + 1]);
                let lerp = |k: usize| {
                    let (a, b) = (i64::from(a[k]), i64::from(b[k]));
                    let v = a + ((b - a) * rem as i64).div_euclid(steps as i64);
                    v as u8
                };
                [lerp(0), lerp(1), lerp(2)]
            })
            .collect()
    }

    /// Returns the table entry at `floor(t * (len - 1))`, `t` clamped to `[0, 1]`.
    pub fn color_at(&self, t: f64) -> Option<Rgb8> {
        let last = self.colors.len().checked_sub(1)?;
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let idx = ((t * last as f64).floor() as usize).min(last);
        Some(self.colors[idx])
    }
}

/// Registry for managing color maps.
#[derive(Debug, Clone, Default)]
pub struct ColorMapRegistry {
    color_maps: HashMap<String, ColorMap>,
}

impl ColorMapRegistry {
    /// Creates a new color map registry with the built-in palettes.
    pub fn new() -> Self {
        let mut registry = Self::default();
        registry.register_defaults();
        registry
    }

    fn register_defaults(&mut self) {
        for (name, packed) in palettes::BUILTIN {
            match ColorMap::from_packed_hex(*name, packed) {
                Some(map) => self.register(map),
                None => log::error!("built-in color map '{name}' is not valid hex"),
            }
        }
    }

    /// Registers a color map, replacing any map with the same name.
    pub fn register(&mut self, color_map: ColorMap) {
        self.color_maps.insert(color_map.name.clone(), color_map);
    }

    /// Gets a color map by name.
    pub fn get(&self, name: &str) -> Option<&ColorMap> {
        self.color_maps.get(name)
    }

    /// Gets a color map by name, failing with [`FieldscopeError::UnknownColorMap`].
    pub fn require(&self, name: &str) -> Result<&ColorMap> {
        self.get(name)
            .ok_or_else(|| FieldscopeError::UnknownColorMap(name.to_string()))
    }

    /// Returns `num_colors` samples of the named map.
    pub fn colormap(&self, name: &str, num_colors: usize) -> Result<Vec<Rgb8>> {
        Ok(self.require(name)?.samples(num_colors))
    }

    /// Returns all color map names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.color_maps.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
