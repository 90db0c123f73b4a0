use std::collections::{BTreeMap, BTreeSet};

use palette::{Hsl, IntoColor, LinSrgb, Mix, Srgb};

// ---------------------------------------------------------------------------
// Palette generators
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<String> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            to_hex(rgb)
        })
        .collect()
}

/// Dark navy end of the burn-zone ramp.
const THERMAL_LOW: Srgb<u8> = Srgb::new(3, 35, 51);
/// Pale yellow end of the burn-zone ramp.
const THERMAL_HIGH: Srgb<u8> = Srgb::new(232, 250, 91);

/// `n` colours stepping evenly from dark navy to pale yellow, mixed in
/// linear RGB. The first and last entries are the exact end points.
pub fn sequential_palette(n: usize) -> Vec<String> {
    let low: LinSrgb = THERMAL_LOW.into_format::<f32>().into_linear();
    let high: LinSrgb = THERMAL_HIGH.into_format::<f32>().into_linear();
    (0..n)
        .map(|i| {
            let t = if n > 1 { i as f32 / (n - 1) as f32 } else { 0.0 };
            to_hex(Srgb::from_linear(low.mix(high, t)))
        })
        .collect()
}

fn to_hex(rgb: Srgb) -> String {
    let c: Srgb<u8> = rgb.into_format();
    format!("#{:02x}{:02x}{:02x}", c.red, c.green, c.blue)
}

// ---------------------------------------------------------------------------
// Color mapping: gender → hex colour
// ---------------------------------------------------------------------------

/// Maps the distinct values of a grouping column to distinct colours.
///
/// Built from the whole table rather than a filtered subset, so a value keeps
/// its colour whatever the selection.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<String, String>,
    default_color: String,
}

impl ColorMap {
    /// Build a colour map from the sorted unique values of a column.
    pub fn new(unique_values: &BTreeSet<String>) -> Self {
        let palette = generate_palette(unique_values.len());
        let mapping = unique_values.iter().cloned().zip(palette).collect();

        ColorMap {
            mapping,
            default_color: "#a0a0a0".to_string(),
        }
    }

    /// Look up the colour for a given value.
    pub fn color_for(&self, value: &str) -> &str {
        self.mapping
            .get(value)
            .map(String::as_str)
            .unwrap_or(&self.default_color)
    }

    /// Return the legend entries (value → colour).
    pub fn legend_entries(&self) -> Vec<(String, String)> {
        self.mapping
            .iter()
            .map(|(v, c)| (v.clone(), c.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_sizes() {
        assert!(generate_palette(0).is_empty());
        assert_eq!(generate_palette(3).len(), 3);
        assert_eq!(sequential_palette(5).len(), 5);
    }

    #[test]
    fn hue_palette_is_distinct() {
        let p = generate_palette(4);
        let unique: BTreeSet<_> = p.iter().collect();
        assert_eq!(unique.len(), 4);
        assert!(p.iter().all(|c| c.len() == 7 && c.starts_with('#')));
    }

    #[test]
    fn sequential_palette_spans_the_ramp() {
        let p = sequential_palette(5);
        assert_eq!(p[0], "#032333");
        assert_eq!(p[4], "#e8fa5b");
        assert_eq!(p, sequential_palette(5));
    }

    #[test]
    fn colour_map_is_stable_and_has_fallback() {
        let genders: BTreeSet<String> = ["Male", "Female"].iter().map(|s| s.to_string()).collect();
        let map = ColorMap::new(&genders);
        assert_ne!(map.color_for("Male"), map.color_for("Female"));
        assert_eq!(map.color_for("Other"), "#a0a0a0");
        let legend = map.legend_entries();
        assert_eq!(legend[0].0, "Female");
        assert_eq!(legend.len(), 2);
    }
}
