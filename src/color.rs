use std::collections::{BTreeMap, BTreeSet};

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, LinSrgb, Mix, Srgb};

// ---------------------------------------------------------------------------
// Color palette generators
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            to_color32(rgb)
        })
        .collect()
}

fn to_color32(rgb: Srgb) -> Color32 {
    let c: Srgb<u8> = rgb.into_format();
    Color32::from_rgb(c.red, c.green, c.blue)
}

/// Interpolate piecewise-linearly (in linear light) between colour stops.
fn ramp(stops: &[(u8, u8, u8)], t: f32) -> Color32 {
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.5 };
    let segments = (stops.len() - 1) as f32;
    let pos = t * segments;
    let i = (pos.floor() as usize).min(stops.len() - 2);
    let local = pos - i as f32;
    let lin = |(r, g, b): (u8, u8, u8)| -> LinSrgb {
        Srgb::new(r, g, b).into_format::<f32>().into_linear()
    };
    let mixed = lin(stops[i]).mix(lin(stops[i + 1]), local);
    to_color32(Srgb::from_linear(mixed))
}

const VIRIDIS: [(u8, u8, u8); 5] = [
    (68, 1, 84),
    (59, 82, 139),
    (33, 145, 140),
    (94, 201, 98),
    (253, 231, 37),
];

const COOLWARM: [(u8, u8, u8); 3] = [(59, 76, 192), (221, 221, 221), (180, 4, 38)];

/// `n` colours sampled evenly along the viridis ramp.
pub fn viridis(n: usize) -> Vec<Color32> {
    match n {
        0 => Vec::new(),
        1 => vec![ramp(&VIRIDIS, 0.0)],
        _ => (0..n)
            .map(|i| ramp(&VIRIDIS, i as f32 / (n - 1) as f32))
            .collect(),
    }
}

/// Diverging blue → grey → red scale for a value in `[-1, 1]`.
/// NaN maps to the neutral midpoint.
pub fn coolwarm(value: f64) -> Color32 {
    ramp(&COOLWARM, ((value + 1.0) / 2.0) as f32)
}

// ---------------------------------------------------------------------------
// Color mapping: category label → Color32
// ---------------------------------------------------------------------------

/// Maps the distinct labels of a categorical column to distinct colours.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl ColorMap {
    /// Assign colours from `scheme` to the distinct labels in sorted order.
    pub fn new<'a>(
        labels: impl IntoIterator<Item = &'a str>,
        scheme: fn(usize) -> Vec<Color32>,
    ) -> Self {
        let unique: BTreeSet<&str> = labels.into_iter().collect();
        let colors = scheme(unique.len());
        let mapping = unique
            .into_iter()
            .zip(colors)
            .map(|(label, c)| (label.to_string(), c))
            .collect();

        ColorMap {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    /// Look up the colour for a given label.
    pub fn color_for(&self, label: &str) -> Color32 {
        self.mapping
            .get(label)
            .copied()
            .unwrap_or(self.default_color)
    }

    /// Return the legend entries (label → colour) for the UI.
    pub fn legend_entries(&self) -> Vec<(String, Color32)> {
        self.mapping
            .iter()
            .map(|(v, c): (&String, &Color32)| (v.clone(), *c))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_map_is_stable_per_label() {
        let cm = ColorMap::new(["Rice", "Maize", "Rice"], viridis);
        let legend = cm.legend_entries();
        assert_eq!(legend.len(), 2);
        assert_eq!(legend[0].0, "Maize");
        assert_eq!(cm.color_for("Maize"), Color32::from_rgb(68, 1, 84));
        assert_eq!(cm.color_for("Rice"), Color32::from_rgb(253, 231, 37));
        assert_eq!(cm.color_for("Barley"), Color32::GRAY);
    }

    #[test]
    fn coolwarm_endpoints() {
        assert_eq!(coolwarm(-1.0), Color32::from_rgb(59, 76, 192));
        assert_eq!(coolwarm(1.0), Color32::from_rgb(180, 4, 38));
        assert_eq!(coolwarm(f64::NAN), coolwarm(0.0));
    }

    #[test]
    fn palettes_have_requested_length() {
        assert!(generate_palette(0).is_empty());
        assert_eq!(generate_palette(7).len(), 7);
        assert_eq!(viridis(1).len(), 1);
    }
}
