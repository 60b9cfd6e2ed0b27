use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, LinSrgb, Mix, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Accent used for single-series charts (dodger blue).
pub const ACCENT: Color32 = Color32::from_rgb(0x1E, 0x90, 0xFF);

/// Soft qualitative colours for categorical series.
const PASTEL: [Color32; 11] = [
    Color32::from_rgb(102, 197, 204),
    Color32::from_rgb(246, 207, 113),
    Color32::from_rgb(248, 156, 116),
    Color32::from_rgb(220, 176, 242),
    Color32::from_rgb(135, 197, 95),
    Color32::from_rgb(158, 185, 243),
    Color32::from_rgb(254, 136, 177),
    Color32::from_rgb(201, 219, 116),
    Color32::from_rgb(139, 224, 164),
    Color32::from_rgb(180, 151, 231),
    Color32::from_rgb(179, 179, 179),
];

/// Generates `n` visually distinct pastel colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.65, 0.75);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

/// `n` categorical colours: the fixed pastel set first, generated hues after.
pub fn qualitative_palette(n: usize) -> Vec<Color32> {
    let mut colors: Vec<Color32> = PASTEL.iter().copied().take(n).collect();
    if n > PASTEL.len() {
        colors.extend(generate_palette(n - PASTEL.len()));
    }
    colors
}

/// The i-th categorical colour, cycling through the pastel set.
pub fn series_color(i: usize) -> Color32 {
    PASTEL[i % PASTEL.len()]
}

// ---------------------------------------------------------------------------
// Diverging scale for correlation cells
// ---------------------------------------------------------------------------

const BLUE_END: (u8, u8, u8) = (5, 48, 97);
const MIDPOINT: (u8, u8, u8) = (247, 247, 247);
const RED_END: (u8, u8, u8) = (103, 0, 31);

fn linear((r, g, b): (u8, u8, u8)) -> LinSrgb {
    Srgb::new(r, g, b).into_format::<f32>().into_linear()
}

/// Blue (−1) through near-white (0) to red (+1).  Out-of-range input is
/// clamped; NaN maps to the midpoint.
pub fn diverging(value: f64) -> Color32 {
    let v = if value.is_nan() { 0.0 } else { value.clamp(-1.0, 1.0) } as f32;
    let mixed = if v < 0.0 {
        linear(MIDPOINT).mix(linear(BLUE_END), -v)
    } else {
        linear(MIDPOINT).mix(linear(RED_END), v)
    };
    let rgb: Srgb<u8> = Srgb::<f32>::from_linear(mixed).into_format();
    Color32::from_rgb(rgb.red, rgb.green, rgb.blue)
}

/// Dark or light text, whichever reads better on `fill`.
pub fn text_on(fill: Color32) -> Color32 {
    let luma = 0.299 * fill.r() as f32 + 0.587 * fill.g() as f32 + 0.114 * fill.b() as f32;
    if luma > 150.0 {
        Color32::BLACK
    } else {
        Color32::WHITE
    }
}

// ---------------------------------------------------------------------------
// Color mapping: category value → Color32
// ---------------------------------------------------------------------------

/// Maps the distinct values of a category to stable colours.
#[derive(Debug, Clone, Default)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
}

impl ColorMap {
    /// Build a colour map, assigning colours in the order given.
    pub fn new(values: &[String]) -> Self {
        let palette = qualitative_palette(values.len());
        let mapping = values
            .iter()
            .cloned()
            .zip(palette)
            .collect();
        ColorMap { mapping }
    }

    /// Look up the colour for a given value.
    pub fn color_for(&self, value: &str) -> Color32 {
        self.mapping.get(value).copied().unwrap_or(Color32::GRAY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_extends_past_fixed_set() {
        let colors = qualitative_palette(14);
        assert_eq!(colors.len(), 14);
        assert_eq!(colors[..11], PASTEL);
        assert_eq!(qualitative_palette(3), PASTEL[..3]);
        assert!(generate_palette(0).is_empty());
    }

    #[test]
    fn diverging_endpoints() {
        assert_eq!(diverging(-1.0), Color32::from_rgb(5, 48, 97));
        assert_eq!(diverging(0.0), Color32::from_rgb(247, 247, 247));
        assert_eq!(diverging(1.0), Color32::from_rgb(103, 0, 31));
        assert_eq!(diverging(7.0), diverging(1.0));
        assert_eq!(diverging(f64::NAN), diverging(0.0));
    }

    #[test]
    fn text_contrast() {
        assert_eq!(text_on(Color32::from_rgb(247, 247, 247)), Color32::BLACK);
        assert_eq!(text_on(Color32::from_rgb(5, 48, 97)), Color32::WHITE);
    }

    #[test]
    fn color_map_is_stable_and_defaults_to_gray() {
        let values = vec!["Positive".to_string(), "Negative".to_string()];
        let cm = ColorMap::new(&values);
        assert_eq!(cm.color_for("Positive"), PASTEL[0]);
        assert_eq!(cm.color_for("Negative"), PASTEL[1]);
        assert_eq!(cm.color_for("Unknown"), Color32::GRAY);
    }
}
