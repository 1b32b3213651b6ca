use eframe::egui::Color32;
use palette::{Darken, Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Hsl> {
    (0..n)
        .map(|i| Hsl::new((i as f32 / n as f32) * 360.0, 0.75, 0.55))
        .collect()
}

fn to_color32(hsl: Hsl) -> Color32 {
    let rgb: Srgb = hsl.into_color();
    Color32::from_rgb(
        (rgb.red * 255.0) as u8,
        (rgb.green * 255.0) as u8,
        (rgb.blue * 255.0) as u8,
    )
}

// ---------------------------------------------------------------------------
// Chart colours: one hue per numeric column
// ---------------------------------------------------------------------------

/// Bar fill and density line colour for a histogram.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeriesColors {
    pub bars: Color32,
    pub density: Color32,
}

/// Colours for the column at `index` among `n` choices, so each column keeps
/// its hue as the user switches between them.
pub fn series_colors(index: usize, n: usize) -> SeriesColors {
    let Some(hsl) = generate_palette(n.max(1)).get(index).copied() else {
        return SeriesColors {
            bars: Color32::LIGHT_BLUE,
            density: Color32::DARK_BLUE,
        };
    };
    SeriesColors {
        bars: to_color32(hsl).gamma_multiply(0.6),
        density: to_color32(hsl.darken(0.35)),
    }
}
