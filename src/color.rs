use eframe::egui::Color32;
use palette::{Clamp, Hsl, IntoColor, Lab, Mix, Srgb};

use crate::data::classify::Verdict;

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.65, 0.55);
            let rgb: Srgb = hsl.into_color();
            to_color32(rgb)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Diverging map for the correlation heatmap
// ---------------------------------------------------------------------------

const COOL: (u8, u8, u8) = (59, 76, 192);
const NEUTRAL: (u8, u8, u8) = (221, 221, 221);
const WARM: (u8, u8, u8) = (180, 4, 38);

fn lab(rgb: (u8, u8, u8)) -> Lab {
    Srgb::new(rgb.0, rgb.1, rgb.2).into_format::<f32>().into_color()
}

fn to_color32(rgb: Srgb) -> Color32 {
    let rgb: Srgb<u8> = rgb.into_format();
    Color32::from_rgb(rgb.red, rgb.green, rgb.blue)
}

/// Blue → grey → red for values in `[-1, 1]`, centred at zero. Values are
/// interpolated in Lab so the midpoint stays neutral.
pub fn diverging(value: f64) -> Color32 {
    let t = value.clamp(-1.0, 1.0) as f32;
    let mixed = if t < 0.0 {
        lab(NEUTRAL).mix(lab(COOL), -t)
    } else {
        lab(NEUTRAL).mix(lab(WARM), t)
    };
    let rgb: Srgb = mixed.into_color();
    to_color32(rgb.clamp())
}

/// Readable annotation colour on top of a heatmap cell.
pub fn text_on(fill: Color32) -> Color32 {
    let luma = 0.299 * fill.r() as f32 + 0.587 * fill.g() as f32 + 0.114 * fill.b() as f32;
    if luma > 140.0 {
        Color32::BLACK
    } else {
        Color32::WHITE
    }
}

pub fn verdict_color(verdict: Verdict) -> Color32 {
    match verdict {
        Verdict::Good => Color32::from_rgb(0, 128, 0),
        Verdict::NeedsImprovement => Color32::RED,
    }
}
