use eframe::egui::Color32;
use palette::{Mix, Srgb};

// ---------------------------------------------------------------------------
// Fixed chart colours
// ---------------------------------------------------------------------------

pub const BAR_FILL: Color32 = Color32::from_rgb(0x3a, 0x7c, 0xa5);
pub const HIGHLIGHT: Color32 = Color32::from_rgb(0x00, 0x23, 0x66);
pub const LINE_STROKE: Color32 = Color32::from_rgb(70, 130, 180);
pub const ERROR: Color32 = Color32::RED;

const HEAT_LOW: (u8, u8, u8) = (0xB9, 0xD9, 0xEB);
const HEAT_HIGH: (u8, u8, u8) = (0x00, 0x23, 0x66);

// ---------------------------------------------------------------------------
// Heat gradient: review count → Color32
// ---------------------------------------------------------------------------

fn srgb((r, g, b): (u8, u8, u8)) -> Srgb<f32> {
    Srgb::new(r, g, b).into_format()
}

/// Colour of `count` on a linear `[0, max]` scale from light to dark blue.
/// Counts above `max` saturate; `max == 0` is treated as 1.
pub fn heat_color(count: usize, max: usize) -> Color32 {
    let t = (count as f32 / max.max(1) as f32).clamp(0.0, 1.0);
    let mixed: Srgb<u8> = srgb(HEAT_LOW).mix(srgb(HEAT_HIGH), t).into_format();
    Color32::from_rgb(mixed.red, mixed.green, mixed.blue)
}

/// `steps` evenly spaced colours of the heat scale, for the legend.
pub fn heat_legend(max: usize, steps: usize) -> Vec<Color32> {
    if steps == 0 {
        return Vec::new();
    }
    let denom = steps.saturating_sub(1).max(1) as f32;
    (0..steps)
        .map(|i| {
            let count = (i as f32 / denom * max.max(1) as f32).round() as usize;
            heat_color(count, max)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heat_scale_spans_the_two_end_colours() {
        assert_eq!(heat_color(0, 10), Color32::from_rgb(0xB9, 0xD9, 0xEB));
        assert_eq!(heat_color(10, 10), HIGHLIGHT);
        assert_eq!(heat_color(25, 10), HIGHLIGHT);
        assert_eq!(heat_color(0, 0), Color32::from_rgb(0xB9, 0xD9, 0xEB));
    }

    #[test]
    fn legend_runs_light_to_dark() {
        let legend = heat_legend(4, 5);
        assert_eq!(legend.len(), 5);
        assert_eq!(legend[0], heat_color(0, 4));
        assert_eq!(legend[4], heat_color(4, 4));
        assert!(heat_legend(4, 0).is_empty());
    }
}
