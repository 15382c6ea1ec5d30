use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Sequential colour scale for the chart's intensity encoding
// ---------------------------------------------------------------------------

const HUE: f32 = 212.0;
const LIGHTEST: f32 = 0.85;
const DARKEST: f32 = 0.30;

/// Maps a numeric range onto a light-to-dark blue ramp.
#[derive(Debug, Clone, Copy)]
pub struct IntensityScale {
    min: f64,
    max: f64,
    missing_color: Color32,
}

impl IntensityScale {
    pub fn new(range: Option<(f64, f64)>) -> Self {
        let (min, max) = range.unwrap_or((0.0, 0.0));
        IntensityScale {
            min,
            max,
            missing_color: Color32::GRAY,
        }
    }

    /// Colour for a value; missing values are grey. A degenerate range maps
    /// everything to the darkest shade.
    pub fn color_for(&self, value: Option<f64>) -> Color32 {
        let Some(v) = value else {
            return self.missing_color;
        };
        let span = self.max - self.min;
        let t = if span.abs() < f64::EPSILON {
            1.0
        } else {
            ((v - self.min) / span).clamp(0.0, 1.0) as f32
        };
        shade(t)
    }

    /// `(label, colour)` pairs at the range ends for the legend.
    pub fn legend_entries(&self) -> Vec<(String, Color32)> {
        vec![
            (format!("{}", self.min), self.color_for(Some(self.min))),
            (format!("{}", self.max), self.color_for(Some(self.max))),
        ]
    }
}

fn shade(t: f32) -> Color32 {
    let lightness = LIGHTEST + (DARKEST - LIGHTEST) * t;
    let hsl = Hsl::new(HUE, 0.70, lightness);
    let rgb: Srgb = hsl.into_color();
    Color32::from_rgb(
        (rgb.red * 255.0) as u8,
        (rgb.green * 255.0) as u8,
        (rgb.blue * 255.0) as u8,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn brightness(c: Color32) -> u32 {
        c.r() as u32 + c.g() as u32 + c.b() as u32
    }

    #[test]
    fn higher_values_are_darker() {
        let scale = IntensityScale::new(Some((10.0, 20.0)));
        let low = scale.color_for(Some(10.0));
        let high = scale.color_for(Some(20.0));
        assert!(brightness(high) < brightness(low));
    }

    #[test]
    fn missing_and_degenerate_ranges() {
        let scale = IntensityScale::new(Some((5.0, 5.0)));
        assert_eq!(scale.color_for(Some(5.0)), shade(1.0));
        assert_eq!(scale.color_for(None), Color32::GRAY);
        assert_eq!(IntensityScale::new(None).color_for(None), Color32::GRAY);
    }
}
