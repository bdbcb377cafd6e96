//! Metric scale bar.
//!
//! Picks a round distance (1, 2 or 5 times a power of ten) whose on-screen
//! length is at least `min_width` pixels, choosing μm, mm, m or km so the
//! number stays readable.

use serde::Serialize;

/// Default minimum bar width in pixels.
pub const DEFAULT_MIN_WIDTH: u32 = 64;

/// Default ground distance covered by one image pixel at resolution 1.
pub const DEFAULT_METERS_PER_PIXEL: f64 = 1.0;

const LEADING_DIGITS: [f64; 3] = [1.0, 2.0, 5.0];

/// Scale bar settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScaleLine {
    /// Minimum bar width in pixels
    pub min_width: u32,

    /// Meters per map unit
    pub meters_per_pixel: f64,
}

impl Default for ScaleLine {
    fn default() -> Self {
        Self {
            min_width: DEFAULT_MIN_WIDTH,
            meters_per_pixel: DEFAULT_METERS_PER_PIXEL,
        }
    }
}

/// A rendered scale bar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScaleBar {
    /// Bar length in screen pixels
    pub width_px: u32,

    /// Distance the bar stands for, in `unit`
    pub count: f64,

    pub unit: &'static str,

    /// Display text, e.g. "100 m"
    pub label: String,
}

impl ScaleLine {
    pub fn new(min_width: u32, meters_per_pixel: f64) -> Self {
        Self {
            min_width,
            meters_per_pixel,
        }
    }

    /// Scale bar for a view at `resolution` map units per screen pixel.
    ///
    /// Returns `None` when the resolution does not yield a finite bar.
    pub fn render(&self, resolution: f64) -> Option<ScaleBar> {
        let min_width = self.min_width.max(1) as f64;
        let mut point_resolution = resolution * self.meters_per_pixel;
        if !point_resolution.is_finite() || point_resolution <= 0.0 {
            return None;
        }

        let nominal = min_width * point_resolution;
        let unit = if nominal < 0.001 {
            point_resolution *= 1_000_000.0;
            "μm"
        } else if nominal < 1.0 {
            point_resolution *= 1_000.0;
            "mm"
        } else if nominal < 1_000.0 {
            "m"
        } else {
            point_resolution /= 1_000.0;
            "km"
        };

        let mut i = 3 * (min_width * point_resolution).log10().floor() as i32;
        loop {
            let decimals = i.div_euclid(3);
            let count = LEADING_DIGITS[i.rem_euclid(3) as usize] * 10f64.powi(decimals);
            let width = (count / point_resolution).round();
            if !width.is_finite() {
                return None;
            }
            if width >= min_width {
                let precision = (-decimals).max(0) as usize;
                return Some(ScaleBar {
                    width_px: width as u32,
                    count,
                    unit,
                    label: format!("{:.*} {}", precision, count, unit),
                });
            }
            i += 1;
        }
    }
}
