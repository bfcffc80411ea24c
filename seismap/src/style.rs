//! Shared figure styling: fonts, symbol sizing, date labels.

use chrono::DateTime;

/// Raster output is treated as 96 dpi when converting symbol sizes.
pub const PX_PER_CM: f64 = 37.795;

pub const FONT: &str = "sans-serif";
pub const ANNOT_SIZE: u32 = 16;
pub const TITLE_SIZE: u32 = 22;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Symbol diameter in cm for a magnitude: `scale * 2^magnitude`.
///
/// Shared by the event markers and the legend rows so the two always
/// agree.
pub fn symbol_size_cm(scale: f64, magnitude: f64) -> f64 {
    scale * 2_f64.powf(magnitude)
}

/// Marker radius in whole pixels, never below 1.
pub fn symbol_radius_px(scale: f64, magnitude: f64) -> i32 {
    #[allow(clippy::cast_possible_truncation)]
    let radius = (symbol_size_cm(scale, magnitude) * PX_PER_CM / 2.0).round() as i32;
    radius.max(1)
}

/// `Apr 2021`-style label for a fractional-day date number.
pub fn day_label(day: f64) -> String {
    #[allow(clippy::cast_possible_truncation)]
    let seconds = (day * SECONDS_PER_DAY) as i64;
    DateTime::from_timestamp(seconds, 0)
        .map(|time| time.format("%b %Y").to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::{day_label, symbol_radius_px, symbol_size_cm};
    use approx::assert_relative_eq;

    #[test]
    fn test_symbol_size_doubles_per_magnitude() {
        assert_relative_eq!(symbol_size_cm(0.01, 3.0), 0.08);
        assert_relative_eq!(symbol_size_cm(0.01, 4.0), 0.16);
        assert_relative_eq!(symbol_size_cm(0.01, 7.0), 1.28);
    }

    #[test]
    fn test_symbol_radius_floor() {
        // A microquake still gets a visible marker.
        assert_eq!(symbol_radius_px(0.01, -2.0), 1);
        assert!(symbol_radius_px(0.1, 5.0) > symbol_radius_px(0.1, 4.0));
    }

    #[test]
    fn test_day_label() {
        // 2021-04-05 is day 18722 after the epoch.
        assert_eq!(day_label(18_722.0), "Apr 2021");
    }
}
