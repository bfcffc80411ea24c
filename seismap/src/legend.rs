//! Magnitude legend specification files.
//!
//! Line-oriented format consumed by the figure legend box: an
//! `N <count>` header, then one
//! `S <dx>c c <size>c <fill> <pen> <offset>c <label>` row per
//! magnitude, where `<size>` is the symbol diameter in cm.

use crate::style;
use anyhow::{anyhow, Context, Error as AnyError};
use plotters::{
    coord::Shift,
    drawing::DrawingAreaErrorKind,
    element::{Circle, Text},
    prelude::{DrawingArea, DrawingBackend, IntoFont, BLACK},
    style::Color,
};
use std::{fmt::Write as _, fs, path::Path};

#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    /// Symbol diameter in cm.
    pub size_cm: f64,
    pub label: String,
}

/// Renders the spec text for `magnitudes` at symbol `scale`.
///
/// One row per magnitude, size `scale * 2^magnitude`. The mapping is
/// deterministic, so re-emission always produces identical bytes.
pub fn spec_text(scale: f64, magnitudes: &[f64]) -> String {
    let mut text = String::new();
    let _ = writeln!(text, "N {}", magnitudes.len());
    for &magnitude in magnitudes {
        let size = style::symbol_size_cm(scale, magnitude);
        let _ = writeln!(text, "S 0.0c c {size}c black 0.5p 0.5c M{magnitude:.1}");
    }
    text
}

/// Writes the spec for `magnitudes` to `path`, replacing any previous
/// contents.
pub fn write_spec<P: AsRef<Path>>(
    path: P,
    scale: f64,
    magnitudes: &[f64],
) -> Result<(), AnyError> {
    fs::write(path.as_ref(), spec_text(scale, magnitudes))
        .with_context(|| format!("writing legend spec {:?}", path.as_ref()))?;
    Ok(())
}

/// Reads a legend spec back into entries.
pub fn read_spec<P: AsRef<Path>>(path: P) -> Result<Vec<LegendEntry>, AnyError> {
    let text = fs::read_to_string(path.as_ref())
        .with_context(|| format!("reading legend spec {:?}", path.as_ref()))?;
    parse_spec(&text).with_context(|| format!("parsing legend spec {:?}", path.as_ref()))
}

fn parse_spec(text: &str) -> Result<Vec<LegendEntry>, AnyError> {
    let mut lines = text.lines();
    let count: usize = lines
        .next()
        .and_then(|header| header.strip_prefix("N "))
        .and_then(|n| n.trim().parse().ok())
        .ok_or_else(|| anyhow!("missing N header"))?;

    let mut entries = Vec::with_capacity(count);
    for line in lines {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.is_empty() {
            continue;
        }
        if fields.len() != 8 || fields[0] != "S" {
            return Err(anyhow!("malformed row {line:?}"));
        }
        let size_cm = fields[3]
            .strip_suffix('c')
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| anyhow!("bad size in row {line:?}"))?;
        entries.push(LegendEntry {
            size_cm,
            label: fields[7].to_owned(),
        });
    }

    if entries.len() != count {
        return Err(anyhow!(
            "header says {count} rows, found {}",
            entries.len()
        ));
    }
    Ok(entries)
}

/// Draws the legend entries in one horizontal row across `area`.
pub fn draw<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    entries: &[LegendEntry],
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    if entries.is_empty() {
        return Ok(());
    }
    let (w, h) = area.dim_in_pixel();
    let slot = w as i32 / entries.len() as i32;
    let mid_y = h as i32 / 2;

    for (i, entry) in entries.iter().enumerate() {
        let x = slot * i as i32 + slot / 2;
        #[allow(clippy::cast_possible_truncation)]
        let radius = ((entry.size_cm * style::PX_PER_CM / 2.0).round() as i32).max(1);
        area.draw(&Circle::new((x, mid_y), radius, BLACK.stroke_width(1)))?;
        area.draw(&Text::new(
            entry.label.clone(),
            (x + radius + 6, mid_y - 8),
            (style::FONT, style::ANNOT_SIZE).into_font(),
        ))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{parse_spec, spec_text, write_spec};
    use approx::assert_relative_eq;

    const MAGS: [f64; 5] = [3.0, 4.0, 5.0, 6.0, 7.0];

    #[test]
    fn test_spec_text_rows() {
        let text = spec_text(0.01, &MAGS);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "N 5");
        assert_eq!(lines[1], "S 0.0c c 0.08c black 0.5p 0.5c M3.0");
        assert_eq!(lines[5], "S 0.0c c 1.28c black 0.5p 0.5c M7.0");
        assert_eq!(lines.len(), 6);
    }

    #[test]
    fn test_size_is_scale_times_two_to_the_magnitude() {
        let text = spec_text(0.02, &MAGS);
        let entries = parse_spec(&text).unwrap();
        for (entry, magnitude) in entries.iter().zip(MAGS) {
            assert_relative_eq!(entry.size_cm, 0.02 * 2_f64.powf(magnitude));
        }
    }

    #[test]
    fn test_round_trip() {
        let text = spec_text(0.01, &MAGS);
        let entries = parse_spec(&text).unwrap();
        assert_eq!(entries.len(), 5);
        assert_eq!(entries[0].label, "M3.0");
        assert_relative_eq!(entries[4].size_cm, 1.28);
    }

    #[test]
    fn test_rewrite_is_idempotent() {
        let mut path = std::env::temp_dir();
        path.push(format!("legend-{}.txt", std::process::id()));

        write_spec(&path, 0.01, &MAGS).unwrap();
        let first = std::fs::read(&path).unwrap();
        write_spec(&path, 0.01, &MAGS).unwrap();
        let second = std::fs::read(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(first, second);
    }

    #[test]
    fn test_header_mismatch_rejected() {
        assert!(parse_spec("N 2\nS 0.0c c 0.08c black 0.5p 0.5c M3.0\n").is_err());
        assert!(parse_spec("").is_err());
    }
}
