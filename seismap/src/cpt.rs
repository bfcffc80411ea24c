//! Colormaps: piecewise-linear RGB gradients over a scalar range.
//!
//! The built-in palettes cover what the figures need: `viridis` for
//! dates, `gray` for hillshade, `earth` for hypsometric tints.

use crate::style;
use plotters::{
    drawing::DrawingAreaErrorKind,
    element::{PathElement, Rectangle, Text},
    prelude::{DrawingArea, DrawingBackend, IntoFont, RGBColor, BLACK},
    style::Color,
};
use plotters::coord::Shift;

type Stop = (f64, (u8, u8, u8));

const VIRIDIS: &[Stop] = &[
    (0.0, (68, 1, 84)),
    (0.125, (71, 44, 122)),
    (0.25, (59, 81, 139)),
    (0.375, (44, 113, 142)),
    (0.5, (33, 144, 141)),
    (0.625, (39, 173, 129)),
    (0.75, (92, 200, 99)),
    (0.875, (170, 220, 50)),
    (1.0, (253, 231, 37)),
];

const GRAY: &[Stop] = &[(0.0, (0, 0, 0)), (1.0, (255, 255, 255))];

/// Hypsometric ramp: lowland green through upland browns to pale
/// summits.
const EARTH: &[Stop] = &[
    (0.0, (40, 94, 52)),
    (0.25, (112, 147, 80)),
    (0.5, (180, 170, 110)),
    (0.75, (146, 105, 70)),
    (0.9, (170, 150, 140)),
    (1.0, (245, 245, 245)),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Palette {
    Viridis,
    Gray,
    Earth,
}

impl Palette {
    fn stops(self) -> &'static [Stop] {
        match self {
            Self::Viridis => VIRIDIS,
            Self::Gray => GRAY,
            Self::Earth => EARTH,
        }
    }
}

/// A palette stretched over a data range.
#[derive(Debug, Clone, Copy)]
pub struct Cpt {
    stops: &'static [Stop],
    min: f64,
    max: f64,
}

impl Cpt {
    /// `min`/`max` bound the mapped range; out-of-range values clamp.
    pub fn new(palette: Palette, min: f64, max: f64) -> Self {
        Self {
            stops: palette.stops(),
            min,
            max: if max > min { max } else { min + 1.0 },
        }
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn color_at(&self, value: f64) -> RGBColor {
        let t = ((value - self.min) / (self.max - self.min)).clamp(0.0, 1.0);

        let mut lower = self.stops[0];
        for &upper in &self.stops[1..] {
            if t <= upper.0 {
                let span = upper.0 - lower.0;
                let f = if span > 0.0 { (t - lower.0) / span } else { 0.0 };
                return RGBColor(
                    lerp(lower.1 .0, upper.1 .0, f),
                    lerp(lower.1 .1, upper.1 .1, f),
                    lerp(lower.1 .2, upper.1 .2, f),
                );
            }
            lower = upper;
        }
        let (r, g, b) = self.stops[self.stops.len() - 1].1;
        RGBColor(r, g, b)
    }
}

fn lerp(a: u8, b: u8, f: f64) -> u8 {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let v = (f64::from(a) + (f64::from(b) - f64::from(a)) * f).round() as i32;
    v.clamp(0, 255) as u8
}

/// Draws a horizontal colorbar across the top of `area` with tick
/// marks, tick labels, and an optional axis label.
pub fn draw_colorbar<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    cpt: &Cpt,
    ticks: &[(f64, String)],
    label: Option<&str>,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    const BAR_H: i32 = 16;
    let (w, _h) = area.dim_in_pixel();
    #[allow(clippy::cast_possible_truncation)]
    let bar_w = (f64::from(w) * 0.8) as i32;
    let x0 = (w as i32 - bar_w) / 2;
    let y0 = 6;

    for px in 0..bar_w {
        let value = cpt.min + (cpt.max - cpt.min) * f64::from(px) / f64::from(bar_w - 1);
        area.draw(&Rectangle::new(
            [(x0 + px, y0), (x0 + px + 1, y0 + BAR_H)],
            cpt.color_at(value).filled(),
        ))?;
    }
    area.draw(&Rectangle::new(
        [(x0, y0), (x0 + bar_w, y0 + BAR_H)],
        BLACK.stroke_width(1),
    ))?;

    for (value, text) in ticks {
        let t = ((value - cpt.min) / (cpt.max - cpt.min)).clamp(0.0, 1.0);
        #[allow(clippy::cast_possible_truncation)]
        let x = x0 + (t * f64::from(bar_w - 1)) as i32;
        area.draw(&PathElement::new(
            vec![(x, y0 + BAR_H), (x, y0 + BAR_H + 5)],
            BLACK.stroke_width(1),
        ))?;
        area.draw(&Text::new(
            text.clone(),
            (x - 24, y0 + BAR_H + 8),
            (style::FONT, style::ANNOT_SIZE).into_font(),
        ))?;
    }

    if let Some(label) = label {
        area.draw(&Text::new(
            label.to_owned(),
            (x0, y0 + BAR_H + 30),
            (style::FONT, style::ANNOT_SIZE).into_font(),
        ))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{Cpt, Palette};
    use plotters::prelude::RGBColor;

    #[test]
    fn test_endpoints() {
        let cpt = Cpt::new(Palette::Viridis, 10.0, 20.0);
        assert_eq!(cpt.color_at(10.0), RGBColor(68, 1, 84));
        assert_eq!(cpt.color_at(20.0), RGBColor(253, 231, 37));
    }

    #[test]
    fn test_clamping() {
        let cpt = Cpt::new(Palette::Gray, 0.0, 1.0);
        assert_eq!(cpt.color_at(-5.0), cpt.color_at(0.0));
        assert_eq!(cpt.color_at(9.0), cpt.color_at(1.0));
    }

    #[test]
    fn test_gray_midpoint() {
        let cpt = Cpt::new(Palette::Gray, -1.5, 1.5);
        let RGBColor(r, g, b) = cpt.color_at(0.0);
        assert_eq!(r, g);
        assert_eq!(g, b);
        assert!((126..=129).contains(&r));
    }

    #[test]
    fn test_degenerate_range() {
        // A flat grid must not divide by zero.
        let cpt = Cpt::new(Palette::Earth, 1500.0, 1500.0);
        let _ = cpt.color_at(1500.0);
    }
}
