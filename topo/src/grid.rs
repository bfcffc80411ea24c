//! Regularly spaced elevation grids extracted from a tile store.

use crate::{math::linspace, Region, TileStore, TopoError};
use geo::geometry::Coord;
use log::debug;

/// Row-major raster of elevation values over a [`Region`].
///
/// Row 0 is the southern edge; column 0 is the western edge. The
/// stored region is snapped to the sampled extent, so the last
/// row/column sits exactly on `region.north`/`region.east`.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    region: Region,
    rows: usize,
    cols: usize,
    values: Vec<f64>,
}

impl Grid {
    /// Builds a grid from existing values; row-major, south row first.
    ///
    /// Panics if the shape doesn't match `values.len()` or either
    /// dimension is below 2.
    pub fn new(region: Region, rows: usize, cols: usize, values: Vec<f64>) -> Self {
        assert!(rows >= 2 && cols >= 2);
        assert_eq!(rows * cols, values.len());
        Self {
            region,
            rows,
            cols,
            values,
        }
    }

    /// Samples the store every `step_arcsec` arcseconds across
    /// `region`.
    pub fn from_store(
        store: &TileStore,
        region: Region,
        step_arcsec: f64,
    ) -> Result<Self, TopoError> {
        let step_deg = step_arcsec / 3600.0;
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let rows = (region.height() / step_deg).round() as usize + 1;
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let cols = (region.width() / step_deg).round() as usize + 1;
        if rows < 2 || cols < 2 {
            return Err(TopoError::Region(format!(
                "region smaller than one {step_arcsec}\" step"
            )));
        }

        // Snap the extent to the sampled lattice.
        let region = Region::new(
            region.west,
            region.west + (cols - 1) as f64 * step_deg,
            region.south,
            region.south + (rows - 1) as f64 * step_deg,
        )?;

        let now = std::time::Instant::now();
        let mut values = Vec::with_capacity(rows * cols);
        for lat in linspace(region.south, region.north, rows) {
            for lon in linspace(region.west, region.east, cols) {
                let elevation = store.elevation(Coord { x: lon, y: lat })?;
                values.push(f64::from(elevation));
            }
        }
        debug!(
            "grid; {rows}x{cols} @ {step_arcsec}\", exec: {:?}",
            now.elapsed()
        );

        Ok(Self {
            region,
            rows,
            cols,
            values,
        })
    }

    pub fn region(&self) -> Region {
        self.region
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Degrees of longitude between adjacent columns.
    pub fn lon_step(&self) -> f64 {
        self.region.width() / (self.cols - 1) as f64
    }

    /// Degrees of latitude between adjacent rows.
    pub fn lat_step(&self) -> f64 {
        self.region.height() / (self.rows - 1) as f64
    }

    pub fn value(&self, row: usize, col: usize) -> f64 {
        self.values[row * self.cols + col]
    }

    /// Geographic center of the sample at (row, col).
    pub fn coord(&self, row: usize, col: usize) -> Coord<f64> {
        Coord {
            x: self.region.west + col as f64 * self.lon_step(),
            y: self.region.south + row as f64 * self.lat_step(),
        }
    }

    /// Value of the sample nearest `coord`, or `None` outside the
    /// grid.
    pub fn value_at(&self, coord: Coord<f64>) -> Option<f64> {
        if !self.region.contains(coord) {
            return None;
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let col = (((coord.x - self.region.west) / self.lon_step()).round() as usize)
            .min(self.cols - 1);
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let row = (((coord.y - self.region.south) / self.lat_step()).round() as usize)
            .min(self.rows - 1);
        Some(self.value(row, col))
    }

    pub fn min(&self) -> f64 {
        self.values.iter().copied().fold(f64::INFINITY, f64::min)
    }

    pub fn max(&self) -> f64 {
        self.values
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Returns the sub-grid clipped to `sub`, keeping only samples
    /// inside it.
    pub fn cut(&self, sub: Region) -> Result<Self, TopoError> {
        if !self.region.covers(&sub) {
            return Err(TopoError::Cut);
        }
        let lon_step = self.lon_step();
        let lat_step = self.lat_step();
        // First/last sample on or inside each cut edge. The epsilon
        // keeps edges that land exactly on the lattice.
        const EPS: f64 = 1e-9;
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let col0 = (((sub.west - self.region.west) / lon_step) - EPS).ceil().max(0.0) as usize;
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let col1 = ((((sub.east - self.region.west) / lon_step) + EPS).floor() as usize)
            .min(self.cols - 1);
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let row0 = (((sub.south - self.region.south) / lat_step) - EPS).ceil().max(0.0) as usize;
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let row1 = ((((sub.north - self.region.south) / lat_step) + EPS).floor() as usize)
            .min(self.rows - 1);

        if col1 <= col0 || row1 <= row0 {
            return Err(TopoError::Cut);
        }

        let mut values = Vec::with_capacity((row1 - row0 + 1) * (col1 - col0 + 1));
        for row in row0..=row1 {
            for col in col0..=col1 {
                values.push(self.value(row, col));
            }
        }

        let region = Region::new(
            self.region.west + col0 as f64 * lon_step,
            self.region.west + col1 as f64 * lon_step,
            self.region.south + row0 as f64 * lat_step,
            self.region.south + row1 as f64 * lat_step,
        )?;

        Ok(Self {
            region,
            rows: row1 - row0 + 1,
            cols: col1 - col0 + 1,
            values,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{Coord, Grid, Region};

    fn ramp_grid() -> Grid {
        // 5x5 grid over 1°x1°, value = row * 10 + col.
        let region: Region = "38/39/7/8".parse().unwrap();
        let values = (0..25).map(|i| f64::from(i / 5 * 10 + i % 5)).collect();
        Grid::new(region, 5, 5, values)
    }

    #[test]
    fn test_steps_and_coords() {
        let grid = ramp_grid();
        assert_eq!(grid.lon_step(), 0.25);
        assert_eq!(grid.lat_step(), 0.25);
        assert_eq!(grid.coord(0, 0), Coord { x: 38.0, y: 7.0 });
        assert_eq!(grid.coord(4, 4), Coord { x: 39.0, y: 8.0 });
    }

    #[test]
    fn test_min_max() {
        let grid = ramp_grid();
        assert_eq!(grid.min(), 0.0);
        assert_eq!(grid.max(), 44.0);
    }

    #[test]
    fn test_value_at_nearest() {
        let grid = ramp_grid();
        assert_eq!(grid.value_at(Coord { x: 38.0, y: 7.0 }), Some(0.0));
        assert_eq!(grid.value_at(Coord { x: 39.0, y: 8.0 }), Some(44.0));
        // Nearest to (row 2, col 1).
        assert_eq!(grid.value_at(Coord { x: 38.26, y: 7.51 }), Some(21.0));
        assert_eq!(grid.value_at(Coord { x: 40.0, y: 7.5 }), None);
    }

    #[test]
    fn test_cut_identity() {
        let grid = ramp_grid();
        let cut = grid.cut(grid.region()).unwrap();
        assert_eq!(cut, grid);
    }

    #[test]
    fn test_cut_interior() {
        let grid = ramp_grid();
        let sub: Region = "38.25/38.75/7.25/7.75".parse().unwrap();
        let cut = grid.cut(sub).unwrap();
        assert_eq!(cut.rows(), 3);
        assert_eq!(cut.cols(), 3);
        assert_eq!(cut.value(0, 0), 11.0);
        assert_eq!(cut.value(2, 2), 33.0);
        assert_eq!(cut.region(), sub);
    }

    #[test]
    fn test_cut_outside_fails() {
        let grid = ramp_grid();
        let sub: Region = "37/39/7/8".parse().unwrap();
        assert!(grid.cut(sub).is_err());
    }
}
