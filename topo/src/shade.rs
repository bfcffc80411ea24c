//! Gradient illumination of elevation grids.

use crate::Grid;

/// Meters per degree of latitude (and of longitude at the equator).
const METERS_PER_DEG: f64 = 111_320.0;

/// Illuminates `grid` from a light at `azimuth_deg` (clockwise from
/// north) and `altitude_deg` above the horizon, defaults 270/30 in the
/// callers.
///
/// Returns a grid of the same shape with values in [-1, 1]: the cosine
/// between the surface normal and the light direction. Facets turned
/// away from the light go negative.
pub fn hillshade(grid: &Grid, azimuth_deg: f64, altitude_deg: f64) -> Grid {
    let azimuth = azimuth_deg.to_radians();
    let altitude = altitude_deg.to_radians();

    // Light direction, east/north/up components.
    let lx = altitude.cos() * azimuth.sin();
    let ly = altitude.cos() * azimuth.cos();
    let lz = altitude.sin();

    let center_lat = grid.region().center().y;
    let dx_m = grid.lon_step() * METERS_PER_DEG * center_lat.to_radians().cos();
    let dy_m = grid.lat_step() * METERS_PER_DEG;

    let rows = grid.rows();
    let cols = grid.cols();
    let mut values = Vec::with_capacity(rows * cols);
    for row in 0..rows {
        for col in 0..cols {
            // Central differences with edge rows/columns replicated.
            let east = grid.value(row, col.min(cols - 2) + 1);
            let west = grid.value(row, col.max(1) - 1);
            let north = grid.value(row.min(rows - 2) + 1, col);
            let south = grid.value(row.max(1) - 1, col);

            let dzdx = (east - west) / (2.0 * dx_m);
            let dzdy = (north - south) / (2.0 * dy_m);

            // Normalized surface normal dotted with the light.
            let norm = (1.0 + dzdx * dzdx + dzdy * dzdy).sqrt();
            values.push((-dzdx * lx - dzdy * ly + lz) / norm);
        }
    }

    Grid::new(grid.region(), rows, cols, values)
}

#[cfg(test)]
mod tests {
    use super::hillshade;
    use crate::{Grid, Region};
    use approx::assert_relative_eq;

    fn region() -> Region {
        "38/39/7/8".parse().unwrap()
    }

    #[test]
    fn test_flat_grid_shade_is_sin_altitude() {
        let grid = Grid::new(region(), 4, 4, vec![1500.0; 16]);
        let shade = hillshade(&grid, 270.0, 30.0);
        for row in 0..shade.rows() {
            for col in 0..shade.cols() {
                assert_relative_eq!(
                    shade.value(row, col),
                    30_f64.to_radians().sin(),
                    epsilon = 1e-12
                );
            }
        }
    }

    #[test]
    fn test_slope_facing_light_is_brighter() {
        // Elevation rising to the east, so the slope faces west.
        let mut values = Vec::new();
        for _row in 0..4 {
            for col in 0..4 {
                values.push(1500.0 + 500.0 * col as f64);
            }
        }
        let grid = Grid::new(region(), 4, 4, values);
        let lit_from_west = hillshade(&grid, 270.0, 30.0);
        let lit_from_east = hillshade(&grid, 90.0, 30.0);
        assert!(lit_from_west.value(1, 1) > lit_from_east.value(1, 1));
    }

    #[test]
    fn test_shade_in_range() {
        let values = (0..16).map(|i| f64::from(i * 100)).collect();
        let grid = Grid::new(region(), 4, 4, values);
        let shade = hillshade(&grid, 315.0, 45.0);
        for row in 0..4 {
            for col in 0..4 {
                let v = shade.value(row, col);
                assert!((-1.0..=1.0).contains(&v));
            }
        }
    }
}
