use crate::{math::linspace, TileStore, TopoError};
use geo::{
    algorithm::HaversineDistance,
    geometry::{Coord, Point},
};
use log::debug;

/// A straight-line path across a map with elevation sampled along it.
#[derive(Debug, Clone, PartialEq)]
pub struct Transect {
    /// Total distance from start to end in meters.
    pub length_m: f64,

    /// Evenly spaced steps from start to end.
    pub points: Vec<Coord<f64>>,

    /// Elevation at each step.
    pub elevation: Vec<i16>,
}

impl Transect {
    pub fn builder() -> TransectBuilder {
        TransectBuilder {
            start: None,
            end: None,
            points: None,
        }
    }

    /// The bare path: exactly `n` coordinate pairs interpolated
    /// linearly and independently in longitude and latitude.
    ///
    /// Cross-section transects are a few tens of kilometers at most,
    /// so no geodesic correction is applied.
    pub fn path(
        start: Coord<f64>,
        end: Coord<f64>,
        n: usize,
    ) -> Result<Vec<Coord<f64>>, TopoError> {
        if n < 2 {
            return Err(TopoError::Points(n));
        }
        Ok(linspace(start.x, end.x, n)
            .zip(linspace(start.y, end.y, n))
            .map(|(x, y)| Coord { x, y })
            .collect())
    }
}

pub struct TransectBuilder {
    start: Option<Coord<f64>>,

    end: Option<Coord<f64>>,

    /// Number of steps, endpoints included.
    points: Option<usize>,
}

impl TransectBuilder {
    pub fn start(mut self, coord: Coord<f64>) -> Self {
        self.start = Some(coord);
        self
    }

    pub fn end(mut self, coord: Coord<f64>) -> Self {
        self.end = Some(coord);
        self
    }

    pub fn points(mut self, n: usize) -> Self {
        self.points = Some(n);
        self
    }

    pub fn build(&self, store: &TileStore) -> Result<Transect, TopoError> {
        let (Some(start), Some(end), Some(n)) = (self.start, self.end, self.points) else {
            return Err(TopoError::Builder);
        };

        let points = Transect::path(start, end, n)?;
        let length_m = Point::from(start).haversine_distance(&Point::from(end));

        let now = std::time::Instant::now();
        let mut elevation = Vec::with_capacity(points.len());
        let mut tile = store.get(start)?;
        for point in &points {
            // Consecutive steps almost always share a tile, so try the
            // last one before going back to the store.
            if let Some(sample) = tile.sample(*point) {
                elevation.push(sample);
            } else {
                tile = store.get(*point)?;
                elevation.push(tile.sample_unchecked(*point));
            }
        }
        debug!(
            "transect; len: {}, length_m: {length_m:.0}, exec: {:?}",
            points.len(),
            now.elapsed()
        );

        Ok(Transect {
            length_m,
            points,
            elevation,
        })
    }
}

/// Elevation at each of `points`, the spot-height lookup used for
/// stations.
pub fn sample_points(store: &TileStore, points: &[Coord<f64>]) -> Result<Vec<i16>, TopoError> {
    points.iter().map(|&coord| store.elevation(coord)).collect()
}

#[cfg(test)]
mod tests {
    use super::{Coord, Transect};
    use approx::assert_relative_eq;

    const A: Coord = Coord { x: 38.3, y: 7.205 };
    const B: Coord = Coord { x: 38.5, y: 7.19 };

    #[test]
    fn test_path_count_and_endpoints() {
        let path = Transect::path(A, B, 100).unwrap();
        assert_eq!(path.len(), 100);
        assert_eq!(path[0], A);
        assert_eq!(path[99], B);
    }

    #[test]
    fn test_path_even_spacing() {
        let path = Transect::path(A, B, 50).unwrap();
        let dx = path[1].x - path[0].x;
        let dy = path[1].y - path[0].y;
        for pair in path.windows(2) {
            assert_relative_eq!(pair[1].x - pair[0].x, dx, epsilon = 1e-12);
            assert_relative_eq!(pair[1].y - pair[0].y, dy, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_path_two_points_is_endpoints() {
        let path = Transect::path(A, B, 2).unwrap();
        assert_eq!(path, vec![A, B]);
    }

    #[test]
    fn test_path_rejects_degenerate_counts() {
        assert!(Transect::path(A, B, 0).is_err());
        assert!(Transect::path(A, B, 1).is_err());
    }
}
