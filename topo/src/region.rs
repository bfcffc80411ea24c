use crate::TopoError;
use geo::geometry::Coord;
use std::str::FromStr;

/// Rectangular geographic region, degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Region {
    pub west: f64,
    pub east: f64,
    pub south: f64,
    pub north: f64,
}

impl Region {
    pub fn new(west: f64, east: f64, south: f64, north: f64) -> Result<Self, TopoError> {
        if west < east && south < north {
            Ok(Self {
                west,
                east,
                south,
                north,
            })
        } else {
            Err(TopoError::Region(format!("{west}/{east}/{south}/{north}")))
        }
    }

    /// Longitude span in degrees.
    pub fn width(&self) -> f64 {
        self.east - self.west
    }

    /// Latitude span in degrees.
    pub fn height(&self) -> f64 {
        self.north - self.south
    }

    pub fn center(&self) -> Coord<f64> {
        Coord {
            x: (self.west + self.east) / 2.0,
            y: (self.south + self.north) / 2.0,
        }
    }

    pub fn contains(&self, coord: Coord<f64>) -> bool {
        self.west <= coord.x && coord.x <= self.east && self.south <= coord.y && coord.y <= self.north
    }

    /// Whether `other` lies entirely within `self`.
    pub fn covers(&self, other: &Region) -> bool {
        self.west <= other.west
            && other.east <= self.east
            && self.south <= other.south
            && other.north <= self.north
    }
}

impl FromStr for Region {
    type Err = TopoError;

    /// Parses GMT-style `west/east/south/north`.
    fn from_str(s: &str) -> Result<Self, TopoError> {
        let mk_err = || TopoError::Region(s.to_owned());
        let mut parts = s.split('/');
        let mut next = || {
            parts
                .next()
                .and_then(|p| f64::from_str(p.trim()).ok())
                .ok_or_else(mk_err)
        };
        let (west, east, south, north) = (next()?, next()?, next()?, next()?);
        if parts.next().is_some() {
            return Err(mk_err());
        }
        Region::new(west, east, south, north)
    }
}

#[cfg(test)]
mod tests {
    use super::{Coord, Region};

    #[test]
    fn test_parse() {
        let region: Region = "38.2/38.7/6.9/7.55".parse().unwrap();
        assert_eq!(
            region,
            Region {
                west: 38.2,
                east: 38.7,
                south: 6.9,
                north: 7.55
            }
        );
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!("38.2/38.7/6.9".parse::<Region>().is_err());
        assert!("38.2/38.7/6.9/7.55/1".parse::<Region>().is_err());
        assert!("a/b/c/d".parse::<Region>().is_err());
        // Inverted extents.
        assert!("38.7/38.2/6.9/7.55".parse::<Region>().is_err());
        assert!("38.2/38.7/7.55/6.9".parse::<Region>().is_err());
    }

    #[test]
    fn test_contains_and_covers() {
        let outer: Region = "32/48/2/18".parse().unwrap();
        let inner: Region = "38.2/38.7/6.9/7.55".parse().unwrap();
        assert!(outer.covers(&inner));
        assert!(!inner.covers(&outer));
        assert!(inner.contains(Coord { x: 38.35, y: 7.2 }));
        assert!(!inner.contains(Coord { x: 39.0, y: 7.2 }));
    }

    #[test]
    fn test_center() {
        let region: Region = "38.0/39.0/7.0/8.0".parse().unwrap();
        assert_eq!(region.center(), Coord { x: 38.5, y: 7.5 });
    }
}
