//! SRTM/NASADEM elevation (`.hgt`) tiles.
//!
//! A tile is a square grid of big-endian `i16` elevation samples, one
//! degree on a side, named after the latitude/longitude of its
//! southwest corner (e.g. `N07E038.hgt`). Resolution is inferred from
//! the file length: 3601² samples for one-arcsecond tiles, 1201² for
//! three-arcsecond tiles.
//!
//! # References
//!
//! 1. [30-Meter SRTM Tile Downloader](https://dwtkns.com/srtm30m)
//! 1. [SRTM Collection User Guide](https://lpdaac.usgs.gov/documents/179/SRTM_User_Guide_V3.pdf)

mod error;

pub use crate::error::ReliefError;
use byteorder::{BigEndian as BE, ReadBytesExt};
use geo::geometry::{Coord, Rect};
use memmap2::Mmap;
use std::{
    fs::File,
    io::BufReader,
    mem::size_of,
    path::Path,
    sync::atomic::{AtomicI16, Ordering},
};

/// Floating point type used for all geographic coordinates.
pub type C = f64;

const ARCSEC_PER_DEG: C = 3600.0;

/// Tile sample spacing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// One arcsecond per sample, 3601×3601 samples.
    One,
    /// Three arcseconds per sample, 1201×1201 samples.
    Three,
}

impl Resolution {
    /// Samples along one side of a tile.
    pub fn side(self) -> usize {
        match self {
            Self::One => 3601,
            Self::Three => 1201,
        }
    }

    /// Arcseconds between adjacent samples.
    pub fn arcsec(self) -> u8 {
        match self {
            Self::One => 1,
            Self::Three => 3,
        }
    }

    fn samples_per_deg(self) -> C {
        ARCSEC_PER_DEG / C::from(self.arcsec())
    }
}

enum Store {
    /// All-zero tile standing in for a missing file (open water or a
    /// gap in coverage).
    Flat,
    InMem(Box<[i16]>),
    MemMap(Mmap),
}

impl Store {
    fn get(&self, index: usize) -> i16 {
        match self {
            Self::Flat => 0,
            Self::InMem(samples) => samples[index],
            Self::MemMap(raw) => {
                let start = index * size_of::<i16>();
                let end = start + size_of::<i16>();
                let bytes = &mut &raw.as_ref()[start..end];
                bytes.read_i16::<BE>().unwrap()
            }
        }
    }

    fn min(&self) -> i16 {
        match self {
            Self::Flat => 0,
            Self::InMem(samples) => samples.iter().min().copied().unwrap_or(0),
            Self::MemMap(raw) => (*raw)
                .chunks_exact(2)
                .map(|mut bytes| (&mut bytes).read_i16::<BE>().unwrap())
                .min()
                .unwrap_or(0),
        }
    }

    fn max(&self) -> i16 {
        match self {
            Self::Flat => 0,
            Self::InMem(samples) => samples.iter().max().copied().unwrap_or(0),
            Self::MemMap(raw) => (*raw)
                .chunks_exact(2)
                .map(|mut bytes| (&mut bytes).read_i16::<BE>().unwrap())
                .max()
                .unwrap_or(0),
        }
    }
}

pub struct Tile {
    /// Center of the southwest-most sample.
    sw_corner_center: Coord<C>,

    resolution: Resolution,

    /// Lowest sample, scanned on first request.
    min_elevation: AtomicI16,

    /// Highest sample, scanned on first request.
    max_elevation: AtomicI16,

    samples: Store,
}

impl Tile {
    /// Reads the tile at `path` into memory.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ReliefError> {
        let resolution = resolution_from_len(&path)?;
        let sw_corner_center = parse_sw_corner(&path)?;
        let side = resolution.side();

        let mut file = BufReader::new(File::open(path)?);
        let samples = {
            let mut samples = Vec::with_capacity(side * side);
            for _ in 0..(side * side) {
                samples.push(file.read_i16::<BE>()?);
            }
            Store::InMem(samples.into_boxed_slice())
        };

        Ok(Self::from_parts(sw_corner_center, resolution, samples))
    }

    /// Returns a tile backed by the memory-mapped file at `path`.
    pub fn memmap<P: AsRef<Path>>(path: P) -> Result<Self, ReliefError> {
        let resolution = resolution_from_len(&path)?;
        let sw_corner_center = parse_sw_corner(&path)?;

        let samples = {
            let file = File::open(path)?;
            let mmap = unsafe { Mmap::map(&file)? };
            Store::MemMap(mmap)
        };

        Ok(Self::from_parts(sw_corner_center, resolution, samples))
    }

    /// Returns an all-zero tile for `sw_corner`.
    ///
    /// Used in place of tiles with no file on disk.
    pub fn flat(sw_corner: Coord<i16>) -> Self {
        let sw_corner_center = Coord {
            x: C::from(sw_corner.x),
            y: C::from(sw_corner.y),
        };
        Self::from_parts(sw_corner_center, Resolution::Three, Store::Flat)
    }

    /// Builds an in-memory tile from raw samples in file order
    /// (north-to-south rows, west-to-east columns).
    ///
    /// `samples` length must be `resolution.side()²`.
    pub fn from_samples(
        sw_corner: Coord<i16>,
        resolution: Resolution,
        samples: Vec<i16>,
    ) -> Self {
        assert_eq!(samples.len(), resolution.side() * resolution.side());
        let sw_corner_center = Coord {
            x: C::from(sw_corner.x),
            y: C::from(sw_corner.y),
        };
        Self::from_parts(
            sw_corner_center,
            resolution,
            Store::InMem(samples.into_boxed_slice()),
        )
    }

    fn from_parts(sw_corner_center: Coord<C>, resolution: Resolution, samples: Store) -> Self {
        Self {
            sw_corner_center,
            resolution,
            min_elevation: i16::MAX.into(),
            max_elevation: i16::MAX.into(),
            samples,
        }
    }

    /// Returns the sample at the given geographic coordinate, or
    /// `None` if the coordinate falls outside this tile.
    pub fn sample(&self, coord: Coord<C>) -> Option<i16> {
        let (col, row) = self.coord_to_col_row(coord);
        let side = self.resolution.side() as isize;
        if 0 <= col && col < side && 0 <= row && row < side {
            #[allow(clippy::cast_sign_loss)]
            let index = self.linear_index(col as usize, row as usize);
            Some(self.samples.get(index))
        } else {
            None
        }
    }

    /// Returns the sample at the given geographic coordinate.
    ///
    /// Panics or returns garbage if the coordinate is not inside this
    /// tile; use [`Tile::sample`] when in doubt.
    pub fn sample_unchecked(&self, coord: Coord<C>) -> i16 {
        let (col, row) = self.coord_to_col_row(coord);
        #[allow(clippy::cast_sign_loss)]
        let index = self.linear_index(col as usize, row as usize);
        self.samples.get(index)
    }

    /// Returns the lowest sample in this tile.
    pub fn min_elevation(&self) -> i16 {
        let mut min_elevation = self.min_elevation.load(Ordering::Relaxed);
        if min_elevation == i16::MAX {
            min_elevation = self.samples.min();
            self.min_elevation.store(min_elevation, Ordering::SeqCst);
        }
        min_elevation
    }

    /// Returns the highest sample in this tile.
    pub fn max_elevation(&self) -> i16 {
        let mut max_elevation = self.max_elevation.load(Ordering::Relaxed);
        if max_elevation == i16::MAX {
            max_elevation = self.samples.max();
            self.max_elevation.store(max_elevation, Ordering::SeqCst);
        }
        max_elevation
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    /// Geographic extent, sample center to sample center.
    pub fn bounds(&self) -> Rect<C> {
        let ne_corner_center = Coord {
            x: self.sw_corner_center.x + 1.0,
            y: self.sw_corner_center.y + 1.0,
        };
        Rect::new(self.sw_corner_center, ne_corner_center)
    }
}

/// Private API.
impl Tile {
    /// Column from the west edge, row from the south edge, of the
    /// sample nearest `coord`.
    fn coord_to_col_row(&self, coord: Coord<C>) -> (isize, isize) {
        let per_deg = self.resolution.samples_per_deg();
        #[allow(clippy::cast_possible_truncation)]
        let col = ((coord.x - self.sw_corner_center.x) * per_deg + 0.5).floor() as isize;
        #[allow(clippy::cast_possible_truncation)]
        let row = ((coord.y - self.sw_corner_center.y) * per_deg + 0.5).floor() as isize;
        (col, row)
    }

    /// File order is north-to-south, so the southern-most row is the
    /// last row of samples.
    fn linear_index(&self, col: usize, row_from_south: usize) -> usize {
        let side = self.resolution.side();
        side * (side - 1 - row_from_south) + col
    }
}

fn resolution_from_len<P: AsRef<Path>>(path: P) -> Result<Resolution, ReliefError> {
    const LEN_1_ARCSEC: u64 = 3601 * 3601 * size_of::<i16>() as u64;
    const LEN_3_ARCSEC: u64 = 1201 * 1201 * size_of::<i16>() as u64;
    match path.as_ref().metadata().map(|m| m.len())? {
        LEN_1_ARCSEC => Ok(Resolution::One),
        LEN_3_ARCSEC => Ok(Resolution::Three),
        invalid_len => Err(ReliefError::TileLen(
            invalid_len,
            path.as_ref().to_owned(),
        )),
    }
}

/// Parses `N07E038`-style file stems into the southwest corner.
fn parse_sw_corner<P: AsRef<Path>>(path: P) -> Result<Coord<C>, ReliefError> {
    let mk_err = || ReliefError::TileName(path.as_ref().to_owned());
    let stem = path
        .as_ref()
        .file_stem()
        .and_then(std::ffi::OsStr::to_str)
        .ok_or_else(mk_err)?;
    if stem.len() != 7 {
        return Err(mk_err());
    }
    let lat_sign = match &stem[0..1] {
        "N" => 1,
        "S" => -1,
        _ => return Err(mk_err()),
    };
    let lat = lat_sign * stem[1..3].parse::<i16>().map_err(|_| mk_err())?;
    let lon_sign = match &stem[3..4] {
        "E" => 1,
        "W" => -1,
        _ => return Err(mk_err()),
    };
    let lon = lon_sign * stem[4..7].parse::<i16>().map_err(|_| mk_err())?;
    Ok(Coord {
        x: C::from(lon),
        y: C::from(lat),
    })
}

#[cfg(test)]
mod tests {
    use super::{parse_sw_corner, Coord, Resolution, Tile};

    #[test]
    fn test_parse_sw_corner() {
        let corner = parse_sw_corner("N07E038.hgt").unwrap();
        assert_eq!(corner, Coord { x: 38.0, y: 7.0 });

        let corner = parse_sw_corner("S01W072.hgt").unwrap();
        assert_eq!(corner, Coord { x: -72.0, y: -1.0 });

        assert!(parse_sw_corner("X07E038.hgt").is_err());
        assert!(parse_sw_corner("N7E38.hgt").is_err());
    }

    #[test]
    fn test_flat_tile() {
        let tile = Tile::flat(Coord { x: 38, y: 7 });
        assert_eq!(tile.sample(Coord { x: 38.5, y: 7.5 }), Some(0));
        assert_eq!(tile.min_elevation(), 0);
        assert_eq!(tile.max_elevation(), 0);
    }

    #[test]
    fn test_sample_out_of_bounds() {
        let tile = Tile::flat(Coord { x: 38, y: 7 });
        // A smidge east, north, west, and south of the tile.
        assert_eq!(tile.sample(Coord { x: 39.1, y: 7.5 }), None);
        assert_eq!(tile.sample(Coord { x: 38.5, y: 8.1 }), None);
        assert_eq!(tile.sample(Coord { x: 37.9, y: 7.5 }), None);
        assert_eq!(tile.sample(Coord { x: 38.5, y: 6.9 }), None);
    }

    #[test]
    fn test_row_order_is_north_up() {
        let side = Resolution::Three.side();
        let mut samples = vec![0_i16; side * side];
        // Mark the first stored sample (NW corner) and the last (SE).
        samples[0] = 100;
        samples[side * side - 1] = -100;
        let tile = Tile::from_samples(Coord { x: 38, y: 7 }, Resolution::Three, samples);

        assert_eq!(tile.sample_unchecked(Coord { x: 38.0, y: 8.0 }), 100);
        assert_eq!(tile.sample_unchecked(Coord { x: 39.0, y: 7.0 }), -100);
        assert_eq!(tile.sample_unchecked(Coord { x: 38.0, y: 7.0 }), 0);
    }

    #[test]
    fn test_min_max_scan() {
        let side = Resolution::Three.side();
        let mut samples = vec![7_i16; side * side];
        samples[42] = -12;
        samples[43] = 2800;
        let tile = Tile::from_samples(Coord { x: 38, y: 7 }, Resolution::Three, samples);
        assert_eq!(tile.min_elevation(), -12);
        assert_eq!(tile.max_elevation(), 2800);
        // Second read hits the cache.
        assert_eq!(tile.min_elevation(), -12);
    }

    #[test]
    fn test_linear_index_round_trip() {
        let tile = Tile::flat(Coord { x: 38, y: 7 });
        let side = tile.resolution().side();
        for row in [0_usize, 1, side / 2, side - 1] {
            for col in [0_usize, 1, side / 2, side - 1] {
                let idx = tile.linear_index(col, row);
                assert_eq!(idx / side, side - 1 - row);
                assert_eq!(idx % side, col);
            }
        }
    }

    #[test]
    fn test_bounds() {
        let tile = Tile::flat(Coord { x: 38, y: 7 });
        let bounds = tile.bounds();
        assert_eq!(bounds.min(), Coord { x: 38.0, y: 7.0 });
        assert_eq!(bounds.max(), Coord { x: 39.0, y: 8.0 });
    }
}
