//! On-demand elevation tile cache.

use crate::TopoError;
use dashmap::DashMap;
use geo::geometry::Coord;
use log::debug;
use relief::{ReliefError, Tile};
use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::Arc,
};

/// Floating point type used for tile lookup.
pub type C = f64;

#[derive(Clone)]
pub struct TileStore {
    /// Directory containing `.hgt` tile files.
    tile_dir: PathBuf,

    /// How to load tiles (in-memory or mapped).
    tile_mode: TileMode,

    /// Tiles loaded on demand, keyed by SW corner.
    tiles: DashMap<Coord<i16>, Arc<Tile>>,
}

impl TileStore {
    pub fn new(tile_dir: PathBuf, tile_mode: TileMode) -> Result<Self, TopoError> {
        let mut has_height_files = false;

        // Fail early when tile_dir holds no `.hgt` file at all.
        for entry in std::fs::read_dir(&tile_dir)? {
            let path = entry?.path();
            if Some("hgt") == path.extension().and_then(std::ffi::OsStr::to_str) {
                has_height_files = true;
                break;
            }
        }

        if has_height_files {
            let tiles = DashMap::new();
            Ok(Self {
                tile_dir,
                tile_mode,
                tiles,
            })
        } else {
            Err(TopoError::Path(tile_dir))
        }
    }

    /// Returns the tile containing `coord`.
    ///
    /// The store fetches the tile from disk if it isn't already in
    /// memory; a coordinate with no tile file gets a flat (all-zero)
    /// tile.
    pub fn get(&self, coord: Coord<C>) -> Result<Arc<Tile>, TopoError> {
        let sw_corner = sw_corner(coord);
        self.tiles
            .entry(sw_corner)
            .or_try_insert_with(|| match self.load_tile(sw_corner) {
                Ok(tile) => Ok(Arc::new(tile)),
                Err(TopoError::Relief(ReliefError::Io(e))) if e.kind() == ErrorKind::NotFound => {
                    debug!("no tile file for {sw_corner:?}, using flat tile");
                    Ok(Arc::new(Tile::flat(sw_corner)))
                }
                Err(e) => Err(e),
            })
            .map(|r| r.clone())
    }

    /// Elevation at `coord`, via the containing tile.
    pub fn elevation(&self, coord: Coord<C>) -> Result<i16, TopoError> {
        let tile = self.get(coord)?;
        Ok(tile.sample_unchecked(coord))
    }
}

/// Private API.
impl TileStore {
    fn load_tile(&self, sw_corner: Coord<i16>) -> Result<Tile, TopoError> {
        let tile_path = {
            let file_name = file_name(sw_corner);
            let mut tile_path: PathBuf = [&self.tile_dir, Path::new(&file_name)].iter().collect();
            if !tile_path.exists() {
                let file_name = file_name.to_lowercase();
                tile_path = [&self.tile_dir, Path::new(&file_name)].iter().collect();
            }
            tile_path
        };
        debug!("loading {tile_path:?}");
        match self.tile_mode {
            TileMode::InMem => Ok(Tile::load(tile_path)?),
            TileMode::MemMap => Ok(Tile::memmap(tile_path)?),
        }
    }
}

/// How to hold tile samples.
///
/// The trade off between loading tile data into memory versus memory
/// mapping is not obvious, and you should measure both before
/// deciding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileMode {
    /// Parse tile and load into memory.
    ///
    /// Note that this can consume gigabytes of RAM when loading many
    /// tiles.
    InMem,

    /// Memory map file contents.
    MemMap,
}

/// Returns the southwest corner as integers for coord.
fn sw_corner(Coord { x, y }: Coord<C>) -> Coord<i16> {
    #[allow(clippy::cast_possible_truncation)]
    Coord {
        x: (x.floor() as i16),
        y: (y.floor() as i16),
    }
}

/// Returns the expected file name for coord.
fn file_name(Coord { x, y }: Coord<i16>) -> String {
    let (n_s, lat) = {
        let lat = y.abs();
        let n_s = if y.is_negative() { 'S' } else { 'N' };
        (n_s, lat)
    };
    let (e_w, lon) = {
        let lon = x.abs();
        let e_w = if x.is_negative() { 'W' } else { 'E' };
        (e_w, lon)
    };
    format!("{n_s}{lat:02}{e_w}{lon:03}.hgt")
}

#[cfg(test)]
mod tests {
    use super::{file_name, sw_corner, Coord};

    const CORBETTI: Coord = Coord { y: 7.18, x: 38.43 };

    #[test]
    fn test_file_name() {
        assert_eq!(file_name(sw_corner(CORBETTI)), "N07E038.hgt");

        let name = file_name(sw_corner(Coord {
            y: 0.0 + f64::EPSILON,
            x: 0.0 - f64::EPSILON,
        }));
        assert_eq!(name, "N00W001.hgt");

        let name = file_name(sw_corner(Coord {
            y: 0.0 - f64::EPSILON,
            x: 0.0 - f64::EPSILON,
        }));
        assert_eq!(name, "S01W001.hgt");

        let name = file_name(sw_corner(Coord {
            y: 0.0 - f64::EPSILON,
            x: 0.0 + f64::EPSILON,
        }));
        assert_eq!(name, "S01E000.hgt");
    }
}
