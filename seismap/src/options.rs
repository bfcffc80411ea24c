use anyhow::{anyhow, Error as AnyError};
use catalog::{read_local_catalog, read_usgs_csv, Event};
use clap::{Args, Parser, Subcommand};
use geo::geometry::Coord;
use std::{path::PathBuf, str::FromStr};
use topo::Region;

/// Render seismicity maps, shaded topography, hypocenter views, and
/// cross sections from local catalog and elevation files.
#[derive(Parser, Debug)]
#[command(name = "seismap")]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Regional seismicity map.
    Map(MapArgs),

    /// Shaded-relief topography map.
    Topo(TopoArgs),

    /// 3D hypocenter view.
    Hypo3d(Hypo3dArgs),

    /// Map with cross-section panels.
    Section(SectionArgs),

    /// Interpolate a transect and print its elevations.
    Transect(TransectArgs),

    /// Write a legend spec file for magnitude symbol sizes.
    Legend(LegendArgs),
}

/// Options shared by every figure that plots a catalog.
#[derive(Debug, Args)]
pub struct CatalogOpts {
    /// Earthquake catalog file.
    #[arg(long)]
    pub catalog: PathBuf,

    /// Catalog is tab separated with split date/time columns rather
    /// than USGS CSV.
    #[arg(long, default_value_t = false)]
    pub local_format: bool,

    /// Symbol diameter in cm at magnitude 0; a magnitude m event is
    /// drawn scale * 2^m cm wide.
    #[arg(long, default_value_t = 0.01)]
    pub scale: f64,
}

impl CatalogOpts {
    pub fn load(&self) -> Result<Vec<Event>, AnyError> {
        let events = if self.local_format {
            read_local_catalog(&self.catalog)?
        } else {
            read_usgs_csv(&self.catalog)?
        };
        Ok(events)
    }
}

#[derive(Debug, Args)]
pub struct MapArgs {
    /// Region "west/east/south/north" in degrees.
    #[arg(long)]
    pub region: Region,

    #[command(flatten)]
    pub catalog: CatalogOpts,

    /// Plate-boundary multisegment file.
    #[arg(long)]
    pub boundaries: Option<PathBuf>,

    /// Holocene volcano CSV.
    #[arg(long)]
    pub volcanoes: Option<PathBuf>,

    /// Station location CSV.
    #[arg(long)]
    pub stations: Option<PathBuf>,

    /// Legend spec file to draw beneath the map.
    #[arg(long)]
    pub legend_spec: Option<PathBuf>,

    /// Figure title.
    #[arg(long)]
    pub title: Option<String>,

    /// Distance scale bar length in km; 0 disables it.
    #[arg(long, default_value_t = 500.0)]
    pub scale_bar_km: f64,

    /// Output PNG path.
    #[arg(short, long)]
    pub out: PathBuf,

    /// Figure width in pixels; map height follows the region aspect.
    #[arg(long, default_value_t = 1100)]
    pub width: u32,
}

#[derive(Debug, Args)]
pub struct TopoArgs {
    /// Region "west/east/south/north" in degrees.
    #[arg(long)]
    pub region: Region,

    /// Directory containing .hgt elevation tiles.
    #[arg(short, long)]
    pub tile_dir: PathBuf,

    /// Grid sample spacing in arcseconds.
    #[arg(long, default_value_t = 180.0)]
    pub step_arcsec: f64,

    /// Light azimuth in degrees, clockwise from north.
    #[arg(long, default_value_t = 270.0)]
    pub azimuth: f64,

    /// Light altitude above the horizon in degrees.
    #[arg(long, default_value_t = 30.0)]
    pub altitude: f64,

    /// Figure title.
    #[arg(long)]
    pub title: Option<String>,

    /// Output PNG path.
    #[arg(short, long)]
    pub out: PathBuf,

    /// Figure width in pixels; map height follows the region aspect.
    #[arg(long, default_value_t = 1100)]
    pub width: u32,
}

#[derive(Debug, Args)]
pub struct Hypo3dArgs {
    /// Region "west/east/south/north" in degrees.
    #[arg(long)]
    pub region: Region,

    #[command(flatten)]
    pub catalog: CatalogOpts,

    /// Directory containing .hgt elevation tiles; no topographic
    /// surface is drawn without it.
    #[arg(short, long)]
    pub tile_dir: Option<PathBuf>,

    /// Station location CSV, plotted at sampled surface elevation.
    #[arg(long)]
    pub stations: Option<PathBuf>,

    /// Grid sample spacing in arcseconds for the surface.
    #[arg(long, default_value_t = 3.0)]
    pub step_arcsec: f64,

    /// Lower elevation bound in meters (hypocenter floor).
    #[arg(long, default_value_t = -23_000.0)]
    pub elev_min: f64,

    /// Upper elevation bound in meters.
    #[arg(long, default_value_t = 3000.0)]
    pub elev_max: f64,

    /// View azimuth in degrees, clockwise from north.
    #[arg(long, default_value_t = 260.0)]
    pub view_azimuth: f64,

    /// View elevation above the horizon in degrees.
    #[arg(long, default_value_t = 30.0)]
    pub view_elevation: f64,

    /// Output PNG path.
    #[arg(short, long)]
    pub out: PathBuf,

    /// Output image width in pixels.
    #[arg(long, default_value_t = 1100)]
    pub width: u32,

    /// Output image height in pixels.
    #[arg(long, default_value_t = 900)]
    pub height: u32,
}

#[derive(Debug, Args)]
pub struct SectionArgs {
    /// Region "west/east/south/north" in degrees.
    #[arg(long)]
    pub region: Region,

    #[command(flatten)]
    pub catalog: CatalogOpts,

    /// Directory containing .hgt elevation tiles; surface profiles
    /// are omitted without it.
    #[arg(short, long)]
    pub tile_dir: Option<PathBuf>,

    /// West-east transect start "lat,lon".
    #[arg(long)]
    pub x_start: LatLon,

    /// West-east transect end "lat,lon".
    #[arg(long)]
    pub x_end: LatLon,

    /// South-north transect start "lat,lon".
    #[arg(long)]
    pub y_start: LatLon,

    /// South-north transect end "lat,lon".
    #[arg(long)]
    pub y_end: LatLon,

    /// Interpolated points per transect, endpoints included.
    #[arg(long, default_value_t = 100)]
    pub points: usize,

    /// Lower elevation bound in meters for the section panels.
    #[arg(long, default_value_t = -10_000.0)]
    pub elev_min: f64,

    /// Upper elevation bound in meters for the section panels.
    #[arg(long, default_value_t = 3000.0)]
    pub elev_max: f64,

    /// Legend spec file to draw beneath the section panel.
    #[arg(long)]
    pub legend_spec: Option<PathBuf>,

    /// Figure title.
    #[arg(long)]
    pub title: Option<String>,

    /// Output PNG path.
    #[arg(short, long)]
    pub out: PathBuf,

    /// Map panel width in pixels.
    #[arg(long, default_value_t = 1000)]
    pub width: u32,
}

#[derive(Debug, Args)]
pub struct TransectArgs {
    /// Directory containing .hgt elevation tiles.
    #[arg(short, long)]
    pub tile_dir: PathBuf,

    /// Start "lat,lon".
    #[arg(long)]
    pub start: LatLon,

    /// End "lat,lon".
    #[arg(long)]
    pub end: LatLon,

    /// Number of interpolated points, endpoints included.
    #[arg(short, long, default_value_t = 100)]
    pub points: usize,

    #[command(subcommand)]
    pub format: TransectFormat,
}

#[derive(Debug, Subcommand)]
pub enum TransectFormat {
    /// Print lon,lat,elevation rows to stdout.
    Csv,

    /// Print a JSON array to stdout.
    Json,

    /// Plot elevations to the terminal.
    Plot,
}

#[derive(Debug, Args)]
pub struct LegendArgs {
    /// Magnitudes to include, comma separated.
    #[arg(long, value_delimiter = ',', default_values_t = [3.0, 4.0, 5.0, 6.0, 7.0])]
    pub magnitudes: Vec<f64>,

    /// Symbol diameter in cm at magnitude 0.
    #[arg(long, default_value_t = 0.01)]
    pub scale: f64,

    /// Output spec file path.
    #[arg(short, long)]
    pub out: PathBuf,
}

#[derive(Clone, Debug, Copy)]
pub struct LatLon(pub Coord<f64>);

impl FromStr for LatLon {
    type Err = AnyError;

    fn from_str(s: &str) -> Result<Self, AnyError> {
        let idx = s.find(',').ok_or(anyhow!("not a valid lat,lon pair"))?;
        let (lat_str, lon_str) = {
            let (lat_str, lon_str) = s.split_at(idx);
            (lat_str, &lon_str[1..])
        };
        let lat = f64::from_str(lat_str.trim())?;
        let lon = f64::from_str(lon_str.trim())?;
        Ok(Self(Coord { y: lat, x: lon }))
    }
}

#[cfg(test)]
mod tests {
    use super::LatLon;

    #[test]
    fn test_lat_lon_from_str() {
        let LatLon(coord) = "7.205,38.3".parse().unwrap();
        assert_eq!(coord.y, 7.205);
        assert_eq!(coord.x, 38.3);

        assert!("7.205".parse::<LatLon>().is_err());
        assert!("a,b".parse::<LatLon>().is_err());
    }
}
