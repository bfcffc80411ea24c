//! Loaders for the flat tabular files a seismicity map is drawn from:
//! earthquake catalogs, seismic station locations, Holocene volcano
//! lists, and plate-boundary polylines.
//!
//! All records are read-only once loaded; derived quantities (numeric
//! date encoding, signed depth in meters) are computed on demand and
//! never written back.

mod boundaries;
mod error;
mod events;
mod stations;
mod volcanoes;

pub use crate::{
    boundaries::read_boundaries,
    error::CatalogError,
    events::{day_span, read_local_catalog, read_usgs_csv, Event},
    stations::{read_stations, Station},
    volcanoes::{read_volcanoes, Volcano},
};
