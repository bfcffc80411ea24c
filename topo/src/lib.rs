mod error;
mod grid;
mod math;
mod region;
mod shade;
mod tiles;
mod transect;

pub use crate::{
    error::TopoError,
    grid::Grid,
    math::linspace,
    region::Region,
    shade::hillshade,
    tiles::{TileMode, TileStore},
    transect::{sample_points, Transect},
};

pub use geo;
