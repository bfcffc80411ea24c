//! The `hypo3d` subcommand: perspective view of hypocenters beneath
//! the topographic surface.

use crate::{
    cpt::{self, Cpt, Palette},
    options::Hypo3dArgs,
    style,
};
use anyhow::Error as AnyError;
use catalog::{day_span, read_stations};
use geo::geometry::Coord;
use log::info;
use plotters::prelude::*;
use topo::{sample_points, Grid, TileMode, TileStore};

const STRIP_H: u32 = 80;

pub fn render(args: &Hypo3dArgs) -> Result<(), AnyError> {
    let region = args.region;
    let mut events = args.catalog.load()?;
    events.retain(|event| {
        region.contains(Coord {
            x: event.longitude,
            y: event.latitude,
        }) && event.depth_m() >= args.elev_min
            && event.depth_m() <= args.elev_max
    });
    events.sort_by(|a, b| a.time.cmp(&b.time));

    let (day_min, day_max) = day_span(&events).unwrap_or((0.0, 1.0));
    let dates = Cpt::new(Palette::Viridis, day_min, day_max);

    let store = match &args.tile_dir {
        Some(dir) => Some(TileStore::new(dir.clone(), TileMode::MemMap)?),
        None => None,
    };
    let surface = match &store {
        Some(store) => Some(Grid::from_store(store, region, args.step_arcsec)?),
        None => None,
    };

    let root =
        BitMapBackend::new(&args.out, (args.width, args.height + STRIP_H)).into_drawing_area();
    root.fill(&WHITE)?;
    let (view, strip) = root.split_vertically(args.height as i32);

    let mut chart = ChartBuilder::on(&view).margin(20).build_cartesian_3d(
        region.west..region.east,
        args.elev_min..args.elev_max,
        region.south..region.north,
    )?;

    // Plotters measures yaw from the south axis; the original
    // perspective azimuths are clockwise from north.
    chart.with_projection(|mut pb| {
        pb.yaw = (args.view_azimuth - 180.0).to_radians();
        pb.pitch = args.view_elevation.to_radians();
        pb.scale = 0.8;
        pb.into_matrix()
    });

    chart
        .configure_axes()
        .label_style((style::FONT, style::ANNOT_SIZE))
        .draw()?;

    if let Some(grid) = &surface {
        let elev_cpt = Cpt::new(Palette::Earth, grid.min(), grid.max());
        chart.draw_series(
            SurfaceSeries::xoz(
                (0..grid.cols()).map(|col| grid.coord(0, col).x),
                (0..grid.rows()).map(|row| grid.coord(row, 0).y),
                |x, z| grid.value_at(Coord { x, y: z }).unwrap_or(0.0),
            )
            .style_func(&|&v| elev_cpt.color_at(v).mix(0.25).filled()),
        )?;
    }

    chart.draw_series(events.iter().map(|event| {
        Circle::new(
            (event.longitude, event.depth_m(), event.latitude),
            style::symbol_radius_px(args.catalog.scale, event.magnitude),
            dates.color_at(event.day_number()).filled(),
        )
    }))?;

    if let Some(path) = &args.stations {
        let stations = read_stations(path)?;
        let coords: Vec<Coord<f64>> = stations
            .iter()
            .map(|s| Coord {
                x: s.longitude,
                y: s.latitude,
            })
            .collect();
        // Spot heights put the markers on the surface; without tiles
        // they sit at the datum.
        let elevations = match &store {
            Some(store) => sample_points(store, &coords)?,
            None => vec![0; coords.len()],
        };
        chart.draw_series(stations.iter().zip(elevations).map(|(s, elevation)| {
            Circle::new(
                (s.longitude, f64::from(elevation), s.latitude),
                4,
                BLACK.filled(),
            )
        }))?;
    }

    let ticks = [
        (day_min, style::day_label(day_min)),
        (day_max, style::day_label(day_max)),
    ];
    cpt::draw_colorbar(&strip, &dates, &ticks, None)?;

    root.present()?;
    info!("wrote {:?}", args.out);
    Ok(())
}
