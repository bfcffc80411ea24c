//! The `topo` subcommand: shaded-relief topography map.

use crate::{
    cpt::{self, Cpt, Palette},
    map::map_height,
    options::TopoArgs,
    style,
};
use anyhow::Error as AnyError;
use log::info;
use plotters::prelude::*;
use topo::{hillshade, Grid, TileMode, TileStore};

const STRIP_H: u32 = 90;

pub fn render(args: &TopoArgs) -> Result<(), AnyError> {
    let region = args.region;
    let store = TileStore::new(args.tile_dir.clone(), TileMode::MemMap)?;
    let grid = Grid::from_store(&store, region, args.step_arcsec)?;
    let shade = hillshade(&grid, args.azimuth, args.altitude);

    // The shade layer gets a wider range than the data so midtones
    // stay gray; the elevation overlay is stretched to the grid.
    let shade_cpt = Cpt::new(Palette::Gray, -1.5, 1.5);
    let elev_cpt = Cpt::new(Palette::Earth, grid.min(), grid.max());

    let map_h = map_height(args.width, &region);
    let root =
        BitMapBackend::new(&args.out, (args.width, map_h + STRIP_H)).into_drawing_area();
    root.fill(&WHITE)?;
    let (map_area, strip) = root.split_vertically(map_h as i32);

    let mut builder = ChartBuilder::on(&map_area);
    builder
        .margin(12)
        .set_label_area_size(LabelAreaPosition::Left, 60)
        .set_label_area_size(LabelAreaPosition::Bottom, 42);
    if let Some(title) = &args.title {
        builder.caption(title, (style::FONT, style::TITLE_SIZE));
    }
    let mut chart =
        builder.build_cartesian_2d(region.west..region.east, region.south..region.north)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .x_labels(8)
        .y_labels(8)
        .x_label_formatter(&|v| format!("{v:.1}"))
        .y_label_formatter(&|v| format!("{v:.1}"))
        .label_style((style::FONT, style::ANNOT_SIZE))
        .draw()?;

    chart.draw_series(cells(&shade).map(|(bounds, row, col)| {
        Rectangle::new(bounds, shade_cpt.color_at(shade.value(row, col)).filled())
    }))?;
    // Translucent hypsometric tint over the illumination layer.
    chart.draw_series(cells(&grid).map(|(bounds, row, col)| {
        Rectangle::new(
            bounds,
            elev_cpt.color_at(grid.value(row, col)).mix(0.4).filled(),
        )
    }))?;

    let ticks = [
        (grid.min(), format!("{:.0}", grid.min())),
        ((grid.min() + grid.max()) / 2.0, format!("{:.0}", (grid.min() + grid.max()) / 2.0)),
        (grid.max(), format!("{:.0}", grid.max())),
    ];
    cpt::draw_colorbar(&strip, &elev_cpt, &ticks, Some("Elev [m]"))?;

    root.present()?;
    info!("wrote {:?}", args.out);
    Ok(())
}

/// Cell bounds for every grid sample, half a step on each side.
pub(crate) fn cells(grid: &Grid) -> impl Iterator<Item = ([(f64, f64); 2], usize, usize)> + '_ {
    let half_lon = grid.lon_step() / 2.0;
    let half_lat = grid.lat_step() / 2.0;
    (0..grid.rows()).flat_map(move |row| {
        (0..grid.cols()).map(move |col| {
            let center = grid.coord(row, col);
            (
                [
                    (center.x - half_lon, center.y - half_lat),
                    (center.x + half_lon, center.y + half_lat),
                ],
                row,
                col,
            )
        })
    })
}
