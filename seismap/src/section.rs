//! The `section` subcommand: map panel flanked by cross-section
//! panels, events projected onto each.

use crate::{
    cpt::{self, Cpt, Palette},
    legend,
    map::map_height,
    options::SectionArgs,
    shaded::cells,
    style,
};
use anyhow::Error as AnyError;
use catalog::{day_span, Event};
use geo::geometry::Coord;
use log::info;
use plotters::{
    coord::{cartesian::Cartesian2d, types::RangedCoordf64},
    prelude::*,
};
use topo::{hillshade, Grid, Region, TileMode, TileStore, Transect};

const STRIP_H: u32 = 150;

pub fn render(args: &SectionArgs) -> Result<(), AnyError> {
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
    let x_transect = transect(&store, args.x_start.0, args.x_end.0, args.points)?;
    let y_transect = transect(&store, args.y_start.0, args.y_end.0, args.points)?;

    let map_w = args.width;
    let map_h = map_height(map_w, &region);
    let sec_w = map_w / 4;
    let sec_h = (map_h / 4).max(160);

    let root = BitMapBackend::new(&args.out, (map_w + sec_w, map_h + sec_h + STRIP_H))
        .into_drawing_area();
    root.fill(&WHITE)?;
    let (top, rest) = root.split_vertically(map_h as i32);
    let (map_area, y_area) = top.split_horizontally(map_w as i32);
    let (mid, strip) = rest.split_vertically(sec_h as i32);
    let (x_area, _corner) = mid.split_horizontally(map_w as i32);

    // Map panel.
    {
        let mut builder = ChartBuilder::on(&map_area);
        builder
            .margin(10)
            .set_label_area_size(LabelAreaPosition::Left, 60)
            .set_label_area_size(LabelAreaPosition::Bottom, 36);
        if let Some(title) = &args.title {
            builder.caption(title, (style::FONT, style::TITLE_SIZE));
        }
        let mut chart =
            builder.build_cartesian_2d(region.west..region.east, region.south..region.north)?;
        chart
            .configure_mesh()
            .disable_x_mesh()
            .disable_y_mesh()
            .x_labels(6)
            .y_labels(6)
            .x_label_formatter(&|v| format!("{v:.2}"))
            .y_label_formatter(&|v| format!("{v:.2}"))
            .label_style((style::FONT, style::ANNOT_SIZE))
            .draw()?;

        if let Some(store) = &store {
            let grid = Grid::from_store(store, region, grid_step(&region))?;
            let shade = hillshade(&grid, 270.0, 30.0);
            let shade_cpt = Cpt::new(Palette::Gray, -1.5, 1.5);
            chart.draw_series(cells(&shade).map(|(bounds, row, col)| {
                Rectangle::new(
                    bounds,
                    shade_cpt.color_at(shade.value(row, col)).mix(0.6).filled(),
                )
            }))?;
        }

        for (a, b) in [
            (args.x_start.0, args.x_end.0),
            (args.y_start.0, args.y_end.0),
        ] {
            chart.draw_series(DashedLineSeries::new(
                [(a.x, a.y), (b.x, b.y)],
                6,
                5,
                BLACK.stroke_width(1),
            ))?;
        }

        draw_events(&mut chart, &events, &dates, args.catalog.scale, |event| {
            (event.longitude, event.latitude)
        })?;
    }

    // Longitude/depth panel under the map.
    {
        let mut chart = ChartBuilder::on(&x_area)
            .margin(10)
            .set_label_area_size(LabelAreaPosition::Left, 60)
            .set_label_area_size(LabelAreaPosition::Bottom, 36)
            .build_cartesian_2d(region.west..region.east, args.elev_min..args.elev_max)?;
        chart
            .configure_mesh()
            .disable_x_mesh()
            .disable_y_mesh()
            .x_labels(6)
            .y_labels(4)
            .y_desc("Depth (m)")
            .label_style((style::FONT, style::ANNOT_SIZE))
            .draw()?;

        // Where the orthogonal transect crosses, for reference.
        let mid_lon = (args.y_start.0.x + args.y_end.0.x) / 2.0;
        chart.draw_series(DashedLineSeries::new(
            [(mid_lon, args.elev_min), (mid_lon, args.elev_max)],
            4,
            4,
            RGBColor(128, 128, 128).stroke_width(1),
        ))?;

        if let Some(transect) = &x_transect {
            chart.draw_series(LineSeries::new(
                transect
                    .points
                    .iter()
                    .zip(transect.elevation.iter())
                    .map(|(point, elevation)| (point.x, f64::from(*elevation))),
                BLACK.stroke_width(1),
            ))?;
        }

        draw_events(&mut chart, &events, &dates, args.catalog.scale, |event| {
            (event.longitude, event.depth_m())
        })?;
    }

    // Depth/latitude panel right of the map; depth grows rightward,
    // so elevations are negated.
    {
        let mut chart = ChartBuilder::on(&y_area)
            .margin(10)
            .set_label_area_size(LabelAreaPosition::Left, 50)
            .set_label_area_size(LabelAreaPosition::Bottom, 36)
            .build_cartesian_2d(-args.elev_max..-args.elev_min, region.south..region.north)?;
        chart
            .configure_mesh()
            .disable_x_mesh()
            .disable_y_mesh()
            .x_labels(3)
            .y_labels(6)
            .x_desc("Depth (m)")
            .label_style((style::FONT, style::ANNOT_SIZE))
            .draw()?;

        let mid_lat = (args.x_start.0.y + args.x_end.0.y) / 2.0;
        chart.draw_series(DashedLineSeries::new(
            [(-args.elev_max, mid_lat), (-args.elev_min, mid_lat)],
            4,
            4,
            RGBColor(128, 128, 128).stroke_width(1),
        ))?;

        if let Some(transect) = &y_transect {
            chart.draw_series(LineSeries::new(
                transect
                    .points
                    .iter()
                    .zip(transect.elevation.iter())
                    .map(|(point, elevation)| (-f64::from(*elevation), point.y)),
                BLACK.stroke_width(1),
            ))?;
        }

        draw_events(&mut chart, &events, &dates, args.catalog.scale, |event| {
            (-event.depth_m(), event.latitude)
        })?;
    }

    let ticks = [
        (day_min, style::day_label(day_min)),
        ((day_min + day_max) / 2.0, style::day_label((day_min + day_max) / 2.0)),
        (day_max, style::day_label(day_max)),
    ];
    let (bar_area, legend_area) = strip.split_vertically((STRIP_H / 2) as i32);
    cpt::draw_colorbar(&bar_area, &dates, &ticks, None)?;
    if let Some(path) = &args.legend_spec {
        legend::draw(&legend_area, &legend::read_spec(path)?)?;
    }

    root.present()?;
    info!("wrote {:?}", args.out);
    Ok(())
}

fn transect(
    store: &Option<TileStore>,
    start: Coord<f64>,
    end: Coord<f64>,
    points: usize,
) -> Result<Option<Transect>, AnyError> {
    match store {
        Some(store) => Ok(Some(
            Transect::builder()
                .start(start)
                .end(end)
                .points(points)
                .build(store)?,
        )),
        None => Ok(None),
    }
}

/// Keep the section base raster near one sample per two pixels.
fn grid_step(region: &Region) -> f64 {
    (region.width() * 3600.0 / 500.0).max(1.0)
}

fn draw_events<DB, F>(
    chart: &mut ChartContext<'_, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>,
    events: &[Event],
    dates: &Cpt,
    scale: f64,
    project: F,
) -> Result<(), AnyError>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
    F: Fn(&Event) -> (f64, f64),
{
    chart.draw_series(events.iter().map(|event| {
        Circle::new(
            project(event),
            style::symbol_radius_px(scale, event.magnitude),
            dates.color_at(event.day_number()).filled(),
        )
    }))?;
    chart.draw_series(events.iter().map(|event| {
        Circle::new(
            project(event),
            style::symbol_radius_px(scale, event.magnitude),
            BLACK.stroke_width(1),
        )
    }))?;
    Ok(())
}
