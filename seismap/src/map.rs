//! The `map` subcommand: regional seismicity map.

use crate::{
    cpt::{self, Cpt, Palette},
    legend,
    options::MapArgs,
    style,
};
use anyhow::Error as AnyError;
use catalog::{day_span, read_boundaries, read_stations, read_volcanoes};
use geo::geometry::Coord;
use log::info;
use plotters::{
    coord::{cartesian::Cartesian2d, types::RangedCoordf64},
    drawing::DrawingAreaErrorKind,
    prelude::*,
};

/// Extra figure height for the colorbar/legend strip.
const STRIP_H: u32 = 150;

/// Background tone standing in for the land layer of the original
/// coastline plots; no coastline dataset is bundled.
const LAND: RGBColor = RGBColor(235, 232, 222);

pub fn render(args: &MapArgs) -> Result<(), AnyError> {
    let region = args.region;
    let mut events = args.catalog.load()?;
    events.retain(|event| {
        region.contains(Coord {
            x: event.longitude,
            y: event.latitude,
        })
    });
    events.sort_by(|a, b| a.time.cmp(&b.time));

    let (day_min, day_max) = day_span(&events).unwrap_or((0.0, 1.0));
    let dates = Cpt::new(Palette::Viridis, day_min, day_max);

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

    chart.draw_series(std::iter::once(Rectangle::new(
        [(region.west, region.south), (region.east, region.north)],
        LAND.filled(),
    )))?;

    if let Some(path) = &args.boundaries {
        for segment in read_boundaries(path)? {
            chart.draw_series(DashedLineSeries::new(
                segment.0.iter().map(|c| (c.x, c.y)),
                8,
                6,
                BLACK.stroke_width(2),
            ))?;
        }
    }

    // Fill pass then outline pass, oldest first so recent events sit
    // on top.
    chart.draw_series(events.iter().map(|event| {
        Circle::new(
            (event.longitude, event.latitude),
            style::symbol_radius_px(args.catalog.scale, event.magnitude),
            dates.color_at(event.day_number()).filled(),
        )
    }))?;
    chart.draw_series(events.iter().map(|event| {
        Circle::new(
            (event.longitude, event.latitude),
            style::symbol_radius_px(args.catalog.scale, event.magnitude),
            BLACK.stroke_width(1),
        )
    }))?;

    if let Some(path) = &args.volcanoes {
        chart.draw_series(
            read_volcanoes(path)?
                .iter()
                .map(|v| TriangleMarker::new((v.longitude, v.latitude), 7, RED.filled())),
        )?;
    }

    if let Some(path) = &args.stations {
        chart.draw_series(read_stations(path)?.into_iter().map(|s| {
            EmptyElement::at((s.longitude, s.latitude))
                + Rectangle::new([(-4, -4), (4, 4)], BLACK.filled())
                + Text::new(
                    s.code,
                    (6, -16),
                    (style::FONT, style::ANNOT_SIZE).into_font(),
                )
        }))?;
    }

    if args.scale_bar_km > 0.0 {
        draw_scale_bar(&mut chart, &region, args.scale_bar_km)?;
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

/// Map panel height following the region aspect, stretched by the
/// usual 1/cos(latitude) so degrees keep their shape away from the
/// equator.
pub fn map_height(width: u32, region: &topo::Region) -> u32 {
    let aspect = region.height() / region.width() / region.center().y.to_radians().cos();
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let height = (f64::from(width) * aspect).round() as u32;
    height.clamp(200, 4000)
}

/// Kilometers per degree of longitude at `lat`.
fn km_per_deg_lon(lat: f64) -> f64 {
    111.32 * lat.to_radians().cos()
}

fn draw_scale_bar<DB: DrawingBackend>(
    chart: &mut ChartContext<'_, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>,
    region: &topo::Region,
    km: f64,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>>
where
    DB::ErrorType: 'static,
{
    let width_deg = km / km_per_deg_lon(region.center().y);
    let x0 = region.west + region.width() * 0.06;
    let y0 = region.south + region.height() * 0.05;

    chart.draw_series(std::iter::once(PathElement::new(
        vec![(x0, y0), (x0 + width_deg, y0)],
        BLACK.stroke_width(3),
    )))?;
    chart.draw_series(std::iter::once(Text::new(
        format!("{km:.0} km"),
        (x0 + width_deg / 2.0, y0 + region.height() * 0.015),
        (style::FONT, style::ANNOT_SIZE).into_font(),
    )))?;
    Ok(())
}
