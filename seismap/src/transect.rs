//! The `transect` subcommand: interpolate a straight-line profile and
//! print it.

use crate::options::{TransectArgs, TransectFormat};
use anyhow::Error as AnyError;
use serde::Serialize;
use std::io::Write;
use textplots::{Chart, Plot, Shape};
use topo::{TileMode, TileStore, Transect};

pub fn run(args: &TransectArgs) -> Result<(), AnyError> {
    let store = TileStore::new(args.tile_dir.clone(), TileMode::MemMap)?;
    let transect = Transect::builder()
        .start(args.start.0)
        .end(args.end.0)
        .points(args.points)
        .build(&store)?;

    match args.format {
        TransectFormat::Csv => print_csv(&transect)?,
        TransectFormat::Json => print_json(&transect)?,
        TransectFormat::Plot => plot_ascii(&transect),
    }
    Ok(())
}

fn print_csv(transect: &Transect) -> Result<(), AnyError> {
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "Longitude,Latitude,Elevation")?;
    for (point, elevation) in transect.points.iter().zip(transect.elevation.iter()) {
        writeln!(stdout, "{},{},{elevation}", point.x, point.y)?;
    }
    Ok(())
}

fn print_json(transect: &Transect) -> Result<(), AnyError> {
    #[derive(Serialize)]
    struct JsonEntry {
        location: [f64; 2],
        elevation: i16,
    }

    let reshaped: Vec<JsonEntry> = transect
        .points
        .iter()
        .zip(transect.elevation.iter())
        .map(|(point, elevation)| JsonEntry {
            location: [point.x, point.y],
            elevation: *elevation,
        })
        .collect();
    let json = serde_json::to_string(&reshaped)?;
    println!("{json}");
    Ok(())
}

fn plot_ascii(transect: &Transect) {
    let plot_data: Vec<(f32, f32)> = transect
        .elevation
        .iter()
        .enumerate()
        .map(|(idx, elevation)| (f32::from(idx as u16), f32::from(*elevation)))
        .collect();
    #[allow(clippy::cast_precision_loss)]
    Chart::new(300, 150, 0.0, plot_data.len() as f32)
        .lineplot(&Shape::Lines(&plot_data))
        .display();
}
