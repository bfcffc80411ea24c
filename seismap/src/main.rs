mod cpt;
mod hypo3d;
mod legend;
mod map;
mod options;
mod section;
mod shaded;
mod style;
mod transect;

use anyhow::Error as AnyError;
use clap::Parser;
use options::{Cli, Command};

fn main() -> Result<(), AnyError> {
    env_logger::init();
    let cli = Cli::parse();

    match &cli.cmd {
        Command::Map(args) => map::render(args),
        Command::Topo(args) => shaded::render(args),
        Command::Hypo3d(args) => hypo3d::render(args),
        Command::Section(args) => section::render(args),
        Command::Transect(args) => transect::run(args),
        Command::Legend(args) => legend::write_spec(&args.out, args.scale, &args.magnitudes),
    }
}
