//! CLI entry point for building photomosaics from a pool of tile images

use clap::Parser;
use gaze::io::cli::{Cli, MosaicRunner};
use gaze::io::logging;

fn main() -> gaze::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.quiet, cli.verbose);
    let runner = MosaicRunner::new(cli);
    runner.run().map(|_| ())
}
