//! This crate contains the source code for the binary of the maze runner.

#![expect(
    clippy::cargo_common_metadata,
    reason = "Temporary allow during development."
)]
#![expect(
    unused_crate_dependencies,
    reason = "The dependencies are used in the library crate."
)]

use clap::Parser as _;
use color_eyre::{eyre::Result, install};
use maze_runner::{App, Config};

fn main() -> Result<()> {
    install()?;

    let config = Config::parse();
    config.init_logging()?;

    let report = App::new(config).run()?;
    println!("{report}");

    Ok(())
}
