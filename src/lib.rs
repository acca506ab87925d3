//! Voxel Forge Application Library
//!
//! Configuration, setup and utilities for the `voxel-forge` command line.

/// Command-line arguments and solver settings.
pub mod config;
/// Application error type.
pub mod error;
/// Plain-text grid files.
pub mod io;
/// Logger setup.
pub mod logging;
/// Progress reporting.
pub mod progress;
/// Running a request end to end.
pub mod setup;

pub use config::AppConfig;
pub use error::AppError;

use clap::Parser;

/// Parses the command line, runs the request and writes the output grid.
pub fn main() -> anyhow::Result<()> {
    let config = AppConfig::parse();
    logging::init_logger(&config);

    log::info!("Voxel Forge Starting");
    log::debug!("Loaded Config: {config:?}");

    setup::execution::run(&config)?;

    log::info!("Voxel Forge Finished.");
    Ok(())
}
