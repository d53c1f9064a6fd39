//! Platform logging initialization for studio_app.
//!
//! Logs go to `./studio.log` by default so the terminal stays readable.
//! `STUDIO_LOG=terminal|file|both` picks another destination.

use std::path::Path;

use log::LevelFilter;
use studio_logging::LogDestination;

const LOG_PATH: &str = "./studio.log";

pub fn initialize_from_env() {
    let destination = std::env::var("STUDIO_LOG")
        .ok()
        .and_then(|value| LogDestination::parse(&value))
        .unwrap_or(LogDestination::File);
    studio_logging::initialize(destination, LevelFilter::Info, Path::new(LOG_PATH));
}
