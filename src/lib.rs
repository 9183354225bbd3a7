//! Sizing of solar, wind and storage capacity to meet an hourly demand profile at least cost.
#![warn(missing_docs)]
use std::path::PathBuf;

pub mod cli;
pub mod input;
pub mod log;
pub mod model;
pub mod optimisation;
pub mod output;
pub mod profile;
pub mod settings;
pub mod solver;
pub mod technology;
pub mod units;

#[cfg(test)]
mod fixture;

/// Get the directory in which the program's config files are stored
pub fn get_gridsize_config_dir() -> PathBuf {
    let mut path = dirs::config_dir().expect("Could not determine user config directory");
    path.push("gridsize");

    path
}
