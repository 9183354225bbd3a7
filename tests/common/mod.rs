//! Helpers shared between integration tests.
use std::f64::consts::PI;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// The number of hours in the synthetic data file
pub const NUM_HOURS: usize = 48;

/// Write a synthetic two-day data file and matching parameters file into `dir`.
///
/// # Returns
///
/// The paths to the data file and the parameters file.
#[allow(clippy::cast_precision_loss)]
pub fn write_synthetic_model(dir: &Path) -> (PathBuf, PathBuf) {
    let data_file = dir.join("synthetic.csv");
    {
        let mut file = File::create(&data_file).unwrap();
        writeln!(file, "t,solar,wind,demand").unwrap();
        for t in 0..NUM_HOURS {
            let hour_of_day = (t % 24) as f64;
            let solar = (PI * (hour_of_day - 6.0) / 12.0).sin().max(0.0);
            let wind = if (t / 6) % 2 == 0 { 0.6 } else { 0.1 };
            let demand = if (17.0..22.0).contains(&hour_of_day) {
                1.5
            } else {
                1.0
            };
            writeln!(file, "{t},{solar},{wind},{demand}").unwrap();
        }
    }

    let parameters_file = dir.join("parameters.toml");
    {
        let mut file = File::create(&parameters_file).unwrap();
        writeln!(file, "num_hours = {NUM_HOURS}").unwrap();
    }

    (data_file, parameters_file)
}
