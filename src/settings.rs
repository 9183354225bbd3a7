//! Program settings, read from `settings.toml` in the user's config directory.
//!
//! Settings supply the defaults for a `run`: which solver to use and whether an existing output
//! folder may be replaced. Command-line options take precedence over them.
use crate::get_gridsize_config_dir;
use crate::input::read_toml;
use crate::log::DEFAULT_LOG_LEVEL;
use crate::solver::Solver;
use anyhow::{Result, anyhow, bail};
use documented::DocumentedFields;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt::Write;
use std::path::{Path, PathBuf};

const SETTINGS_FILE_NAME: &str = "settings.toml";

const DEFAULT_SETTINGS_FILE_HEADER: &str = "# Program settings for gridsize
# Options given on the command line take precedence over these
";

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

/// Read a solver name, rejecting solvers which aren't available
fn deserialise_solver<'de, D>(deserialiser: D) -> Result<Solver, D::Error>
where
    D: Deserializer<'de>,
{
    let name = String::deserialize(deserialiser)?;
    Solver::from_name(&name).map_err(serde::de::Error::custom)
}

/// Get the path to where the settings file will be read from
pub fn get_settings_file_path() -> PathBuf {
    get_gridsize_config_dir().join(SETTINGS_FILE_NAME)
}

/// Program settings
#[derive(Debug, Clone, DocumentedFields, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    /// The solver used when `--solver` is not given (highs, highs-simplex or highs-ipm)
    #[serde(default, deserialize_with = "deserialise_solver")]
    pub solver: Solver,
    /// Whether `run` may replace a non-empty output folder without `--overwrite`
    #[serde(default)]
    pub overwrite: bool,
    /// The log level (the GRIDSIZE_LOG_LEVEL environment variable takes precedence)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            solver: Solver::default(),
            overwrite: false,
            log_level: default_log_level(),
        }
    }
}

impl Settings {
    /// Load settings from the user's config directory, using defaults if there is no file
    pub fn load() -> Result<Self> {
        Self::load_from_path(&get_settings_file_path())
    }

    fn load_from_path(file_path: &Path) -> Result<Self> {
        if file_path.is_file() {
            read_toml(file_path)
        } else {
            Ok(Self::default())
        }
    }

    /// The solver for a run: the one named on the command line, or else the configured one
    pub fn solver_for_run(&self, name_from_cli: Option<&str>) -> Result<Solver> {
        name_from_cli.map_or(Ok(self.solver), Solver::from_name)
    }

    /// Whether a run may replace a non-empty output folder
    pub fn overwrite_for_run(&self, overwrite_from_cli: bool) -> bool {
        overwrite_from_cli || self.overwrite
    }

    /// A settings file with every value at its default, commented out and documented
    pub fn default_file_contents() -> Result<String> {
        documented_toml(DEFAULT_SETTINGS_FILE_HEADER, &Self::default())
    }
}

/// Render `value` as TOML with every entry commented out and preceded by its doc comment
pub(crate) fn documented_toml<T>(header: &str, value: &T) -> Result<String>
where
    T: Serialize + DocumentedFields,
{
    let toml::Value::Table(table) = toml::Value::try_from(value)? else {
        bail!("Only structs can be written as documented TOML");
    };

    let mut out = header.to_string();
    for (key, value) in &table {
        let docs =
            T::get_field_docs(key).map_err(|_| anyhow!("Missing doc comment for field {key}"))?;
        out.push('\n');
        for line in docs.lines() {
            writeln!(out, "# # {}", line.trim())?;
        }
        writeln!(out, "# {key} = {value}")?;
    }

    Ok(out)
}
