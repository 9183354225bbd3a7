//! The `settings` subcommands.
use crate::settings::{Settings, get_settings_file_path};
use anyhow::{Context, Result};
use clap::Subcommand;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::Path;

/// Subcommands for settings
#[derive(Subcommand)]
pub enum SettingsSubcommands {
    /// Open the settings file in a text editor, creating it first if needed
    Edit,
    /// Print the location of the settings file
    Path,
    /// Print the settings a run would use, with defaults filled in
    Show,
    /// Print a documented settings file containing the default values
    DumpDefault,
}

impl SettingsSubcommands {
    /// Execute the supplied settings subcommand
    pub fn execute(self) -> Result<()> {
        let file_path = get_settings_file_path();
        match self {
            Self::Edit => {
                if create_settings_file(&file_path)? {
                    println!("Created settings file: {}", file_path.display());
                }
                edit::edit_file(&file_path)
                    .with_context(|| format!("Failed to open editor for {}", file_path.display()))?;
            }
            Self::Path => println!("{}", file_path.display()),
            Self::Show => print!("{}", toml::to_string(&Settings::load()?)?),
            Self::DumpDefault => print!("{}", Settings::default_file_contents()?),
        }

        Ok(())
    }
}

/// Write a documented default settings file, unless there is one already.
///
/// # Returns
///
/// Whether a new file was created.
fn create_settings_file(file_path: &Path) -> Result<bool> {
    if let Some(dir_path) = file_path.parent() {
        fs::create_dir_all(dir_path)
            .with_context(|| format!("Failed to create directory: {}", dir_path.display()))?;
    }

    let mut file = match OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(file_path)
    {
        Ok(file) => file,
        Err(err) if err.kind() == ErrorKind::AlreadyExists => return Ok(false),
        Err(err) => {
            return Err(err).with_context(|| {
                format!("Failed to create settings file: {}", file_path.display())
            });
        }
    };
    file.write_all(Settings::default_file_contents()?.as_bytes())?;

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::Solver;
    use tempfile::tempdir;

    #[test]
    fn test_create_settings_file() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("gridsize").join("settings.toml");

        // Parent directory and file are created, and the file loads as the defaults
        assert!(create_settings_file(&file_path).unwrap());
        let settings: Settings = toml::from_str(&fs::read_to_string(&file_path).unwrap()).unwrap();
        assert_eq!(settings, Settings::default());

        // An existing file is left alone
        fs::write(&file_path, "solver = \"highs-ipm\"\n").unwrap();
        assert!(!create_settings_file(&file_path).unwrap());
        let settings: Settings = toml::from_str(&fs::read_to_string(&file_path).unwrap()).unwrap();
        assert_eq!(settings.solver, Solver::HighsIpm);
    }
}
