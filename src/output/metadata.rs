//! Writes `metadata.toml`: what was run, on what, and with which build of the program.
use crate::model::Model;
use crate::model::parameters::ModelParameters;
use crate::optimisation::ProblemSize;
use crate::solver::Solver;
use anyhow::{Result, anyhow};
use chrono::Local;
use platform_info::{PlatformInfo, PlatformInfoAPI, UNameAPI};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// The output file name for metadata
const METADATA_FILE_NAME: &str = "metadata.toml";

/// Build information generated by the build script
mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

#[derive(Serialize)]
struct Metadata<'a> {
    run: RunMetadata<'a>,
    model: ModelMetadata<'a>,
    build: BuildMetadata,
    platform: PlatformMetadata,
}

/// The inputs and options of the run
#[derive(Serialize)]
struct RunMetadata<'a> {
    started: String,
    data_file: &'a Path,
    /// Absent if the default parameters were used
    parameters_file: Option<&'a Path>,
    solver: Solver,
}

/// The problem which was solved
#[derive(Serialize)]
struct ModelMetadata<'a> {
    num_hours: usize,
    problem: ProblemSize,
    parameters: &'a ModelParameters,
}

impl<'a> ModelMetadata<'a> {
    fn new(model: &'a Model) -> Self {
        Self {
            num_hours: model.num_hours(),
            problem: ProblemSize::for_hours(model.num_hours()),
            parameters: &model.parameters,
        }
    }
}

/// Which build of the program produced the results
#[derive(Serialize)]
struct BuildMetadata {
    version: String,
    git_commit: String,
    profile: &'static str,
    target: &'static str,
    rustc: &'static str,
    built: &'static str,
}

impl BuildMetadata {
    fn new() -> Self {
        let git_commit = match (built_info::GIT_COMMIT_HASH_SHORT, built_info::GIT_DIRTY) {
            (Some(hash), Some(true)) => format!("{hash} (modified)"),
            (Some(hash), _) => hash.to_string(),
            (None, _) => "unknown".to_string(),
        };

        Self {
            version: format!("{} {}", built_info::PKG_NAME, built_info::PKG_VERSION),
            git_commit,
            profile: if built_info::DEBUG { "debug" } else { "release" },
            target: built_info::TARGET,
            rustc: built_info::RUSTC_VERSION,
            built: built_info::BUILT_TIME_UTC,
        }
    }
}

/// The machine the program ran on
#[derive(Serialize)]
struct PlatformMetadata {
    os: String,
    release: String,
    machine: String,
}

impl PlatformMetadata {
    fn new() -> Result<Self> {
        let info =
            PlatformInfo::new().map_err(|err| anyhow!("Unable to determine platform: {err}"))?;

        Ok(Self {
            os: format!(
                "{} ({})",
                info.osname().to_string_lossy(),
                info.sysname().to_string_lossy()
            ),
            release: info.release().to_string_lossy().into(),
            machine: info.machine().to_string_lossy().into(),
        })
    }
}

/// Write metadata for a run to the output folder
///
/// # Arguments
///
/// * `output_path` - Folder where the file will be saved
/// * `model` - The model being solved
/// * `data_file` - Path to the hourly profile
/// * `parameters_file` - Path to the parameters file, if any
/// * `solver` - The solver used for the run
pub fn write_metadata(
    output_path: &Path,
    model: &Model,
    data_file: &Path,
    parameters_file: Option<&Path>,
    solver: Solver,
) -> Result<()> {
    let metadata = Metadata {
        run: RunMetadata {
            started: Local::now().to_rfc3339(),
            data_file,
            parameters_file,
            solver,
        },
        model: ModelMetadata::new(model),
        build: BuildMetadata::new(),
        platform: PlatformMetadata::new()?,
    };
    fs::write(
        output_path.join(METADATA_FILE_NAME),
        toml::to_string(&metadata)?,
    )?;

    Ok(())
}
