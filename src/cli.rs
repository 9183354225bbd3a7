//! The command line interface for the program.
use crate::input::load_model;
use crate::log;
use crate::model::parameters::ModelParameters;
use crate::optimisation::perform_sizing_optimisation;
use crate::output::metadata::write_metadata;
use crate::output::{DataWriter, create_output_directory, get_output_dir};
use crate::settings::Settings;
use crate::technology::Technology;
use ::log::{info, warn};
use anyhow::{Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::Instant;

pub mod settings;
use settings::SettingsSubcommands;

/// The command line interface for the program.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// The available commands.
    #[command(subcommand)]
    command: Option<Commands>,
    /// Flag to provide the CLI docs as markdown
    #[arg(long, hide = true)]
    markdown_help: bool,
}

/// Options for the run command
#[derive(Args)]
pub struct RunOpts {
    /// The solver to use (highs, highs-simplex or highs-ipm)
    #[arg(short, long)]
    pub solver: Option<String>,
    /// Directory for output files
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,
    /// Whether to overwrite the output directory if it already exists
    #[arg(long)]
    pub overwrite: bool,
    /// TOML file with model parameters
    #[arg(short, long)]
    pub parameters: Option<PathBuf>,
}

/// The available commands.
#[derive(Subcommand)]
enum Commands {
    /// Size capacities for an hourly profile.
    Run {
        /// Path to the CSV file with hourly solar, wind and demand data.
        data_file: PathBuf,
        /// Other run options
        #[command(flatten)]
        opts: RunOpts,
    },
    /// Validate input data without solving.
    Validate {
        /// Path to the CSV file with hourly solar, wind and demand data.
        data_file: PathBuf,
        /// TOML file with model parameters
        #[arg(short, long)]
        parameters: Option<PathBuf>,
    },
    /// Manage settings file.
    Settings {
        /// The subcommands for managing the settings file.
        #[command(subcommand)]
        subcommand: SettingsSubcommands,
    },
    /// Work with model parameters files.
    Parameters {
        /// The subcommands for model parameters.
        #[command(subcommand)]
        subcommand: ParametersSubcommands,
    },
}

/// Subcommands for model parameters
#[derive(Subcommand)]
enum ParametersSubcommands {
    /// Write the contents of a documented default parameters file to the console
    DumpDefault,
}

impl Commands {
    /// Execute the supplied CLI command
    fn execute(self) -> Result<()> {
        match self {
            Self::Run { data_file, opts } => handle_run_command(&data_file, &opts, None),
            Self::Validate {
                data_file,
                parameters,
            } => handle_validate_command(&data_file, parameters.as_deref(), None),
            Self::Settings { subcommand } => subcommand.execute(),
            Self::Parameters { subcommand } => {
                match subcommand {
                    ParametersSubcommands::DumpDefault => {
                        print!("{}", ModelParameters::default_file_contents()?);
                    }
                }
                Ok(())
            }
        }
    }
}

/// Parse CLI arguments and start the program
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();

    // Invoked as: `$ gridsize --markdown-help`
    if cli.markdown_help {
        clap_markdown::print_help_markdown::<Cli>();
        return Ok(());
    }

    let Some(command) = cli.command else {
        // Output program help
        let help_str = Cli::command().render_long_help().to_string();
        println!("{help_str}");
        return Ok(());
    };

    command.execute()
}

/// Handle the `run` command.
pub fn handle_run_command(
    data_file: &Path,
    opts: &RunOpts,
    settings: Option<Settings>,
) -> Result<()> {
    // Load program settings, if not provided
    let settings = if let Some(settings) = settings {
        settings
    } else {
        Settings::load().context("Failed to load settings.")?
    };

    // Command-line options take precedence over settings
    let solver = settings.solver_for_run(opts.solver.as_deref())?;

    // Get path to output folder
    let pathbuf: PathBuf;
    let output_path = if let Some(p) = opts.output_dir.as_deref() {
        p
    } else {
        pathbuf = get_output_dir(data_file)?;
        &pathbuf
    };

    let overwrite_allowed = settings.overwrite_for_run(opts.overwrite);
    let overwrite = create_output_directory(output_path, overwrite_allowed).with_context(|| {
        format!(
            "Failed to create output directory: {}",
            output_path.display()
        )
    })?;

    // Initialise program logger
    log::init(Some(&settings.log_level), Some(output_path))
        .context("Failed to initialise logging.")?;

    // NB: We have to wait until the logger is initialised to display this warning
    if overwrite {
        warn!("Output folder will be overwritten");
    }

    // Load the model to run
    let parameters_file = opts.parameters.as_deref();
    let model = load_model(data_file, parameters_file).context("Failed to load model.")?;
    info!(
        "Loaded {} hours of data from {}",
        model.num_hours(),
        data_file.display()
    );
    info!("Output folder: {}", output_path.display());

    write_metadata(output_path, &model, data_file, parameters_file, solver)
        .context("Failed to save metadata.")?;

    // Solve, then save the outcome whether or not it is optimal
    info!("Solving with {solver}");
    let start = Instant::now();
    let outcome = perform_sizing_optimisation(&model, solver);
    let solve_time = start.elapsed();
    DataWriter::new(output_path)
        .write_outcome(&model, solver, &outcome, solve_time)
        .context("Failed to save results.")?;
    let solution = outcome?;

    info!("Total cost: {}", solution.objective_value);
    for (technology, capacity) in solution.iter_capacities() {
        info!("Optimal {technology}: {capacity}");
    }
    let stored_energy = solution
        .capacity(Technology::StorageEnergyCapacity)
        .stored_energy();
    info!(
        "Total curtailment: {}; total discharge: {}; full storage holds {stored_energy}",
        solution.total_curtailment(),
        solution.total_discharge()
    );
    info!("Sizing complete in {:.2}s", solve_time.as_secs_f64());

    Ok(())
}

/// Handle the `validate` command.
pub fn handle_validate_command(
    data_file: &Path,
    parameters_file: Option<&Path>,
    settings: Option<Settings>,
) -> Result<()> {
    // Load program settings, if not provided
    let settings = if let Some(settings) = settings {
        settings
    } else {
        Settings::load().context("Failed to load settings.")?
    };

    // Initialise program logger (we won't save log files when running the validate command)
    log::init(Some(&settings.log_level), None).context("Failed to initialise logging.")?;

    // Load/validate the model
    load_model(data_file, parameters_file).context("Failed to validate model.")?;
    info!("Model validation successful!");

    Ok(())
}
