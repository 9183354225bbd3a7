//! The module responsible for writing output data to disk.
use crate::model::Model;
use crate::optimisation::{ModelError, ProblemSize, Solution};
use crate::profile::Hour;
use crate::solver::{Solver, SolverStatus};
use crate::technology::Technology;
use anyhow::{Context, Result, ensure};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub mod metadata;

/// The root folder in which data-file-specific output folders will be created
const OUTPUT_DIRECTORY_ROOT: &str = "gridsize_results";

/// The output file name for the full results
const RESULTS_FILE_NAME: &str = "results.json";

/// The output file name for hourly dispatch
const DISPATCH_FILE_NAME: &str = "dispatch.csv";

/// The output file name for capacities
const CAPACITIES_FILE_NAME: &str = "capacities.csv";

/// The objective sense reported in the results file; total cost is always minimised
const OBJECTIVE_SENSE: &str = "minimise";

/// Get the default output directory for the given data file
pub fn get_output_dir(data_file: &Path) -> Result<PathBuf> {
    let stem = data_file
        .file_stem()
        .context("Data file has no name")?
        .to_str()
        .context("Invalid chars in data file name")?;

    Ok([OUTPUT_DIRECTORY_ROOT, stem].iter().collect())
}

/// Create a new output directory, emptying it first if `overwrite` is set.
///
/// # Returns
///
/// Whether an existing, non-empty directory was overwritten.
pub fn create_output_directory(output_dir: &Path, overwrite: bool) -> Result<bool> {
    let is_nonempty = output_dir.is_dir() && output_dir.read_dir()?.next().is_some();
    if is_nonempty {
        ensure!(
            overwrite,
            "Output folder already exists and is not empty. Use --overwrite to replace it."
        );
        fs::remove_dir_all(output_dir)?;
    }

    // Try to create the directory, with parents
    fs::create_dir_all(output_dir)?;

    Ok(is_nonempty)
}

/// Represents a row in the dispatch CSV file
#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct DispatchRow {
    hour: Hour,
    solar_generation: f64,
    wind_generation: f64,
    demand: f64,
    charge: f64,
    discharge: f64,
    curtailment: f64,
    state_of_charge: f64,
    net_supply: f64,
    marginal_cost: f64,
}

/// Represents a row in the capacities CSV file
#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct CapacityRow {
    technology: String,
    capacity: f64,
    capital_cost: f64,
}

/// Information about the solver run in the results file
#[derive(Serialize, Debug)]
struct SolverRecord {
    name: Solver,
    sense: &'static str,
    status: SolverStatus,
    message: Option<String>,
    /// Wall-clock time taken to build and solve the problem
    solve_time_seconds: f64,
}

/// The objective split into its components
#[derive(Serialize, Debug)]
struct CostRecord {
    capital: IndexMap<Technology, f64>,
    discharge: f64,
    curtailment: f64,
}

/// The solution section of the results file
#[derive(Serialize, Debug)]
struct SolutionRecord {
    objective: f64,
    costs: CostRecord,
    capacities: IndexMap<Technology, f64>,
    total_curtailment: f64,
    total_discharge: f64,
    hours: Vec<DispatchRow>,
}

/// The contents of the results file
#[derive(Serialize, Debug)]
struct ResultsRecord {
    solver: SolverRecord,
    problem: ProblemSize,
    solution: Option<SolutionRecord>,
}

/// Build the rows of the dispatch output from a solution
fn dispatch_rows(solution: &Solution) -> Vec<DispatchRow> {
    solution
        .iter_dispatch()
        .zip(solution.iter_energy_balance_duals())
        .map(|(dispatch, (hour, marginal_cost))| {
            assert_eq!(dispatch.hour, hour, "Dispatch and duals are misaligned");
            DispatchRow {
                hour,
                solar_generation: dispatch.solar_generation.value(),
                wind_generation: dispatch.wind_generation.value(),
                demand: dispatch.demand.value(),
                charge: dispatch.charge.value(),
                discharge: dispatch.discharge.value(),
                curtailment: dispatch.curtailment.value(),
                state_of_charge: dispatch.state_of_charge.value(),
                net_supply: dispatch.net_supply().value(),
                marginal_cost: marginal_cost.value(),
            }
        })
        .collect()
}

impl SolutionRecord {
    fn new(solution: &Solution) -> Self {
        let costs = solution.cost_breakdown();
        Self {
            objective: solution.objective_value.value(),
            costs: CostRecord {
                capital: costs
                    .capital
                    .iter()
                    .map(|(technology, cost)| (*technology, cost.value()))
                    .collect(),
                discharge: costs.discharge.value(),
                curtailment: costs.curtailment.value(),
            },
            capacities: solution
                .iter_capacities()
                .map(|(technology, capacity)| (technology, capacity.value()))
                .collect(),
            total_curtailment: solution.total_curtailment().value(),
            total_discharge: solution.total_discharge().value(),
            hours: dispatch_rows(solution),
        }
    }
}

/// Write `record` as pretty-printed JSON.
///
/// The buffer is flushed explicitly, as errors on drop would be lost.
fn write_json<W: Write, T: Serialize>(writer: W, record: &T) -> Result<()> {
    let mut writer = BufWriter::new(writer);
    serde_json::to_writer_pretty(&mut writer, record)?;
    writer.flush()?;

    Ok(())
}

/// Writes the outcome of an optimisation to the output folder
pub struct DataWriter {
    output_path: PathBuf,
}

impl DataWriter {
    /// Create a new [`DataWriter`] for the given output folder
    pub fn new(output_path: &Path) -> Self {
        Self {
            output_path: output_path.to_path_buf(),
        }
    }

    /// Write all output files for the result of an optimisation.
    ///
    /// The results file is always written. Dispatch and capacity files are only written if an
    /// optimal solution was found.
    pub fn write_outcome(
        &self,
        model: &Model,
        solver: Solver,
        outcome: &Result<Solution, ModelError>,
        solve_time: Duration,
    ) -> Result<()> {
        let solver_record = |status, message| SolverRecord {
            name: solver,
            sense: OBJECTIVE_SENSE,
            status,
            message,
            solve_time_seconds: solve_time.as_secs_f64(),
        };
        let problem = ProblemSize::for_hours(model.num_hours());
        let record = match outcome {
            Ok(solution) => {
                self.write_dispatch(solution)?;
                self.write_capacities(solution)?;
                ResultsRecord {
                    solver: solver_record(SolverStatus::Optimal, None),
                    problem,
                    solution: Some(SolutionRecord::new(solution)),
                }
            }
            Err(err) => ResultsRecord {
                solver: solver_record(err.solver_status(), Some(err.to_string())),
                problem,
                solution: None,
            },
        };

        self.write_results(&record)
    }

    /// Write the results file
    fn write_results(&self, record: &ResultsRecord) -> Result<()> {
        let file_path = self.output_path.join(RESULTS_FILE_NAME);
        let file = File::create(&file_path)
            .with_context(|| format!("Failed to create {}", file_path.display()))?;

        write_json(file, record).with_context(|| format!("Failed to write {}", file_path.display()))
    }

    /// Write hourly dispatch to file
    fn write_dispatch(&self, solution: &Solution) -> Result<()> {
        let mut writer = csv::Writer::from_path(self.output_path.join(DISPATCH_FILE_NAME))?;
        for row in dispatch_rows(solution) {
            writer.serialize(row)?;
        }
        writer.flush()?;

        Ok(())
    }

    /// Write capacities to file
    fn write_capacities(&self, solution: &Solution) -> Result<()> {
        let costs = solution.cost_breakdown();
        let mut writer = csv::Writer::from_path(self.output_path.join(CAPACITIES_FILE_NAME))?;
        for (technology, capacity) in solution.iter_capacities() {
            writer.serialize(CapacityRow {
                technology: technology.to_string(),
                capacity: capacity.value(),
                capital_cost: costs.capital[&technology].value(),
            })?;
        }
        writer.flush()?;

        Ok(())
    }
}
