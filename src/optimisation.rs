//! Code for performing the capacity sizing optimisation.
//!
//! The problem has one capacity variable for each [`Technology`] and, for every hour, variables for
//! curtailment, storage charge, storage discharge and storage state of charge. All variables are
//! non-negative. The structure of the problem depends only on the number of hours; the hourly
//! profile supplies the coefficients and right-hand sides of the energy balance rows.
use crate::model::Model;
use crate::model::parameters::ModelParameters;
use crate::profile::Hour;
use crate::solver::{Solver, SolverStatus};
use crate::technology::Technology;
use crate::units::{Capacity, Energy, Money, MoneyPerEnergy};
use highs::{HighsModelStatus, HighsStatus, RowProblem as Problem, Sense};
use indexmap::IndexMap;
use log::debug;
use serde::Serialize;
use std::error::Error;
use std::fmt;
use std::ops::Range;
use strum::IntoEnumIterator;

mod constraints;
use constraints::{ConstraintKeys, NUM_CONSTRAINTS_PER_HOUR, add_model_constraints};

/// A decision variable in the optimisation
///
/// Note that this type does **not** include the value of the variable; it just refers to a
/// particular column of the problem.
type Variable = highs::Col;

/// The map of capacity variables for technologies
type CapacityVariableMap = IndexMap<Technology, Variable>;

/// The number of variables added for each hour
const NUM_VARIABLES_PER_HOUR: usize = 4;

/// Variables for a single hour.
///
/// Columns are added to the problem in field order.
struct HourlyVariables {
    curtailment: Variable,
    charge: Variable,
    discharge: Variable,
    state_of_charge: Variable,
}

/// A map for easy lookup of variables in the problem.
///
/// We use this data structure for two things:
///
/// 1. In order define constraints for the optimisation
/// 2. To keep track of which column each variable corresponds to, for when we are reading the
///    results of the optimisation.
pub struct VariableMap {
    capacity_vars: CapacityVariableMap,
    capacity_var_idx: Range<usize>,
    hourly_vars: Vec<HourlyVariables>,
    hourly_var_idx: Range<usize>,
}

impl VariableMap {
    /// Create a new [`VariableMap`], adding all variables to the problem.
    ///
    /// Objective coefficients come from the parameters: capital costs for capacities, the
    /// curtailment penalty for curtailment and the discharge cost for discharge.
    ///
    /// # Arguments
    ///
    /// * `problem` - The optimisation problem
    /// * `parameters` - Model parameters
    /// * `num_hours` - The number of hours in the modelled period
    fn new(problem: &mut Problem, parameters: &ModelParameters, num_hours: usize) -> Self {
        let start = problem.num_cols();
        let capacity_vars: CapacityVariableMap = Technology::iter()
            .map(|technology| {
                let cost = parameters.capital_cost(technology).value();
                (technology, problem.add_column(cost, 0.0..))
            })
            .collect();
        let capacity_var_idx = start..problem.num_cols();

        let start = problem.num_cols();
        let hourly_vars = (0..num_hours)
            .map(|_| HourlyVariables {
                curtailment: problem.add_column(parameters.curtailment_penalty.value(), 0.0..),
                charge: problem.add_column(0.0, 0.0..),
                discharge: problem.add_column(parameters.discharge_cost.value(), 0.0..),
                state_of_charge: problem.add_column(0.0, 0.0..),
            })
            .collect();
        let hourly_var_idx = start..problem.num_cols();

        Self {
            capacity_vars,
            capacity_var_idx,
            hourly_vars,
            hourly_var_idx,
        }
    }

    /// Get the capacity variable for the given technology
    fn capacity_var(&self, technology: Technology) -> Variable {
        *self
            .capacity_vars
            .get(&technology)
            .expect("No capacity variable for technology")
    }

    /// Get the variables for the given hour
    fn hourly_vars(&self, hour: Hour) -> &HourlyVariables {
        &self.hourly_vars[hour]
    }
}

/// The number of variables and constraints in a problem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProblemSize {
    /// The number of decision variables
    pub num_variables: usize,
    /// The number of constraints
    pub num_constraints: usize,
}

impl ProblemSize {
    /// The size of the problem for a period of `num_hours` hours
    pub fn for_hours(num_hours: usize) -> Self {
        Self {
            num_variables: Technology::iter().count() + NUM_VARIABLES_PER_HOUR * num_hours,
            num_constraints: NUM_CONSTRAINTS_PER_HOUR * num_hours,
        }
    }
}

/// Dispatch and generation for a single hour of the solution
#[derive(Debug, Clone, PartialEq)]
pub struct HourlyDispatch {
    /// The hour
    pub hour: Hour,
    /// Energy generated by solar capacity
    pub solar_generation: Energy,
    /// Energy generated by wind capacity
    pub wind_generation: Energy,
    /// Energy demand
    pub demand: Energy,
    /// Energy drawn into storage
    pub charge: Energy,
    /// Energy delivered from storage
    pub discharge: Energy,
    /// Generated energy which is discarded
    pub curtailment: Energy,
    /// Energy held in storage at the end of the hour
    pub state_of_charge: Energy,
}

impl HourlyDispatch {
    /// Total generation from solar and wind
    pub fn generation(&self) -> Energy {
        self.solar_generation + self.wind_generation
    }

    /// Energy supplied to meet demand, i.e. generation plus discharge minus charge and curtailment
    pub fn net_supply(&self) -> Energy {
        self.generation() + self.discharge - self.charge - self.curtailment
    }
}

/// The objective value split into its components
#[derive(Debug, Clone, PartialEq)]
pub struct CostBreakdown {
    /// Capital cost for each technology
    pub capital: IndexMap<Technology, Money>,
    /// Total cost of discharging storage
    pub discharge: Money,
    /// Total penalty for curtailment
    pub curtailment: Money,
}

impl CostBreakdown {
    /// The sum of all costs
    pub fn total(&self) -> Money {
        self.capital.values().copied().sum::<Money>() + self.discharge + self.curtailment
    }
}

/// The solution to the capacity sizing problem
pub struct Solution<'a> {
    solution: highs::Solution,
    variables: VariableMap,
    model: &'a Model,
    constraint_keys: ConstraintKeys,
    /// The objective value for the solution
    pub objective_value: Money,
}

impl Solution<'_> {
    /// Iterate over the optimal capacity of each technology
    pub fn iter_capacities(&self) -> impl Iterator<Item = (Technology, Capacity)> + '_ {
        self.variables
            .capacity_vars
            .keys()
            .copied()
            .zip(self.solution.columns()[self.variables.capacity_var_idx.clone()].iter())
            .map(|(technology, &capacity)| (technology, Capacity(capacity)))
    }

    /// The optimal capacity for the given technology
    pub fn capacity(&self, technology: Technology) -> Capacity {
        let idx = self
            .variables
            .capacity_vars
            .get_index_of(&technology)
            .expect("No capacity variable for technology");

        Capacity(self.solution.columns()[self.variables.capacity_var_idx.start + idx])
    }

    /// Iterate over the dispatch for each hour
    pub fn iter_dispatch(&self) -> impl Iterator<Item = HourlyDispatch> + '_ {
        let solar_capacity = self.capacity(Technology::SolarCapacity);
        let wind_capacity = self.capacity(Technology::WindCapacity);

        self.solution.columns()[self.variables.hourly_var_idx.clone()]
            .chunks_exact(NUM_VARIABLES_PER_HOUR)
            .zip(self.model.profile.iter())
            .map(move |(values, (hour, conditions))| {
                let &[curtailment, charge, discharge, state_of_charge] = values else {
                    unreachable!("Wrong number of variables for hour {hour}")
                };

                HourlyDispatch {
                    hour,
                    solar_generation: solar_capacity.hourly_output(conditions.solar),
                    wind_generation: wind_capacity.hourly_output(conditions.wind),
                    demand: conditions.demand,
                    charge: Energy(charge),
                    discharge: Energy(discharge),
                    curtailment: Energy(curtailment),
                    state_of_charge: Energy(state_of_charge),
                }
            })
    }

    /// Keys and dual values for energy balance constraints.
    ///
    /// The dual of an hour's energy balance is the marginal cost of meeting an extra unit of demand
    /// in that hour.
    pub fn iter_energy_balance_duals(&self) -> impl Iterator<Item = (Hour, MoneyPerEnergy)> + '_ {
        self.constraint_keys
            .energy_balance_keys
            .zip_duals(self.solution.dual_rows())
            .map(|(&hour, dual)| (hour, MoneyPerEnergy(dual)))
    }

    /// Total curtailment over the period
    pub fn total_curtailment(&self) -> Energy {
        self.iter_dispatch().map(|dispatch| dispatch.curtailment).sum()
    }

    /// Total discharge over the period
    pub fn total_discharge(&self) -> Energy {
        self.iter_dispatch().map(|dispatch| dispatch.discharge).sum()
    }

    /// Recompute the objective from the solution, split into its components
    pub fn cost_breakdown(&self) -> CostBreakdown {
        let parameters = &self.model.parameters;
        CostBreakdown {
            capital: self
                .iter_capacities()
                .map(|(technology, capacity)| {
                    (technology, parameters.capital_cost(technology) * capacity)
                })
                .collect(),
            discharge: parameters.discharge_cost * self.total_discharge(),
            curtailment: parameters.curtailment_penalty * self.total_curtailment(),
        }
    }
}

/// Defines the possible errors that can occur when running the solver
#[derive(Debug, Clone)]
pub enum ModelError {
    /// The solver could not run the model.
    ///
    /// Users should not be able to trigger this error.
    Incoherent(HighsStatus),
    /// An optimal solution could not be found
    NonOptimal(HighsModelStatus),
}

impl ModelError {
    /// The status to report for this error
    pub fn solver_status(&self) -> SolverStatus {
        match self {
            ModelError::Incoherent(_) => SolverStatus::Error,
            ModelError::NonOptimal(status) => SolverStatus::from(*status),
        }
    }
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::Incoherent(status) => write!(f, "Solver could not run model: {status:?}"),
            ModelError::NonOptimal(status) => match SolverStatus::from(*status) {
                SolverStatus::Infeasible | SolverStatus::InfeasibleOrUnbounded => write!(
                    f,
                    "Model is infeasible: demand cannot be met in every hour ({status:?})"
                ),
                SolverStatus::Unbounded => write!(f, "Model is unbounded ({status:?})"),
                _ => write!(f, "Could not find optimal result: {status:?}"),
            },
        }
    }
}

impl Error for ModelError {}

/// Try to solve the model, returning an error if the model is incoherent or result is non-optimal
fn solve_optimal(model: highs::Model) -> Result<highs::SolvedModel, ModelError> {
    let solved = model.try_solve().map_err(ModelError::Incoherent)?;

    match solved.status() {
        HighsModelStatus::Optimal => Ok(solved),
        status => Err(ModelError::NonOptimal(status)),
    }
}

/// Perform the capacity sizing optimisation.
///
/// # Arguments
///
/// * `model` - The model
/// * `solver` - The solver to use
///
/// # Returns
///
/// The optimal capacities and hourly dispatch, or an error if no optimal solution was found.
pub fn perform_sizing_optimisation(
    model: &Model,
    solver: Solver,
) -> Result<Solution<'_>, ModelError> {
    // Set up problem
    let mut problem = Problem::default();
    let variables = VariableMap::new(&mut problem, &model.parameters, model.num_hours());

    // Add constraints
    let constraint_keys = add_model_constraints(&mut problem, &variables, model);

    debug_assert_eq!(
        ProblemSize {
            num_variables: problem.num_cols(),
            num_constraints: problem.num_rows(),
        },
        ProblemSize::for_hours(model.num_hours())
    );
    debug!(
        "Solving problem with {} variables and {} constraints using {solver}",
        problem.num_cols(),
        problem.num_rows()
    );

    // Solve problem
    let mut highs_model = problem.optimise(Sense::Minimise);
    solver.configure(&mut highs_model);
    let solved = solve_optimal(highs_model)?;

    Ok(Solution {
        solution: solved.get_solution(),
        variables,
        model,
        constraint_keys,
        objective_value: Money(solved.objective_value()),
    })
}
